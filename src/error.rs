//! Errors returned by a book build.

use crate::assembly::RenderStats;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BuildError>;

/// The stage a build failed in.
///
/// Stage errors wrap the underlying cause, so printing the error with `{:#}`
/// (or walking `source()`) shows the full chain.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Failed to create temporary workspace")]
    Workspace(#[source] std::io::Error),

    #[error("Failed to create the e-book document")]
    CreateDocument(#[source] anyhow::Error),

    #[error("Failed to set book metadata")]
    Metadata(#[source] anyhow::Error),

    #[error("Failed to prepare stylesheet")]
    Stylesheet(#[source] anyhow::Error),

    #[error("Failed to embed font {path}")]
    Font {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to add cover {path}")]
    Cover {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to add section '{title}'")]
    Section {
        title: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to write book to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// The temporary workspace could not be removed. `outcome` holds what the
    /// build itself produced, which may well be a finished book.
    #[error("Failed to remove temporary workspace {path}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        outcome: std::result::Result<RenderStats, Box<BuildError>>,
    },
}

impl BuildError {
    /// Whether the book was written despite this error.
    pub fn book_written(&self) -> bool {
        matches!(self, BuildError::Cleanup { outcome: Ok(_), .. })
    }
}
