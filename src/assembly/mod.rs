//! Book assembly orchestration.
//!
//! A build runs these stages in order, stopping at the first failure:
//!
//! 1. acquire a private temporary workspace
//! 2. create the document and set title, language and author
//! 3. resolve the style sheet: use the caller's file, or generate one (embedding
//!    the custom font when it exists) and write it into the workspace
//! 4. register the style sheet
//! 5. register the cover image, if any
//! 6. register every chapter and sub-section
//! 7. write the document to `<output_path>.epub`
//!
//! The workspace is released after the last stage whether or not the build
//! succeeded. Progress is reported on the `ProgressBar` the caller passes in.

mod sections;

pub use sections::{register_all, SectionCounts};

use crate::book::Book;
use crate::container::{Container, EpubContainer};
use crate::error::{BuildError, Result};
use crate::styles::StyleSheet;
use crate::workspace::Workspace;
use indicatif::ProgressBar;
use log::debug;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Statistics from a finished build, used for user feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderStats {
    pub output_path: PathBuf,
    pub chapter_count: usize,
    pub subsection_count: usize,
    pub font_embedded: bool,
    pub cover_embedded: bool,
    pub bytes_written: u64,
    pub elapsed: Duration,
}

/// Where the style sheet registered with the document came from.
struct ResolvedStylesheet {
    path: PathBuf,
    font_embedded: bool,
}

pub struct BookAssembler<'a> {
    progress: &'a ProgressBar,
    temp_root: Option<PathBuf>,
}

impl<'a> BookAssembler<'a> {
    pub fn new(progress: &'a ProgressBar) -> BookAssembler<'a> {
        BookAssembler {
            progress,
            temp_root: None,
        }
    }

    /// Create the build workspace under `root` instead of the system
    /// temporary directory.
    pub fn temp_root<P: Into<PathBuf>>(mut self, root: P) -> BookAssembler<'a> {
        self.temp_root = Some(root.into());
        self
    }

    /// Assemble `book` into an EPUB file.
    pub fn build(&self, book: &Book) -> Result<RenderStats> {
        self.build_with(book, EpubContainer::create)
    }

    /// Assemble `book` using the container returned by `create`, which is
    /// called with the book's title.
    pub fn build_with<C, F>(&self, book: &Book, create: F) -> Result<RenderStats>
    where
        C: Container,
        F: FnOnce(&str) -> anyhow::Result<C>,
    {
        let start = Instant::now();
        let workspace = match &self.temp_root {
            Some(root) => Workspace::acquire_in(root),
            None => Workspace::acquire(),
        };
        let workspace = match workspace {
            Ok(workspace) => workspace,
            Err(e) => {
                self.progress.abandon_with_message("EPUB generation failed");
                return Err(BuildError::Workspace(e));
            }
        };
        self.progress.set_message("Generating EPUB...");

        let workspace_path = workspace.path().to_path_buf();
        let outcome = self
            .assemble(book, &workspace, create)
            .map(|stats| RenderStats {
                elapsed: start.elapsed(),
                ..stats
            });

        match &outcome {
            Ok(stats) => self
                .progress
                .finish_with_message(format!("EPUB generated in {:.2?}", stats.elapsed)),
            Err(_) => self.progress.abandon_with_message("EPUB generation failed"),
        }

        match workspace.release() {
            Ok(()) => outcome,
            Err(source) => Err(BuildError::Cleanup {
                path: workspace_path,
                source,
                outcome: outcome.map_err(Box::new),
            }),
        }
    }

    fn assemble<C, F>(&self, book: &Book, workspace: &Workspace, create: F) -> Result<RenderStats>
    where
        C: Container,
        F: FnOnce(&str) -> anyhow::Result<C>,
    {
        let mut container = create(&book.title).map_err(BuildError::CreateDocument)?;
        container
            .set_language(&book.language)
            .map_err(BuildError::Metadata)?;
        container
            .set_author(&book.author)
            .map_err(BuildError::Metadata)?;

        let stylesheet = resolve_stylesheet(book, &mut container, workspace)?;
        let style = container
            .add_stylesheet(&stylesheet.path)
            .map_err(BuildError::Stylesheet)?;

        let cover_embedded = match book.cover_opt() {
            Some(cover) => {
                let name = cover
                    .file_name()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "cover-image".to_string());
                container
                    .add_image(&cover, &name)
                    .and_then(|image| container.set_cover(&image))
                    .map_err(|source| BuildError::Cover {
                        path: cover.clone(),
                        source,
                    })?;
                true
            }
            None => false,
        };

        self.progress.set_message("Adding sections...");
        let counts = register_all(&mut container, &book.sections, &style)?;

        self.progress.set_message("Writing EPUB...");
        let output_path = book.epub_path();
        let bytes_written = container
            .write(&output_path)
            .map_err(|source| BuildError::Write {
                path: output_path.clone(),
                source,
            })?;

        Ok(RenderStats {
            output_path,
            chapter_count: counts.chapters,
            subsection_count: counts.subsections,
            font_embedded: stylesheet.font_embedded,
            cover_embedded,
            bytes_written,
            elapsed: Duration::ZERO,
        })
    }
}

/// Use the caller's style sheet verbatim, or generate one into the workspace.
///
/// Only a generated sheet embeds the custom font, and a font path that does
/// not exist is skipped.
fn resolve_stylesheet<C: Container>(
    book: &Book,
    container: &mut C,
    workspace: &Workspace,
) -> Result<ResolvedStylesheet> {
    if let Some(path) = book.stylesheet_opt() {
        debug!("using custom stylesheet {}", path.display());
        return Ok(ResolvedStylesheet {
            path,
            font_embedded: false,
        });
    }

    let mut sheet = StyleSheet::from_book(book).map_err(BuildError::Stylesheet)?;
    if let Some(font) = book.font_opt() {
        if font.exists() {
            let font_ref = container
                .add_font(&font)
                .map_err(|source| BuildError::Font {
                    path: font.clone(),
                    source,
                })?;
            sheet = sheet.with_embedded_font(font_ref);
        } else {
            debug!("custom font {} not found, not embedding it", font.display());
        }
    }

    let path = sheet
        .write_to(workspace.path())
        .map_err(BuildError::Stylesheet)?;
    Ok(ResolvedStylesheet {
        path,
        font_embedded: sheet.embedded_font.is_some(),
    })
}
