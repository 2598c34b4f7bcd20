//! Assembles a structured novel into an EPUB e-book.
//!
//! The input is a [`Book`]: metadata, styling preferences and a two-level tree
//! of chapters and sub-sections whose content is pre-rendered HTML. The
//! [`BookAssembler`] turns it into registration calls against a [`Container`]
//! (by default an EPUB written with `epub-builder`), generating the style sheet
//! in a temporary workspace that is removed once the build is done.
//!
//! ```no_run
//! use indicatif::ProgressBar;
//! use novel_book::{BookAssembler, BookBuilder, Chapter};
//!
//! let book = BookBuilder::default()
//!     .title("The Storm")
//!     .author("Anonymous")
//!     .chapter(Chapter::new("Chapter 1 Departure", "<p>The morning was grey.</p>"))
//!     .build()?;
//! let progress = ProgressBar::hidden();
//! let stats = BookAssembler::new(&progress).build(&book)?;
//! println!("wrote {}", stats.output_path.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assembly;
pub mod book;
pub mod container;
pub mod error;
pub mod styles;
pub mod workspace;

pub use assembly::{BookAssembler, RenderStats};
pub use book::{Alignment, Book, BookBuilder, Chapter, SubSection};
pub use container::{Container, EpubContainer};
pub use error::BuildError;
