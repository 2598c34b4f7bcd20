//! The document-assembly service.
//!
//! A `Container` accepts metadata, a style sheet, images, fonts and HTML
//! sections and serializes them into a packaged e-book. Registration is
//! order-sensitive: the reading order and table of contents follow call order.
//! Handles returned by one call are passed back into later calls, so a
//! container is owned by exactly one build.

mod epub;

pub use epub::{font_href, EpubContainer};

use anyhow::Result;
use std::path::Path;

/// Style sheet registered with a container; sections link to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRef(pub String);

/// Image registered with a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef(pub String);

/// Font registered with a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontRef {
    /// URI of the font, relative to the registered style sheet
    pub uri: String,
}

impl FontRef {
    pub fn new<S: Into<String>>(uri: S) -> FontRef {
        FontRef { uri: uri.into() }
    }
}

/// Identifier of a top-level section, used to attach sub-sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionId(pub String);

pub trait Container: Sized {
    /// Start a new document with the given title.
    fn create(title: &str) -> Result<Self>;

    fn set_language(&mut self, code: &str) -> Result<()>;

    fn set_author(&mut self, name: &str) -> Result<()>;

    /// Register the style sheet file at `path`.
    fn add_stylesheet(&mut self, path: &Path) -> Result<StyleRef>;

    /// Register the image file at `path` under `name`.
    fn add_image(&mut self, path: &Path, name: &str) -> Result<ImageRef>;

    /// Use a previously registered image as the cover.
    fn set_cover(&mut self, image: &ImageRef) -> Result<()>;

    /// Register the font file at `path`, returning the URI style sheets use to
    /// reference it.
    fn add_font(&mut self, path: &Path) -> Result<FontRef>;

    /// Append a top-level section.
    fn add_section(&mut self, html: &str, title: &str, style: &StyleRef) -> Result<SectionId>;

    /// Append a section nested under `parent`.
    fn add_subsection(
        &mut self,
        parent: &SectionId,
        html: &str,
        title: &str,
        style: &StyleRef,
    ) -> Result<()>;

    /// Serialize the document to `path`, returning the number of bytes written.
    fn write(self, path: &Path) -> Result<u64>;
}
