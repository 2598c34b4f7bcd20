//! The book model handed to the assembler.
//!
//! A `Book` is produced upstream (by whatever parses the raw novel text) and is
//! treated as read-only for the duration of a build. Path-like fields follow the
//! configuration convention of "empty string means none" so that manifests stay
//! flat and easy to edit by hand; the `*_opt` accessors turn them into `Option`s.

mod manifest;
mod section;
mod title;

pub use manifest::*;
pub use section::*;
pub use title::*;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Extension appended to `Book::output_path` when writing.
pub const OUTPUT_EXTENSION: &str = "epub";

/// Horizontal alignment applied to body paragraphs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Right,
    Center,
    #[default]
    Justify,
}

impl Alignment {
    pub fn name(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Right => "right",
            Alignment::Center => "center",
            Alignment::Justify => "justify",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Everything needed to assemble a novel into an e-book.
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[builder(setter(into))]
#[serde(default)]
pub struct Book {
    /// Book title, also used as the document title in the container metadata
    pub title: String,
    #[builder(default)]
    pub author: String,
    /// Language code (BCP 47 format, e.g., "zh", "en", "ja")
    #[builder(default = "default_language()")]
    pub language: String,

    /// Output path without the `.epub` extension
    #[builder(default = "default_output_path()")]
    pub output_path: PathBuf,
    /// Cover image path. Empty string for none.
    #[builder(default)]
    pub cover_path: String,
    /// TrueType font to embed. Empty string for none.
    #[builder(default)]
    pub custom_font_path: String,
    /// Style sheet to use instead of the generated one. Empty string to generate.
    #[builder(default)]
    pub custom_stylesheet_path: String,

    #[builder(default)]
    pub paragraph_alignment: Alignment,
    /// CSS length below chapter headings, e.g. "2em"
    #[builder(default = "default_heading_bottom_margin()")]
    pub heading_bottom_margin: String,
    /// Chapter heading indent, in em
    #[builder(default = "default_heading_indent()")]
    pub heading_indent: i32,
    /// CSS line height. Empty string for the reader's default.
    #[builder(default)]
    pub line_height: String,

    #[builder(setter(each(name = "chapter", into)), default)]
    pub sections: Vec<Chapter>,
}

impl Default for Book {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            language: default_language(),
            output_path: default_output_path(),
            cover_path: String::new(),
            custom_font_path: String::new(),
            custom_stylesheet_path: String::new(),
            paragraph_alignment: Alignment::default(),
            heading_bottom_margin: default_heading_bottom_margin(),
            heading_indent: default_heading_indent(),
            line_height: String::new(),
            sections: Vec::new(),
        }
    }
}

fn default_language() -> String {
    "zh".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("book")
}

fn default_heading_bottom_margin() -> String {
    "2em".to_string()
}

fn default_heading_indent() -> i32 {
    2
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

impl Book {
    /// Returns the cover image path, if configured.
    pub fn cover_opt(&self) -> Option<PathBuf> {
        non_empty(&self.cover_path).map(PathBuf::from)
    }

    /// Returns the custom font path, if configured. The file may not exist.
    pub fn font_opt(&self) -> Option<PathBuf> {
        non_empty(&self.custom_font_path).map(PathBuf::from)
    }

    /// Returns the caller-supplied style sheet path, if configured.
    pub fn stylesheet_opt(&self) -> Option<PathBuf> {
        non_empty(&self.custom_stylesheet_path).map(PathBuf::from)
    }

    /// Returns the line height, if configured.
    pub fn line_height_opt(&self) -> Option<&str> {
        non_empty(&self.line_height)
    }

    /// Where the finished book is written: the output path with `.epub` appended.
    ///
    /// The extension is appended rather than substituted, so `out/vol.1` becomes
    /// `out/vol.1.epub`.
    pub fn epub_path(&self) -> PathBuf {
        let mut path = self.output_path.clone().into_os_string();
        path.push(".");
        path.push(OUTPUT_EXTENSION);
        PathBuf::from(path)
    }

    pub fn subsection_count(&self) -> usize {
        self.sections.iter().map(|c| c.subsections.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_build_book_with_defaults() {
        let book = BookBuilder::default()
            .title("T")
            .chapter(Chapter::new("Ch1", "<p>x</p>"))
            .build()
            .expect("can build book");
        assert_eq!(book.language, "zh");
        assert_eq!(book.heading_bottom_margin, "2em");
        assert_eq!(book.heading_indent, 2);
        assert_eq!(book.paragraph_alignment, Alignment::Justify);
        assert_eq!(book.sections.len(), 1);
        assert!(book.cover_opt().is_none());
        assert!(book.font_opt().is_none());
        assert!(book.stylesheet_opt().is_none());
        assert!(book.line_height_opt().is_none());
    }

    #[test]
    fn builder_requires_title() {
        assert!(BookBuilder::default().build().is_err());
    }

    #[test]
    fn epub_path_appends_extension() {
        let book = Book {
            output_path: PathBuf::from("out/vol.1"),
            ..Book::default()
        };
        assert_eq!(book.epub_path(), PathBuf::from("out/vol.1.epub"));
    }

    #[test]
    fn can_count_subsections() {
        let book = Book {
            sections: vec![
                Chapter::new("A", "")
                    .with_subsection(SubSection::new("A1", ""))
                    .with_subsection(SubSection::new("A2", "")),
                Chapter::new("B", ""),
            ],
            ..Book::default()
        };
        assert_eq!(book.subsection_count(), 2);
    }
}
