//! CSS generation for the book's paragraphs and chapter headings.
//!
//! The generated sheet has two rule blocks (body paragraphs and `h2` chapter
//! headings) plus a nested rule that drops the heading's `<span>` label onto
//! its own smaller line. An embedded font adds a `font-family` declaration to
//! the heading rule and a top-level `@font-face` rule pointing at the font's
//! location inside the package.
//!
//! Values are rendered field by field through `Display`; anything that could
//! close a declaration or a block is rejected up front in `StyleSheet::from_book`.

use crate::book::{Alignment, Book};
use crate::container::FontRef;
use anyhow::{anyhow, Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Family name the embedded font is declared under.
pub const EMBEDDED_FONT_FAMILY: &str = "embedfont";

/// File name of the generated sheet inside the working directory.
pub const STYLESHEET_FILE_NAME: &str = "page_styles.css";

/// Presentation settings rendered into the generated style sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheet {
    pub paragraph_alignment: Alignment,
    pub heading_bottom_margin: String,
    /// Heading indent, in em
    pub heading_indent: i32,
    pub line_height: Option<String>,
    pub embedded_font: Option<FontRef>,
}

impl StyleSheet {
    /// Collect the styling settings of a book. No font is embedded yet; see
    /// `with_embedded_font`.
    pub fn from_book(book: &Book) -> Result<StyleSheet> {
        let heading_bottom_margin = css_value("heading bottom margin", &book.heading_bottom_margin)?;
        let line_height = book
            .line_height_opt()
            .map(|lh| css_value("line height", lh))
            .transpose()?;

        Ok(StyleSheet {
            paragraph_alignment: book.paragraph_alignment,
            heading_bottom_margin,
            heading_indent: book.heading_indent,
            line_height,
            embedded_font: None,
        })
    }

    pub fn with_embedded_font(mut self, font: FontRef) -> Self {
        self.embedded_font = Some(font);
        self
    }

    /// Declarations appended to the heading rule.
    fn extra_heading_rules(&self) -> Vec<String> {
        let mut rules = Vec::new();
        if let Some(line_height) = &self.line_height {
            rules.push(format!("line-height: {line_height};"));
        }
        if self.embedded_font.is_some() {
            rules.push(format!(r#"font-family: "{EMBEDDED_FONT_FAMILY}";"#));
        }
        rules
    }

    /// Render the sheet and write it into `dir`, returning the file's path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(STYLESHEET_FILE_NAME);
        std::fs::write(&path, self.to_string())
            .with_context(|| format!("Failed to write stylesheet {}", path.display()))?;
        Ok(path)
    }
}

impl fmt::Display for StyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p {{text-align: {}}}", self.paragraph_alignment)?;

        write!(f, "h2 {{")?;
        if !self.heading_bottom_margin.is_empty() {
            write!(f, "margin-bottom: {}; ", self.heading_bottom_margin)?;
        }
        write!(f, "text-indent: {}em; font-size: 1.5em;", self.heading_indent)?;
        for rule in self.extra_heading_rules() {
            write!(f, " {rule}")?;
        }
        writeln!(f, " }}")?;

        writeln!(f, "h2 span {{display: block; font-size: 0.75em;}}")?;

        if let Some(font) = &self.embedded_font {
            writeln!(f)?;
            writeln!(f, "@font-face {{")?;
            writeln!(f, r#"  font-family: "{EMBEDDED_FONT_FAMILY}";"#)?;
            writeln!(f, "  src: url({}) format('truetype');", font.uri)?;
            writeln!(f, "}}")?;
        }

        Ok(())
    }
}

/// Reject values that would escape their declaration. An empty value is kept
/// and its declaration left out.
fn css_value(name: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.contains(['{', '}', ';', '\n']) {
        return Err(anyhow!("The {name} '{value}' is not a valid CSS value"));
    }
    Ok(value.to_string())
}
