//! Reading and writing book manifests.
//!
//! A manifest is a serialized `Book`, either TOML or JSON depending on the file
//! extension. Every field has a default, so a manifest only needs to spell out
//! what differs. Paths inside a manifest are used as-is, relative to the current
//! working directory.

use super::{Alignment, Book, Chapter, SubSection};
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// Serialization format of a manifest file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ManifestFormat {
    Toml,
    Json,
}

impl ManifestFormat {
    /// Pick the format from the file extension, defaulting to TOML.
    pub fn from_path(path: &Path) -> ManifestFormat {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("json") => ManifestFormat::Json,
            _ => ManifestFormat::Toml,
        }
    }
}

impl Book {
    /// Parse a book from manifest text.
    pub fn from_manifest_str(contents: &str, format: ManifestFormat) -> Result<Book> {
        match format {
            ManifestFormat::Toml => toml::from_str(contents).with_context(|| "Failed to parse TOML"),
            ManifestFormat::Json => {
                serde_json::from_str(contents).with_context(|| "Failed to parse JSON")
            }
        }
    }

    /// Load a book from a `.toml` or `.json` manifest file.
    pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Book> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load manifest {}", path.display()))?;
        Book::from_manifest_str(&contents, ManifestFormat::from_path(path))
            .with_context(|| format!("Failed to read book from {}", path.display()))
    }

    /// Serialize the book to manifest text.
    pub fn to_manifest_string(&self, format: ManifestFormat) -> Result<String> {
        match format {
            ManifestFormat::Toml => {
                toml::to_string(self).with_context(|| "Failed to serialize book to TOML")
            }
            ManifestFormat::Json => serde_json::to_string_pretty(self)
                .with_context(|| "Failed to serialize book to JSON"),
        }
    }
}

/// A small but complete book used to seed a new manifest.
pub fn example_book() -> Book {
    Book {
        title: "Example Novel".to_string(),
        author: "Anonymous".to_string(),
        language: "en".to_string(),
        output_path: PathBuf::from("example-novel"),
        paragraph_alignment: Alignment::Justify,
        line_height: "1.5".to_string(),
        sections: vec![
            Chapter::new("Preface", "<p>A few words before the story begins.</p>"),
            Chapter::new("Volume 1 The Road", "")
                .with_subsection(SubSection::new(
                    "Chapter 1 Departure",
                    "<p>The morning was grey.</p>",
                ))
                .with_subsection(SubSection::new(
                    "Chapter 2 Arrival",
                    "<p>The evening was gold.</p>",
                )),
        ],
        ..Book::default()
    }
}

/// Write an example manifest to `path`, refusing to overwrite an existing file.
pub fn write_example_manifest(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(anyhow!(
            "{} already exists, refusing to overwrite it",
            path.display()
        ));
    }
    let contents = example_book().to_manifest_string(ManifestFormat::from_path(path))?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write manifest {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_parse_minimal_toml() {
        let book = Book::from_manifest_str(
            r#"
title = "T"

[[sections]]
title = "Ch1"
content = "<p>x</p>"
"#,
            ManifestFormat::Toml,
        )
        .expect("can parse manifest");
        assert_eq!(book.title, "T");
        assert_eq!(book.language, "zh");
        assert_eq!(book.heading_indent, 2);
        assert_eq!(book.sections, vec![Chapter::new("Ch1", "<p>x</p>")]);
    }

    #[test]
    fn can_parse_json_with_subsections() {
        let book = Book::from_manifest_str(
            r#"{
                "title": "T",
                "paragraph_alignment": "left",
                "sections": [
                    {"title": "A", "content": "", "subsections": [
                        {"title": "A1", "content": "<p>1</p>"}
                    ]},
                    {"title": "B", "content": "<p>b</p>"}
                ]
            }"#,
            ManifestFormat::Json,
        )
        .expect("can parse manifest");
        assert_eq!(book.paragraph_alignment, Alignment::Left);
        assert_eq!(book.sections.len(), 2);
        assert_eq!(book.sections[0].subsections[0].title, "A1");
        assert!(book.sections[1].subsections.is_empty());
    }

    #[test]
    fn ignores_third_level_sections() {
        let book = Book::from_manifest_str(
            r#"{
                "title": "T",
                "sections": [
                    {"title": "A", "subsections": [
                        {"title": "A1", "subsections": [{"title": "A1a"}]}
                    ]}
                ]
            }"#,
            ManifestFormat::Json,
        )
        .expect("can parse manifest");
        assert_eq!(book.sections[0].subsections, vec![SubSection::new("A1", "")]);
    }

    #[test]
    fn rejects_unknown_alignment() {
        let result = Book::from_manifest_str(
            "title = \"T\"\nparagraph_alignment = \"diagonal\"\n",
            ManifestFormat::Toml,
        );
        assert!(result.is_err());
    }

    #[test]
    fn can_roundtrip_example_through_toml() {
        let book = example_book();
        let toml_str = book
            .to_manifest_string(ManifestFormat::Toml)
            .expect("can serialize");
        let deserialized =
            Book::from_manifest_str(&toml_str, ManifestFormat::Toml).expect("can deserialize");
        assert_eq!(book, deserialized);
    }

    #[test]
    fn picks_format_from_extension() {
        assert_eq!(
            ManifestFormat::from_path(Path::new("book.JSON")),
            ManifestFormat::Json
        );
        assert_eq!(
            ManifestFormat::from_path(Path::new("book.toml")),
            ManifestFormat::Toml
        );
        assert_eq!(
            ManifestFormat::from_path(Path::new("book")),
            ManifestFormat::Toml
        );
    }

    #[test]
    fn example_manifest_is_not_overwritten() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("book.toml");
        write_example_manifest(&path).expect("can write manifest");
        let loaded = Book::load_manifest(&path).expect("can load manifest");
        assert_eq!(loaded.title, "Example Novel");
        assert!(write_example_manifest(&path).is_err());
    }
}
