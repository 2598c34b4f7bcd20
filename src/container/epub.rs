//! EPUB packaging via `epub-builder`.
//!
//! `epub-builder` handles the packaging requirements (OPF manifest, NCX
//! navigation, ZIP layout with an uncompressed `mimetype` entry). This module
//! adapts it to the `Container` interface: section bodies are wrapped in XHTML
//! pages that link the registered style sheet, sub-sections are added at TOC
//! level 2 directly after their parent, and fonts are validated before they are
//! packaged.

use super::{Container, FontRef, ImageRef, SectionId, StyleRef};
use anyhow::{anyhow, Context, Result};
use epub_builder::{EpubBuilder, EpubContent, ReferenceType, ZipLibrary};
use log::debug;
use owned_ttf_parser::{AsFaceRef, OwnedFace};
use std::fmt::Display;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// `epub-builder` reports failures as `eyre` reports; this carries them into
/// `anyhow` with the full chain flattened into the message.
trait EpubContext<T> {
    fn epub_context<C, F>(self, context: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> EpubContext<T> for eyre::Result<T> {
    fn epub_context<C, F>(self, context: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| anyhow!("{e:#}")).with_context(context)
    }
}

/// Location of the style sheet inside the package; `epub-builder` fixes it.
const STYLESHEET_HREF: &str = "stylesheet.css";

/// Package path of an embedded font, relative to the style sheet.
pub fn font_href(path: &Path) -> String {
    format!("fonts/{}", file_name(path, "embedfont.ttf"))
}

fn file_name(path: &Path, fallback: &str) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| fallback.to_string())
}

struct PendingImage {
    href: String,
    data: Vec<u8>,
    mime: &'static str,
}

/// A `Container` that writes EPUB files.
pub struct EpubContainer {
    builder: EpubBuilder<ZipLibrary>,
    language: String,
    /// Images are held until they are either chosen as the cover or flushed as
    /// plain resources on write.
    images: Vec<PendingImage>,
    section_count: usize,
    /// The most recent top-level section and how many children it has so far.
    current_parent: Option<(SectionId, usize)>,
}

impl Container for EpubContainer {
    fn create(title: &str) -> Result<Self> {
        let zip = ZipLibrary::new().epub_context(|| "Failed to create ZIP library for EPUB")?;
        let mut builder = EpubBuilder::new(zip).epub_context(|| "Failed to build builder")?;
        builder
            .metadata("title", title)
            .epub_context(|| "Failed to set title metadata")?;
        builder
            .metadata("generator", "novel-book")
            .epub_context(|| "Failed to set generator metadata")?;

        Ok(EpubContainer {
            builder,
            language: "en".to_string(),
            images: Vec::new(),
            section_count: 0,
            current_parent: None,
        })
    }

    fn set_language(&mut self, code: &str) -> Result<()> {
        self.builder
            .metadata("lang", code)
            .epub_context(|| "Failed to set language metadata")?;
        self.language = code.to_string();
        Ok(())
    }

    fn set_author(&mut self, name: &str) -> Result<()> {
        self.builder
            .metadata("author", name)
            .epub_context(|| format!("Failed to add author metadata for author: {name}"))?;
        Ok(())
    }

    fn add_stylesheet(&mut self, path: &Path) -> Result<StyleRef> {
        let css = std::fs::read(path)
            .with_context(|| format!("Failed to read stylesheet: {}", path.display()))?;
        self.builder
            .stylesheet(css.as_slice())
            .epub_context(|| "Failed to add stylesheet")?;
        Ok(StyleRef(STYLESHEET_HREF.to_string()))
    }

    fn add_image(&mut self, path: &Path, name: &str) -> Result<ImageRef> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read image: {}", path.display()))?;
        let href = format!("images/{name}");
        if self.images.iter().any(|image| image.href == href) {
            return Err(anyhow!("An image named '{name}' was already added"));
        }
        self.images.push(PendingImage {
            href: href.clone(),
            data,
            mime: mime_from_path(path),
        });
        Ok(ImageRef(href))
    }

    fn set_cover(&mut self, image: &ImageRef) -> Result<()> {
        let index = self
            .images
            .iter()
            .position(|pending| pending.href == image.0)
            .ok_or_else(|| anyhow!("Image {} was never added", image.0))?;
        let cover = self.images.remove(index);
        self.builder
            .add_cover_image(&cover.href, cover.data.as_slice(), cover.mime)
            .epub_context(|| format!("Failed to add cover image to EPUB: {}", cover.href))?;

        let body = format!(
            r#"<div class="cover"><img src="{}" alt="Cover"/></div>"#,
            html_escape::encode_double_quoted_attribute(&cover.href)
        );
        let page = xhtml_page("Cover", &self.language, None, &body);
        self.builder
            .add_content(
                EpubContent::new("cover.xhtml", page.as_bytes())
                    .title("Cover")
                    .reftype(ReferenceType::Cover),
            )
            .epub_context(|| "Failed to add cover page")?;
        Ok(())
    }

    fn add_font(&mut self, path: &Path) -> Result<FontRef> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read font: {}", path.display()))?;
        let face = OwnedFace::from_vec(data.clone(), 0)
            .map_err(|e| anyhow!("Failed to parse font {}: {e}", path.display()))?;
        debug!(
            "embedding font {} ({} glyphs)",
            path.display(),
            face.as_face_ref().number_of_glyphs()
        );

        let href = font_href(path);
        self.builder
            .add_resource(&href, data.as_slice(), "application/x-font-ttf")
            .epub_context(|| format!("Failed to add font to EPUB: {}", path.display()))?;
        Ok(FontRef::new(href))
    }

    fn add_section(&mut self, html: &str, title: &str, style: &StyleRef) -> Result<SectionId> {
        self.section_count += 1;
        let href = format!("section-{:04}.xhtml", self.section_count);
        let page = xhtml_page(title, &self.language, Some(style), html);
        self.builder
            .add_content(
                EpubContent::new(&href, page.as_bytes())
                    .title(title)
                    .level(1),
            )
            .epub_context(|| format!("Failed to add section to EPUB: {title}"))?;

        let id = SectionId(href);
        self.current_parent = Some((id.clone(), 0));
        Ok(id)
    }

    fn add_subsection(
        &mut self,
        parent: &SectionId,
        html: &str,
        title: &str,
        style: &StyleRef,
    ) -> Result<()> {
        // the table of contents nests by call order, so children must follow
        // their parent directly
        let child_index = match &mut self.current_parent {
            Some((current, children)) if *current == *parent => {
                *children += 1;
                *children
            }
            _ => {
                return Err(anyhow!(
                    "Sub-section '{title}' does not follow its parent section {}",
                    parent.0
                ))
            }
        };

        let href = format!(
            "{}-{:04}.xhtml",
            parent.0.trim_end_matches(".xhtml"),
            child_index
        );
        let page = xhtml_page(title, &self.language, Some(style), html);
        self.builder
            .add_content(
                EpubContent::new(&href, page.as_bytes())
                    .title(title)
                    .level(2),
            )
            .epub_context(|| format!("Failed to add sub-section to EPUB: {title}"))?;
        Ok(())
    }

    fn write(self, path: &Path) -> Result<u64> {
        let EpubContainer {
            mut builder,
            images,
            ..
        } = self;

        for image in images {
            builder
                .add_resource(&image.href, image.data.as_slice(), image.mime)
                .epub_context(|| format!("Failed to add image to EPUB: {}", image.href))?;
        }

        write_atomically(path, |writer| {
            builder
                .generate(writer)
                .epub_context(|| "Failed to generate EPUB file")
        })
    }
}

/// Write the file at `path` through `fill`, leaving nothing behind on failure.
///
/// The content goes to a temporary file next to `path` that only replaces
/// `path` once `fill` and the flush have succeeded.
fn write_atomically<F>(path: &Path, fill: F) -> Result<u64>
where
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create EPUB file in {}", dir.display()))?;

    {
        let mut writer = BufWriter::new(&mut staged);
        fill(&mut writer)?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush EPUB file: {}", path.display()))?;
    }

    let file = staged
        .persist(path)
        .with_context(|| format!("Failed to create EPUB file: {}", path.display()))?;
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read EPUB file size: {}", path.display()))?;
    Ok(metadata.len())
}

/// Wrap a body fragment in a complete XHTML page.
fn xhtml_page(title: &str, language: &str, style: Option<&StyleRef>, body: &str) -> String {
    let stylesheet = style
        .map(|style| {
            format!(
                r#"
    <link rel="stylesheet" type="text/css" href="{}"/>"#,
                html_escape::encode_double_quoted_attribute(&style.0)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="{lang}">
<head>
    <meta http-equiv="Content-Type" content="text/html; charset=UTF-8"/>
    <title>{title}</title>{stylesheet}
</head>
<body>
{body}
</body>
</html>"#,
        lang = html_escape::encode_double_quoted_attribute(language),
        title = html_escape::encode_text(title),
        stylesheet = stylesheet,
        body = body,
    )
}

/// Determine MIME type from file extension.
fn mime_from_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
