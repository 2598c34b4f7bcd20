//! Chapter heading markup.
//!
//! Novel chapter titles usually read "第一章 风起" or "Chapter 1 The Storm":
//! a short label followed by the name of the chapter. The label is wrapped in a
//! `<span>` so the style sheet can put it on its own, smaller line above the
//! name. Titles are trusted markup and are not escaped.

pub const HEADING_OPEN: &str = "<h2>";
pub const HEADING_CLOSE: &str = "</h2>";

/// Split a title at its first run of whitespace into a `<span>` label and the
/// remaining text. Titles without whitespace are returned unchanged.
pub fn format_title(title: &str) -> String {
    match title.split_once(char::is_whitespace) {
        Some((label, rest)) => format!("<span>{label}</span>{}", rest.trim_start()),
        None => title.to_string(),
    }
}

/// Prefix section content with its formatted heading.
pub fn wrap_title(title: &str, content: &str) -> String {
    let heading = format_title(title);
    let mut html = String::with_capacity(
        HEADING_OPEN.len() + heading.len() + HEADING_CLOSE.len() + content.len(),
    );
    html.push_str(HEADING_OPEN);
    html.push_str(&heading);
    html.push_str(HEADING_CLOSE);
    html.push_str(content);
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_split_label_from_name() {
        assert_eq!(format_title("第一 章节名"), "<span>第一</span>章节名");
        assert_eq!(format_title("Chapter 1"), "<span>Chapter</span>1");
    }

    #[test]
    fn splits_on_first_whitespace_run_only() {
        assert_eq!(
            format_title("Chapter  \t1 The Storm"),
            "<span>Chapter</span>1 The Storm"
        );
        assert_eq!(format_title("第一章\u{3000}风起"), "<span>第一章</span>风起");
    }

    #[test]
    fn leaves_single_word_titles_alone() {
        assert_eq!(format_title("序言"), "序言");
        assert_eq!(format_title(""), "");
    }

    #[test]
    fn does_not_escape_markup() {
        assert_eq!(format_title("<b>A</b> & B"), "<span><b>A</b></span>& B");
    }

    #[test]
    fn can_wrap_title() {
        assert_eq!(wrap_title("T", "C"), "<h2>T</h2>C");
        assert_eq!(
            wrap_title("第一 章节名", "<p>x</p>"),
            "<h2><span>第一</span>章节名</h2><p>x</p>"
        );
    }
}
