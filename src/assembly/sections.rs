//! Registration of the chapter tree with a container.

use crate::book::{wrap_title, Chapter};
use crate::container::{Container, StyleRef};
use crate::error::{BuildError, Result};
use log::debug;

/// How many sections were registered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SectionCounts {
    pub chapters: usize,
    pub subsections: usize,
}

/// Register every chapter, each followed by its sub-sections, in input order.
///
/// Stops at the first section the container rejects.
pub fn register_all<C: Container>(
    container: &mut C,
    chapters: &[Chapter],
    style: &StyleRef,
) -> Result<SectionCounts> {
    let mut counts = SectionCounts::default();

    for chapter in chapters {
        let id = container
            .add_section(
                &wrap_title(&chapter.title, &chapter.content),
                &chapter.title,
                style,
            )
            .map_err(|source| BuildError::Section {
                title: chapter.title.clone(),
                source,
            })?;
        counts.chapters += 1;
        debug!("added section '{}' as {}", chapter.title, id.0);

        for subsection in &chapter.subsections {
            container
                .add_subsection(
                    &id,
                    &wrap_title(&subsection.title, &subsection.content),
                    &subsection.title,
                    style,
                )
                .map_err(|source| BuildError::Section {
                    title: subsection.title.clone(),
                    source,
                })?;
            counts.subsections += 1;
        }
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::SubSection;
    use crate::container::testing::{Call, Journal, RecordingContainer};

    fn style() -> StyleRef {
        StyleRef("style.css".to_string())
    }

    fn titles(journal: &Journal) -> Vec<String> {
        journal
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::AddSection { title, .. } => Some(title.clone()),
                Call::AddSubSection { parent, title, .. } => Some(format!("{parent}/{title}")),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn registers_sections_in_input_order() {
        let journal = Journal::default();
        let mut container = RecordingContainer::with_journal("T", journal.clone());
        let chapters = vec![
            Chapter::new("A", "<p>a</p>")
                .with_subsection(SubSection::new("A1", "<p>a1</p>"))
                .with_subsection(SubSection::new("A2", "<p>a2</p>")),
            Chapter::new("B", "<p>b</p>"),
        ];

        let counts = register_all(&mut container, &chapters, &style()).expect("can register");
        assert_eq!(
            counts,
            SectionCounts {
                chapters: 2,
                subsections: 2
            }
        );
        assert_eq!(
            titles(&journal),
            vec!["A", "section-1/A1", "section-1/A2", "B"]
        );
    }

    #[test]
    fn wraps_content_with_heading() {
        let journal = Journal::default();
        let mut container = RecordingContainer::with_journal("T", journal.clone());
        let chapters = vec![Chapter::new("第一 章节名", "<p>x</p>")];

        register_all(&mut container, &chapters, &style()).expect("can register");
        assert!(journal.borrow().contains(&Call::AddSection {
            title: "第一 章节名".to_string(),
            html: "<h2><span>第一</span>章节名</h2><p>x</p>".to_string(),
            style: "style.css".to_string(),
        }));
    }

    #[test]
    fn keeps_duplicate_titles() {
        let journal = Journal::default();
        let mut container = RecordingContainer::with_journal("T", journal.clone());
        let chapters = vec![Chapter::new("B", ""), Chapter::new("A", ""), Chapter::new("B", "")];

        register_all(&mut container, &chapters, &style()).expect("can register");
        assert_eq!(titles(&journal), vec!["B", "A", "B"]);
    }

    #[test]
    fn stops_at_first_failure() {
        let journal = Journal::default();
        let mut container = RecordingContainer {
            fail_on: Some("A2".to_string()),
            ..RecordingContainer::with_journal("T", journal.clone())
        };
        let chapters = vec![
            Chapter::new("A", "")
                .with_subsection(SubSection::new("A1", ""))
                .with_subsection(SubSection::new("A2", "")),
            Chapter::new("B", ""),
        ];

        let err = register_all(&mut container, &chapters, &style()).expect_err("fails on A2");
        assert!(matches!(err, BuildError::Section { ref title, .. } if title == "A2"));
        assert_eq!(titles(&journal), vec!["A", "section-1/A1"]);
    }
}
