use serde::{Deserialize, Serialize};

/// A top-level section of the book, usually a chapter or a volume.
///
/// The content is pre-rendered HTML produced upstream and is embedded as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chapter {
    pub title: String,
    pub content: String,
    /// Nested sections, in reading order. Nesting stops here: sub-sections
    /// cannot have children of their own.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subsections: Vec<SubSection>,
}

impl Chapter {
    pub fn new<T: ToString, C: ToString>(title: T, content: C) -> Chapter {
        Chapter {
            title: title.to_string(),
            content: content.to_string(),
            subsections: Vec::new(),
        }
    }

    pub fn with_subsection<S: Into<SubSection>>(mut self, subsection: S) -> Self {
        self.subsections.push(subsection.into());
        self
    }
}

/// A section nested directly under a `Chapter`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubSection {
    pub title: String,
    pub content: String,
}

impl SubSection {
    pub fn new<T: ToString, C: ToString>(title: T, content: C) -> SubSection {
        SubSection {
            title: title.to_string(),
            content: content.to_string(),
        }
    }
}
