use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use super::style::Style;

pub const DEFAULT_TITLE: &str = "My Website";
pub const DEFAULT_TEXT_CONTENT: &str = "Welcome to my website";
pub const PLACEHOLDER_TEXT: &str = "New paragraph";
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placeholder.com/image.jpg";

/// Identifier of a section, unique within its document and stable across reorders
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Text,
    Image,
}

impl SectionKind {
    /// Content given to a freshly added section of this kind
    pub fn placeholder(self) -> &'static str {
        match self {
            SectionKind::Text => PLACEHOLDER_TEXT,
            SectionKind::Image => PLACEHOLDER_IMAGE_URL,
        }
    }
}

/// One content block of a document.
///
/// `content` holds plain text for [`SectionKind::Text`] and a URL for
/// [`SectionKind::Image`]. Image sections carry a style too, but nothing
/// renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    pub id: SectionId,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub content: String,
    pub style: Style,
}

impl Section {
    /// New section with placeholder content and the default style
    pub fn new(id: SectionId, kind: SectionKind) -> Self {
        Self {
            id,
            kind,
            content: kind.placeholder().to_string(),
            style: Style::default(),
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == SectionKind::Text
    }
}

/// The whole editable unit: a title plus an ordered list of sections.
///
/// Editing never mutates a document in place. Every operation in
/// [`crate::editing`] borrows the current value and returns a new one, so the
/// editing session can swap documents wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    pub title: String,
    pub sections: Vec<Section>,
}

impl Default for Document {
    /// The document a new editing session starts with
    fn default() -> Self {
        let mut welcome = Section::new(SectionId::new("1"), SectionKind::Text);
        welcome.content = DEFAULT_TEXT_CONTENT.to_string();

        Self {
            title: DEFAULT_TITLE.to_string(),
            sections: vec![welcome],
        }
    }
}

impl Document {
    pub fn new(title: impl Into<String>, sections: Vec<Section>) -> Self {
        Self {
            title: title.into(),
            sections,
        }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|section| &section.id == id)
    }

    pub fn position(&self, id: &SectionId) -> Option<usize> {
        self.sections.iter().position(|section| &section.id == id)
    }

    pub fn contains(&self, id: &SectionId) -> bool {
        self.position(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &SectionId> {
        self.sections.iter().map(|section| &section.id)
    }

    /// An id not used by any section, derived from the current time in milliseconds
    pub fn fresh_id(&self) -> SectionId {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        self.fresh_id_from(millis)
    }

    /// Bumps `seed` until it no longer collides with an existing id
    pub(crate) fn fresh_id_from(&self, seed: u128) -> SectionId {
        let mut candidate = seed;
        loop {
            let id = SectionId::new(candidate.to_string());
            if !self.contains(&id) {
                return id;
            }
            candidate = candidate.wrapping_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::style::FontSize;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_document_has_one_text_section() {
        let doc = Document::default();

        assert_eq!(doc.title, DEFAULT_TITLE);
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.sections[0].id, SectionId::new("1"));
        assert_eq!(doc.sections[0].kind, SectionKind::Text);
        assert_eq!(doc.sections[0].content, DEFAULT_TEXT_CONTENT);
        assert_eq!(doc.sections[0].style.font_size, FontSize::Medium);
    }

    #[test]
    fn test_new_section_gets_placeholder_content() {
        let text = Section::new(SectionId::new("a"), SectionKind::Text);
        let image = Section::new(SectionId::new("b"), SectionKind::Image);

        assert_eq!(text.content, PLACEHOLDER_TEXT);
        assert_eq!(image.content, PLACEHOLDER_IMAGE_URL);
        assert!(text.is_text());
        assert!(!image.is_text());
    }

    #[test]
    fn test_lookup_by_id() {
        let doc = Document::new(
            "Lookup",
            vec![
                Section::new(SectionId::new("a"), SectionKind::Text),
                Section::new(SectionId::new("b"), SectionKind::Image),
            ],
        );

        assert_eq!(doc.position(&SectionId::new("b")), Some(1));
        assert_eq!(
            doc.section(&SectionId::new("b")).map(|s| s.kind),
            Some(SectionKind::Image)
        );
        assert!(doc.section(&SectionId::new("zzz")).is_none());
        assert!(!doc.contains(&SectionId::new("zzz")));
    }

    #[test]
    fn test_fresh_id_skips_taken_values() {
        let doc = Document::new(
            "Ids",
            vec![
                Section::new(SectionId::new("100"), SectionKind::Text),
                Section::new(SectionId::new("101"), SectionKind::Text),
            ],
        );

        assert_eq!(doc.fresh_id_from(100), SectionId::new("102"));
        assert_eq!(doc.fresh_id_from(7), SectionId::new("7"));
    }

    #[test]
    fn test_fresh_id_is_unused() {
        let doc = Document::default();
        let id = doc.fresh_id();
        assert!(!doc.contains(&id));
    }

    #[test]
    fn test_section_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SectionKind::Image).unwrap(),
            "\"image\""
        );
    }
}
