use std::collections::HashSet;

use crate::models::{Document, SectionId};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Duplicate section id: {0}")]
    DuplicateId(SectionId),
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to serialize document: {0}")]
pub struct SerializeError(#[from] serde_json::Error);

/// Serialize a document to the JSON kept in storage
pub fn serialize(doc: &Document) -> Result<String, SerializeError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Parse stored JSON back into a document.
///
/// The shape is checked strictly: unknown fields, missing fields, wrong
/// types, invalid colors or font sizes and repeated section ids are all
/// rejected.
pub fn deserialize(text: &str) -> Result<Document, ParseError> {
    let doc: Document = serde_json::from_str(text)?;

    let mut seen = HashSet::new();
    for id in doc.ids() {
        if !seen.insert(id) {
            return Err(ParseError::DuplicateId(id.clone()));
        }
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Color, FontSize, SectionKind, StyleDelta};
    use crate::tests::{site_document, three_section_document};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_round_trip_default_document() {
        let doc = Document::default();
        assert_eq!(deserialize(&serialize(&doc).unwrap()).unwrap(), doc);
    }

    #[test]
    fn test_round_trip_after_edits() {
        let doc = three_section_document()
            .add_section(SectionKind::Text)
            .update_section(
                &SectionId::new("a"),
                "<b>\"quoted\" & unicode ✓</b>\nsecond line",
                Some(
                    &StyleDelta::default()
                        .font_size(FontSize::Large)
                        .color(Color::parse("#abc").unwrap()),
                ),
            )
            .set_title("Round trip")
            .move_section(0, 3)
            .unwrap();

        assert_eq!(deserialize(&serialize(&doc).unwrap()).unwrap(), doc);
    }

    #[test]
    fn test_round_trip_empty_document() {
        let doc = Document::new("", Vec::new());
        assert_eq!(deserialize(&serialize(&doc).unwrap()).unwrap(), doc);
    }

    #[test]
    fn test_serialized_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&serialize(&site_document()).unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "title": "Site",
                "sections": [{
                    "id": "1",
                    "type": "text",
                    "content": "Hello",
                    "style": {
                        "bold": false,
                        "italic": false,
                        "fontSize": "16px",
                        "color": "#000000"
                    }
                }]
            })
        );
    }

    #[test]
    fn test_field_order_is_irrelevant() {
        let text = r##"{
            "sections": [{
                "style": {"color": "#000000", "fontSize": "20px", "italic": true, "bold": false},
                "content": "https://example.com/cat.png",
                "type": "image",
                "id": "1712345678901"
            }],
            "title": "Reordered"
        }"##;

        let doc = deserialize(text).unwrap();

        assert_eq!(doc.title, "Reordered");
        assert_eq!(doc.sections[0].kind, SectionKind::Image);
        assert_eq!(doc.sections[0].style.font_size, FontSize::Large);
    }

    #[rstest]
    #[case::not_json("not json")]
    #[case::truncated(r#"{"title": "x", "sections": ["#)]
    #[case::missing_title(r#"{"sections": []}"#)]
    #[case::missing_sections(r#"{"title": "x"}"#)]
    #[case::wrong_title_type(r#"{"title": 5, "sections": []}"#)]
    #[case::sections_not_a_list(r#"{"title": "x", "sections": {}}"#)]
    #[case::unknown_field(r#"{"title": "x", "sections": [], "theme": "dark"}"#)]
    #[case::unknown_kind(
        r##"{"title": "x", "sections": [{"id": "1", "type": "video", "content": "", "style": {"bold": false, "italic": false, "fontSize": "16px", "color": "#000000"}}]}"##
    )]
    #[case::partial_style(
        r#"{"title": "x", "sections": [{"id": "1", "type": "text", "content": "", "style": {"bold": true}}]}"#
    )]
    #[case::bad_font_size(
        r##"{"title": "x", "sections": [{"id": "1", "type": "text", "content": "", "style": {"bold": false, "italic": false, "fontSize": "99px", "color": "#000000"}}]}"##
    )]
    #[case::bad_color(
        r#"{"title": "x", "sections": [{"id": "1", "type": "text", "content": "", "style": {"bold": false, "italic": false, "fontSize": "16px", "color": "red"}}]}"#
    )]
    fn test_rejects_malformed_input(#[case] text: &str) {
        assert!(matches!(deserialize(text), Err(ParseError::Json(_))));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut doc = three_section_document();
        doc.sections[2].id = SectionId::new("a");
        let text = serialize(&doc).unwrap();

        let result = deserialize(&text);

        assert!(matches!(result, Err(ParseError::DuplicateId(id)) if id.as_str() == "a"));
    }
}
