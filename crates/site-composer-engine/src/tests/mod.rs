use crate::models::{Color, Document, FontSize, Section, SectionId, SectionKind, Style};
use tempfile::TempDir;

/// Create a temporary directory to back a `FileStorage`
pub fn create_test_storage_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

pub fn text_section(id: &str, content: &str) -> Section {
    Section {
        id: SectionId::new(id),
        kind: SectionKind::Text,
        content: content.to_string(),
        style: Style::default(),
    }
}

pub fn image_section(id: &str, url: &str) -> Section {
    Section {
        id: SectionId::new(id),
        kind: SectionKind::Image,
        content: url.to_string(),
        style: Style::default(),
    }
}

/// `{title: "Site", sections: [{id: "1", type: text, content: "Hello"}]}`
pub fn site_document() -> Document {
    Document::new("Site", vec![text_section("1", "Hello")])
}

/// Three sections `a`, `b`, `c` with distinct styles
pub fn three_section_document() -> Document {
    let mut a = text_section("a", "alpha");
    a.style.bold = true;
    let b = image_section("b", "https://example.com/b.png");
    let mut c = text_section("c", "gamma");
    c.style = Style {
        bold: false,
        italic: true,
        font_size: FontSize::Small,
        color: Color::parse("#336699").unwrap(),
    };

    Document::new("Three", vec![a, b, c])
}

pub fn section_ids(doc: &Document) -> Vec<&str> {
    doc.ids().map(SectionId::as_str).collect()
}
