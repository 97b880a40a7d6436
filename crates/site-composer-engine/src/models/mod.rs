pub mod document;
pub mod style;

pub use document::{
    DEFAULT_TEXT_CONTENT, DEFAULT_TITLE, Document, PLACEHOLDER_IMAGE_URL, PLACEHOLDER_TEXT,
    Section, SectionId, SectionKind,
};
pub use style::{Color, FontSize, InvalidColor, Style, StyleDelta};
