//! Conversions between a [`Document`](crate::models::Document) and its text forms:
//! JSON for storage and a standalone HTML page for export.

pub mod html;
pub mod json;

pub use html::{
    BLOCKED_IMAGE_SRC, DEFAULT_EXPORT_FILE_NAME, DEFAULT_LANG, EXPORT_MIME_TYPE, ExportFile,
    ExportOptions, export_file, safe_image_src, to_html, to_html_with,
};
pub use json::{ParseError, SerializeError, deserialize, serialize};
