use std::sync::OnceLock;

use html_escape::{encode_double_quoted_attribute, encode_text};
use regex::Regex;

use crate::models::{Document, Section, SectionKind};

pub const DEFAULT_EXPORT_FILE_NAME: &str = "my-website.html";
pub const EXPORT_MIME_TYPE: &str = "text/html; charset=utf-8";
pub const DEFAULT_LANG: &str = "en";
/// Replacement `src` for image URLs with a scheme that is not allowed
pub const BLOCKED_IMAGE_SRC: &str = "about:blank";

const STYLESHEET: [&str; 3] = [
    "body { font-family: Arial, sans-serif; margin: 0; padding: 20px; }",
    ".container { max-width: 1200px; margin: 0 auto; }",
    "img { max-width: 100%; height: auto; }",
];

/// Settings for a standalone HTML export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Value of the `lang` attribute on `<html>`
    pub lang: String,
    pub file_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            lang: DEFAULT_LANG.to_string(),
            file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}

/// A finished export, ready to hand to whatever writes files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

pub fn export_file(doc: &Document, options: &ExportOptions) -> ExportFile {
    ExportFile {
        file_name: options.file_name.clone(),
        mime_type: EXPORT_MIME_TYPE,
        contents: to_html_with(doc, options),
    }
}

/// Render a document as a self-contained HTML page with default options
pub fn to_html(doc: &Document) -> String {
    to_html_with(doc, &ExportOptions::default())
}

/// Render a document as a self-contained HTML page.
///
/// Sections are emitted in document order. Text is HTML-escaped and image
/// URLs pass through [`safe_image_src`]; section ids and image styles are
/// never written. The output depends only on the arguments.
pub fn to_html_with(doc: &Document, options: &ExportOptions) -> String {
    let title = encode_text(&doc.title);

    let mut lines = vec![
        "<!DOCTYPE html>".to_string(),
        format!(
            "<html lang=\"{}\">",
            encode_double_quoted_attribute(&options.lang)
        ),
        "<head>".to_string(),
        "  <meta charset=\"UTF-8\">".to_string(),
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">".to_string(),
        format!("  <title>{title}</title>"),
        "  <style>".to_string(),
    ];
    lines.extend(STYLESHEET.iter().map(|rule| format!("    {rule}")));
    lines.extend([
        "  </style>".to_string(),
        "</head>".to_string(),
        "<body>".to_string(),
        "  <div class=\"container\">".to_string(),
        format!("    <h1>{title}</h1>"),
    ]);
    lines.extend(
        doc.sections
            .iter()
            .map(|section| format!("    {}", render_section(section))),
    );
    lines.extend([
        "  </div>".to_string(),
        "</body>".to_string(),
        "</html>".to_string(),
    ]);

    let mut html = lines.join("\n");
    html.push('\n');
    html
}

fn render_section(section: &Section) -> String {
    match section.kind {
        SectionKind::Text => {
            let style = &section.style;
            format!(
                "<p style=\"font-weight: {}; font-style: {}; font-size: {}; color: {};\">{}</p>",
                if style.bold { "bold" } else { "normal" },
                if style.italic { "italic" } else { "normal" },
                style.font_size.css(),
                style.color,
                encode_text(&section.content),
            )
        }
        SectionKind::Image => format!(
            "<img src=\"{}\" alt=\"image\">",
            encode_double_quoted_attribute(safe_image_src(&section.content))
        ),
    }
}

/// Image URL to put in `src`, or [`BLOCKED_IMAGE_SRC`] when the scheme is not allowed.
///
/// Allowed: `http`, `https`, `data:image/...` and URLs without a scheme
/// (relative or protocol-relative).
pub fn safe_image_src(url: &str) -> &str {
    static SCHEME_REGEX: OnceLock<Regex> = OnceLock::new();
    let scheme_regex = SCHEME_REGEX
        .get_or_init(|| Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*):").expect("Invalid scheme regex"));

    let trimmed = url.trim();
    // Browsers ignore embedded whitespace and control characters when reading a scheme
    let compact: String = trimmed
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .collect();

    let Some(captures) = scheme_regex.captures(&compact) else {
        return trimmed;
    };

    let scheme = captures[1].to_ascii_lowercase();
    let allowed = match scheme.as_str() {
        "http" | "https" => true,
        "data" => compact.to_ascii_lowercase().starts_with("data:image/"),
        _ => false,
    };

    if allowed { trimmed } else { BLOCKED_IMAGE_SRC }
}
