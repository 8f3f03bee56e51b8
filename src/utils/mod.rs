//! Utility functions and helpers.

pub mod fs;
pub mod http;

use unicode_segmentation::UnicodeSegmentation;

/// First `max` grapheme clusters of `text`.
pub fn preview(text: &str, max: usize) -> String {
    text.graphemes(true).take(max).collect()
}

/// Like [`preview`], with `...` appended when something was cut.
pub fn preview_with_ellipsis(text: &str, max: usize) -> String {
    let mut graphemes = text.graphemes(true);
    let mut out: String = graphemes.by_ref().take(max).collect();
    if graphemes.next().is_some() {
        out.push_str("...");
    }
    out
}

/// Subject line of a commit message.
pub fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or("")
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
