//! Clipboard preview
//!
//! Read-only text access used to show what a copy or cut just captured.
//! `preview` never fails: every error condition collapses into a placeholder
//! string rendered in the popup body.

use tracing::warn;

/// Maximum preview length in characters, ellipsis included
const PREVIEW_MAX_CHARS: usize = 80;

const PREVIEW_ELLIPSIS: &str = "...";

/// Shown when the clipboard is empty, whitespace-only or holds no text
pub const EMPTY_PLACEHOLDER: &str = "[Non-text content or empty]";

/// Current clipboard text, trimmed, flattened to a single line and truncated
/// for display inside a popup
pub fn preview() -> String {
    match read_text() {
        Ok(text) => format_preview(&text).unwrap_or_else(|| EMPTY_PLACEHOLDER.to_string()),
        Err(arboard::Error::ContentNotAvailable) => EMPTY_PLACEHOLDER.to_string(),
        Err(err) => {
            warn!(error = %err, "Clipboard read failed");
            format!("[Clipboard error: {err}]")
        }
    }
}

fn read_text() -> Result<String, arboard::Error> {
    arboard::Clipboard::new()?.get_text()
}

/// Trim, flatten newlines and truncate. `None` when the content is empty or
/// whitespace-only.
fn format_preview(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let flattened = flatten_newlines(trimmed);
    if flattened.chars().count() <= PREVIEW_MAX_CHARS {
        return Some(flattened);
    }

    // Truncation counts chars, not bytes, so multi-byte text cannot split a
    // code point.
    let prefix: String = flattened
        .chars()
        .take(PREVIEW_MAX_CHARS - PREVIEW_ELLIPSIS.len())
        .collect();
    Some(format!("{prefix}{PREVIEW_ELLIPSIS}"))
}

fn flatten_newlines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_passes_through() {
        assert_eq!(format_preview("Hello World"), Some("Hello World".to_string()));
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(format_preview("  padded \n"), Some("padded".to_string()));
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert_eq!(format_preview(""), None);
        assert_eq!(format_preview("   \t \r\n "), None);
    }

    #[test]
    fn test_newlines_flatten_to_single_spaces() {
        assert_eq!(
            format_preview("one\ntwo\r\nthree\rfour"),
            Some("one two three four".to_string())
        );
    }

    #[test]
    fn test_long_text_truncates_to_eighty_chars() {
        let input = "x".repeat(200);
        let preview = format_preview(&input).unwrap();

        assert_eq!(preview.chars().count(), PREVIEW_MAX_CHARS);
        assert!(preview.ends_with(PREVIEW_ELLIPSIS));
        // Everything before the ellipsis is a prefix of the flattened input
        let body = &preview[..preview.len() - PREVIEW_ELLIPSIS.len()];
        assert!(input.starts_with(body));
    }

    #[test]
    fn test_exactly_eighty_chars_is_untouched() {
        let input = "y".repeat(PREVIEW_MAX_CHARS);
        assert_eq!(format_preview(&input), Some(input.clone()));

        let over = "y".repeat(PREVIEW_MAX_CHARS + 1);
        let preview = format_preview(&over).unwrap();
        assert_eq!(preview.chars().count(), PREVIEW_MAX_CHARS);
    }

    #[test]
    fn test_truncation_respects_multibyte_chars() {
        let input = "é".repeat(120);
        let preview = format_preview(&input).unwrap();

        assert_eq!(preview.chars().count(), PREVIEW_MAX_CHARS);
        assert!(preview.ends_with(PREVIEW_ELLIPSIS));
    }
}
