//! Text normalization shared by the HTML and PDF extractors.

use crate::sources::PaperError;

/// Collapse every whitespace run (newlines and tabs included) to one space and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max_chars` characters of `text`, never splitting a code point
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Reject text shorter than `min_chars` characters as a stub.
///
/// `origin` names the rendering in the error ("HTML", "PDF").
pub fn ensure_min_length(text: String, min_chars: usize, origin: &str) -> Result<String, PaperError> {
    let chars = text.chars().count();
    if chars < min_chars {
        return Err(PaperError::Extraction(format!(
            "{} text content too short ({} of at least {} characters)",
            origin, chars, min_chars
        )));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            normalize_whitespace("  Deep\n\n learning\t\tfor\r\n  proofs  "),
            "Deep learning for proofs"
        );
        assert_eq!(normalize_whitespace("a\u{a0}b"), "a b");
        assert_eq!(normalize_whitespace(" \n\t "), "");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_ensure_min_length() {
        assert!(ensure_min_length("x".repeat(100), 100, "PDF").is_ok());

        let err = ensure_min_length("x".repeat(99), 100, "PDF").unwrap_err();
        assert!(matches!(err, PaperError::Extraction(_)));
        assert!(err.to_string().contains("PDF text content too short"));
    }

    #[test]
    fn test_ensure_min_length_counts_characters() {
        // 50 two-byte characters are 100 bytes but only 50 characters
        assert!(ensure_min_length("é".repeat(50), 100, "HTML").is_err());
    }
}
