use serde::de::DeserializeOwned;

use crate::error::AiError;

/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}

/// Strip markdown code blocks from a response.
///
/// Handles ```` ```json ````, ```` ```JSON ```` and bare ```` ``` ```` fences,
/// with or without surrounding whitespace.
pub fn strip_code_blocks(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    };
    rest.trim_end().trim_end_matches("```").trim()
}

/// Decode a model reply into `T`, tolerating a markdown fence around the JSON.
///
/// Fenced and unfenced input decode identically; malformed JSON is an
/// `AiError::Parse` carrying the decoder message.
pub fn extract_json_payload<T: DeserializeOwned>(text: &str) -> Result<T, AiError> {
    let payload = strip_code_blocks(text);
    serde_json::from_str(payload).map_err(|e| {
        AiError::Parse(format!(
            "{e} in model reply: {}",
            truncate_to_char_boundary(payload, 200)
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_char_boundary() {
        let text = "Hello 世界";
        let truncated = truncate_to_char_boundary(text, 8);
        assert!(truncated.len() <= 8);
        assert!(text.starts_with(truncated));
    }

    #[test]
    fn test_truncate_within_bounds() {
        let text = "Hello";
        assert_eq!(truncate_to_char_boundary(text, 100), "Hello");
    }

    #[test]
    fn test_strip_code_blocks() {
        assert_eq!(strip_code_blocks("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("```JSON\n[1]\n```"), "[1]");
        assert_eq!(strip_code_blocks("```\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("  {}  "), "{}");
    }

    #[test]
    fn fenced_and_bare_payloads_decode_the_same() {
        let bare = r#"[{"keyword": "pet id card", "volume": 900}]"#;
        let fenced = format!("```json\n{bare}\n```");

        let a: serde_json::Value = extract_json_payload(bare).unwrap();
        let b: serde_json::Value = extract_json_payload(&fenced).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = extract_json_payload::<serde_json::Value>("```json\n{oops\n```").unwrap_err();
        assert!(matches!(err, AiError::Parse(_)));
    }
}
