//! JSON candidate recovery from free-form reply text.
//!
//! Prompt-coerced providers promise a JSON-only reply but routinely wrap
//! it in markdown fences or prose anyway. This module scans the reply
//! text for the first value that actually parses; finding none leaves
//! the adapter's candidate empty, which the extraction pipeline then
//! classifies as a malformed reply.

use serde_json::Value as JsonValue;

/// Recover a JSON value from reply text.
///
/// Tries, in order: the whole trimmed text, the first fenced code block,
/// the first brace-balanced object, the first bracket-balanced array.
#[must_use]
pub fn scan_json(text: &str) -> Option<JsonValue> {
    let text = text.trim();
    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }
    if let Some(value) = fenced_block(text) {
        return Some(value);
    }
    if let Some(value) = delimited(text, '{', '}') {
        return Some(value);
    }
    delimited(text, '[', ']')
}

/// Parse the contents of the first ``` fence, skipping any language tag.
fn fenced_block(text: &str) -> Option<JsonValue> {
    let start = text.find("```")?;
    let rest = &text[start + 3..];
    let content_start = rest.find('\n').map(|i| i + 1).unwrap_or(0);
    let rest = &rest[content_start..];
    let end = rest.find("```")?;
    serde_json::from_str(rest[..end].trim()).ok()
}

/// Find the first balanced `open`..`close` span that parses, tracking
/// string literals and escapes so delimiters inside strings don't count.
fn delimited(text: &str, open: char, close: char) -> Option<JsonValue> {
    let start = text.find(open)?;
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    let candidate = &text[start..=start + i];
                    if let Ok(value) = serde_json::from_str(candidate) {
                        return Some(value);
                    }
                }
            }
            _ => {}
        }
    }
    None
}
