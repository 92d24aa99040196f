// Best-effort recovery of a JSON value embedded in free-form model output.

use serde_json::Value;

/// Returns the first balanced `{...}` or `[...]` span in `text` that parses
/// as JSON. Brackets inside string literals are ignored. Spans that balance
/// but fail to parse (e.g. `[note]` in prose) are skipped.
pub fn extract_json(text: &str) -> Option<Value> {
    text.char_indices()
        .filter(|(_, c)| matches!(c, '{' | '['))
        .filter_map(|(start, _)| balanced_span(&text[start..]))
        .find_map(|span| serde_json::from_str(span).ok())
}

/// `s` must start with `{` or `[`. Returns the prefix of `s` up to and
/// including the matching closer, or `None` if it never closes.
fn balanced_span(s: &str) -> Option<&str> {
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.pop() != Some(c) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(&s[..i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}
