//! Locate JSON inside free-form model output.
//!
//! Models wrap JSON in prose or markdown fences. We take the first
//! balanced `[...]` or `{...}` span, skipping brackets that appear inside
//! string literals, and leave schema checks to the caller.

/// First balanced span opened by `open` and closed by `close`.
///
/// Returns `None` when `open` never appears or the span never closes.
pub fn first_balanced(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
        } else if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
            if depth == 0 {
                let end = start + offset + ch.len_utf8();
                return Some(&text[start..end]);
            }
        }
    }

    None
}

/// First balanced JSON array.
pub fn first_array(text: &str) -> Option<&str> {
    first_balanced(text, '[', ']')
}

/// First balanced JSON object.
pub fn first_object(text: &str) -> Option<&str> {
    first_balanced(text, '{', '}')
}
