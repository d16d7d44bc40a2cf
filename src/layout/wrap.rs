use crate::foundation::error::{CardError, CardResult};

/// Split `text` into display lines of at most `max_chars` characters.
///
/// This is a fixed-width wrap: characters are accumulated and a line is closed as soon as it
/// holds `max_chars` of them, so words may be broken. Characters are Unicode scalar values.
/// Empty input yields a single empty line, never an empty sequence, and concatenating the
/// returned lines reproduces `text` exactly.
pub fn wrap_text(text: &str, max_chars: usize) -> CardResult<Vec<String>> {
    if max_chars == 0 {
        return Err(CardError::invalid_argument("wrap width must be positive"));
    }
    if text.is_empty() {
        return Ok(vec![String::new()]);
    }

    let mut lines = Vec::with_capacity(text.len() / max_chars + 1);
    let mut current = String::new();
    let mut count = 0usize;
    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count >= max_chars {
            lines.push(std::mem::take(&mut current));
            count = 0;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    Ok(lines)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wrap.rs"]
mod tests;
