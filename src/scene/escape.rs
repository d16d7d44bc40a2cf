use std::borrow::Cow;

/// How user-supplied strings are escaped when a scene is serialized to SVG.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscapeMode {
    /// Standard XML escaping of `&`, `<`, `>`, `'` and `"`.
    #[default]
    Correct,
    /// Byte-compatible with the legacy generator: `>` becomes `&quot;` and `"` is left alone.
    ///
    /// Still safe for text content (no raw `<` survives) but renders `>` as `"`.
    Legacy,
}

/// Escape `s` for embedding in SVG text content.
///
/// Characters that XML 1.0 does not allow (most C0 controls, U+FFFE, U+FFFF) are replaced with
/// U+FFFD in both modes.
pub fn escape_markup(s: &str, mode: EscapeMode) -> Cow<'_, str> {
    let needs = |c: char| {
        !is_xml_char(c)
            || match mode {
                EscapeMode::Correct => matches!(c, '&' | '<' | '>' | '\'' | '"'),
                EscapeMode::Legacy => matches!(c, '&' | '<' | '>' | '\''),
            }
    };
    if !s.chars().any(needs) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match (c, mode) {
            ('&', _) => out.push_str("&amp;"),
            ('<', _) => out.push_str("&lt;"),
            ('>', EscapeMode::Correct) => out.push_str("&gt;"),
            ('>', EscapeMode::Legacy) => out.push_str("&quot;"),
            ('\'', _) => out.push_str("&#039;"),
            ('"', EscapeMode::Correct) => out.push_str("&quot;"),
            (c, _) if !is_xml_char(c) => out.push(char::REPLACEMENT_CHARACTER),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

// XML 1.0 `Char` production; `char` already excludes surrogates.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}

#[cfg(test)]
#[path = "../../tests/unit/scene/escape.rs"]
mod tests;
