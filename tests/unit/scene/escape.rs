use super::*;

#[test]
fn plain_text_is_borrowed() {
    assert!(matches!(
        escape_markup("hello 你好", EscapeMode::Correct),
        Cow::Borrowed(_)
    ));
}

#[test]
fn correct_mode_escapes_all_specials() {
    assert_eq!(
        escape_markup(r#"<a href="x">Tom & 'Jerry'</a>"#, EscapeMode::Correct),
        "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
    );
}

#[test]
fn legacy_mode_reproduces_old_mapping() {
    assert_eq!(
        escape_markup(r#"<script>"x" & 'y'"#, EscapeMode::Legacy),
        "&lt;script&quot;\"x\" &amp; &#039;y&#039;"
    );
}

#[test]
fn ampersand_is_escaped_first_only_once() {
    assert_eq!(escape_markup("&lt;", EscapeMode::Correct), "&amp;lt;");
}

#[test]
fn non_xml_characters_are_replaced_in_both_modes() {
    for mode in [EscapeMode::Correct, EscapeMode::Legacy] {
        assert_eq!(
            escape_markup("hi\u{1}there\u{b}\u{1f}\u{fffe}", mode),
            "hi\u{fffd}there\u{fffd}\u{fffd}\u{fffd}"
        );
    }
}

#[test]
fn tab_newline_and_astral_chars_pass_through() {
    assert!(matches!(
        escape_markup("a\tb\r\nc 😀 \u{e000}", EscapeMode::Correct),
        Cow::Borrowed(_)
    ));
}
