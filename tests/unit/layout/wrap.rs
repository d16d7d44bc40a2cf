use super::*;

#[test]
fn empty_text_is_one_empty_line() {
    assert_eq!(wrap_text("", 10).unwrap(), vec![String::new()]);
}

#[test]
fn short_text_is_a_single_line() {
    assert_eq!(wrap_text("hello", 10).unwrap(), vec!["hello".to_string()]);
}

#[test]
fn exact_multiple_has_no_trailing_empty_line() {
    assert_eq!(
        wrap_text("abcdef", 3).unwrap(),
        vec!["abc".to_string(), "def".to_string()]
    );
}

#[test]
fn breaks_mid_word() {
    assert_eq!(
        wrap_text("hello world", 4).unwrap(),
        vec!["hell".to_string(), "o wo".to_string(), "rld".to_string()]
    );
}

#[test]
fn counts_characters_not_bytes() {
    let lines = wrap_text("评论评论评论评", 3).unwrap();
    assert_eq!(lines, vec!["评论评", "论评论", "评"]);
}

#[test]
fn zero_width_is_invalid() {
    assert!(matches!(
        wrap_text("x", 0).unwrap_err(),
        CardError::InvalidArgument(_)
    ));
}
