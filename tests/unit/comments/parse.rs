use super::*;

#[test]
fn object_with_comments_field() {
    let json = r#"{"comments":[{"author":"a","text":"hi","like_count":3,"datetime":"2024-01-01","replies":[]}]}"#;
    let comments = parse_comments(json).unwrap();
    assert_eq!(comments.len(), 1);
    let c = &comments[0];
    assert_eq!(c.username, "a");
    assert_eq!(c.text, "hi");
    assert_eq!(c.likes, Some(3));
    assert_eq!(c.datetime.as_deref(), Some("2024-01-01"));
    assert!(c.replies.is_empty());
}

#[test]
fn top_level_array_keeps_order() {
    let json = r#"[{"author":"first","text":"1"},{"author":"second","text":"2"}]"#;
    let comments = parse_comments(json).unwrap();
    let names: Vec<_> = comments.iter().map(|c| c.username.as_str()).collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[test]
fn missing_and_empty_fields_take_defaults() {
    let json = r#"[{"author":"","like_count":null,"datetime":""},{}]"#;
    let comments = parse_comments(json).unwrap();
    for c in &comments {
        assert_eq!(c.username, UNKNOWN_USER);
        assert_eq!(c.text, "");
        assert_eq!(c.likes, Some(0));
        assert_eq!(c.datetime, None);
        assert!(c.replies.is_empty());
    }
}

#[test]
fn replies_keep_only_allowlisted_fields() {
    let json = r#"[{
        "author": "op",
        "text": "root",
        "replies": [
            {"author":"r1","text":"first","datetime":"1h","id":"x","parent":"y","author_is_uploader":true},
            {"text":"second"}
        ]
    }]"#;
    let comments = parse_comments(json).unwrap();
    let replies = &comments[0].replies;
    assert_eq!(
        replies[0],
        Reply {
            username: "r1".into(),
            text: "first".into(),
            datetime: Some("1h".into()),
        }
    );
    assert_eq!(replies[1].username, UNKNOWN_USER);
    assert_eq!(replies[1].datetime, None);
}

#[test]
fn non_array_replies_are_ignored() {
    let json = r#"[{"author":"op","text":"x","replies":"nope"}]"#;
    let comments = parse_comments(json).unwrap();
    assert!(comments[0].replies.is_empty());
}

#[test]
fn object_without_comments_is_empty() {
    assert!(parse_comments(r#"{"title":"video"}"#).unwrap().is_empty());
}

#[test]
fn malformed_json_is_a_parse_error_with_cause() {
    let err = parse_comments(r#"[{"author": "a""#).unwrap_err();
    assert!(matches!(err, CardError::Parse(_)));
    assert!(err.to_string().contains("invalid JSON"));
}

#[test]
fn non_json_text_is_rejected_before_parsing() {
    let err = parse_comments("# heading\n- a comment").unwrap_err();
    assert!(matches!(err, CardError::Parse(_)));
    assert!(err.to_string().contains("unrecognized input format"));
}

#[test]
fn non_object_comment_names_the_comment() {
    let err = parse_comments(r#"[{"author":"a"},"just text"]"#).unwrap_err();
    assert!(matches!(err, CardError::Parse(_)));
    assert!(err.to_string().contains("comment 1"));
}

#[test]
fn comments_field_must_be_array() {
    let err = parse_comments(r#"{"comments":{"a":1}}"#).unwrap_err();
    assert!(err.to_string().contains("must be an array"));
}

#[test]
fn odd_like_counts_are_coerced() {
    let json = r#"[
        {"author":"a","like_count":1.5},
        {"author":"b","like_count":-1},
        {"author":"c","like_count":"12"},
        {"author":"d","like_count":" 7.9 "},
        {"author":"e","like_count":"lots"},
        {"author":"f","like_count":true},
        {"author":"g","like_count":1e30}
    ]"#;
    let likes: Vec<_> = parse_comments(json)
        .unwrap()
        .iter()
        .map(|c| c.likes)
        .collect();
    assert_eq!(
        likes,
        vec![
            Some(1),
            Some(0),
            Some(12),
            Some(7),
            Some(0),
            Some(0),
            Some(u64::MAX)
        ]
    );
}

#[test]
fn non_string_text_fields_are_written_out() {
    let json = r#"[
        {"author":404,"text":42,"datetime":2024},
        {"author":0,"text":2.0,"datetime":false},
        {"author":true,"text":-0.25,"datetime":["x"],
         "replies":[{"author":7,"text":{"k":1},"datetime":1.5}]}
    ]"#;
    let comments = parse_comments(json).unwrap();

    assert_eq!(comments[0].username, "404");
    assert_eq!(comments[0].text, "42");
    assert_eq!(comments[0].datetime.as_deref(), Some("2024"));

    assert_eq!(comments[1].username, UNKNOWN_USER);
    assert_eq!(comments[1].text, "2");
    assert_eq!(comments[1].datetime, None);

    assert_eq!(comments[2].username, "true");
    assert_eq!(comments[2].text, "-0.25");
    assert_eq!(comments[2].datetime, None);
    let reply = &comments[2].replies[0];
    assert_eq!(reply.username, "7");
    assert_eq!(reply.text, "");
    assert_eq!(reply.datetime.as_deref(), Some("1.5"));
}
