use super::*;
use crate::comments::model::Comment;
use crate::layout::engine::{LayoutInfo, compute_layout};

fn item_with_height(name: &str, total_height: f64) -> LaidOutComment {
    LaidOutComment {
        comment: Comment::new(name, ""),
        layout: LayoutInfo {
            main_text_lines: vec![String::new()],
            main_card_height: 45.0,
            replies_layout: Vec::new(),
            total_height,
        },
    }
}

fn names(page: &Page) -> Vec<&str> {
    page.items
        .iter()
        .map(|c| c.comment.username.as_str())
        .collect()
}

#[test]
fn empty_input_yields_no_pages() {
    assert!(paginate(Vec::new()).is_empty());
}

#[test]
fn single_comment_is_one_page() {
    let pages = paginate(vec![compute_layout(Comment::new("a", "hi")).unwrap()]);
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].len(), 1);
}

#[test]
fn exact_fit_stays_on_page() {
    let pages = paginate(vec![
        item_with_height("a", 500.0),
        item_with_height("b", 560.0),
        item_with_height("c", 1.0),
    ]);
    assert_eq!(pages.len(), 2);
    assert_eq!(names(&pages[0]), vec!["a", "b"]);
    assert_eq!(pages[0].height(), 1060.0);
    assert_eq!(names(&pages[1]), vec!["c"]);
}

#[test]
fn oversized_comment_is_a_singleton_page() {
    let pages = paginate(vec![
        item_with_height("a", 100.0),
        item_with_height("huge", 2000.0),
        item_with_height("b", 100.0),
    ]);
    assert_eq!(pages.len(), 3);
    assert_eq!(names(&pages[1]), vec!["huge"]);
    assert!(pages[1].is_oversized());
    assert!(!pages[0].is_oversized());
}

#[test]
fn oversized_first_item_does_not_create_empty_page() {
    let pages = paginate(vec![item_with_height("huge", 5000.0)]);
    assert_eq!(pages.len(), 1);
    assert!(!pages[0].is_empty());
}

#[test]
fn custom_limit_is_honored() {
    let pages = paginate_with_limit(
        vec![
            item_with_height("a", 10.0),
            item_with_height("b", 10.0),
            item_with_height("c", 10.0),
        ],
        20.0,
    );
    assert_eq!(pages.len(), 2);
    assert_eq!(names(&pages[0]), vec!["a", "b"]);
}
