use crate::comments::model::Reply;
use crate::foundation::core::{Canvas, Point, Rect, Vec2};
use crate::layout::engine::{LaidOutComment, LayoutParams, ReplyLayout};
use crate::layout::paginate::Page;
use crate::scene::escape::EscapeMode;
use crate::scene::model::{Icon, Node, Scene, Span, StyleClass, TextAnchor, TextContent, TextRun};

const CONTENT_X: f64 = 40.0;
const CONTENT_TOP: f64 = 20.0;

const MAIN_CARD_WIDTH: f64 = 1000.0;
const MAIN_CARD_RADIUS: f64 = 8.0;
const MAIN_AVATAR: (f64, f64, f64) = (35.0, 22.5, 15.0);
const MAIN_TEXT_X: f64 = 65.0;
const MAIN_DATETIME_X: f64 = 800.0;
const LIKE_ANCHOR: Vec2 = Vec2::new(930.0, 15.0);
const LIKE_LABEL: Point = Point::new(25.0, 10.0);

const REPLY_INDENT: f64 = 50.0;
const REPLY_CARD_WIDTH: f64 = 950.0;
const REPLY_CARD_RADIUS: f64 = 6.0;
const REPLY_AVATAR: (f64, f64, f64) = (32.0, 22.5, 12.0);
const REPLY_TEXT_X: f64 = 55.0;
const REPLY_TEXT_Y: f64 = 37.5;
const REPLY_FONT_SIZE: f64 = 13.0;
const REPLY_DATETIME_X: f64 = 780.0;

const HEADER_BASELINE: f64 = 19.5;

/// Options for [`render_page_with`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneOpts {
    /// Canvas size written into the scene.
    pub canvas: Canvas,
    /// Escaping applied when the scene is serialized.
    pub escape: EscapeMode,
    /// Metrics used for gaps and line spacing; must match the ones used for layout.
    pub params: LayoutParams,
}

impl Default for SceneOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas::SQUARE_1080,
            escape: EscapeMode::default(),
            params: LayoutParams::DEFAULT,
        }
    }
}

/// Build the scene for `page` with default options.
pub fn render_page(page: &Page) -> Scene {
    render_page_with(page, &SceneOpts::default())
}

/// Build the scene for `page`.
///
/// Cards are stacked from `y = 20` with a vertical cursor: every main card advances it by its
/// height, every reply by the reply gap plus its height, and every comment by the card gap.
pub fn render_page_with(page: &Page, opts: &SceneOpts) -> Scene {
    let params = &opts.params;
    let mut children = Vec::with_capacity(page.items.len() * 2);
    let mut y = CONTENT_TOP;

    for item in &page.items {
        children.push(main_card(item, y, params));
        y += item.layout.main_card_height;

        for (reply, layout) in item.replies() {
            y += params.reply_gap;
            children.push(reply_card(reply, layout, y, params));
            y += layout.card_height;
        }
        y += params.card_gap;
    }

    Scene {
        canvas: opts.canvas,
        nodes: vec![Node::Group {
            translate: Vec2::new(CONTENT_X, 0.0),
            children,
        }],
        escape: opts.escape,
    }
}

fn main_card(item: &LaidOutComment, y: f64, params: &LayoutParams) -> Node {
    let comment = &item.comment;
    let layout = &item.layout;

    let mut nodes = vec![
        Node::Rect {
            rect: Rect::new(0.0, 0.0, MAIN_CARD_WIDTH, layout.main_card_height),
            class: StyleClass::Card,
            corner_radius: MAIN_CARD_RADIUS,
            shadow: true,
        },
        avatar(MAIN_AVATAR),
        nickname(MAIN_TEXT_X, &comment.username),
    ];
    if let Some(datetime) = &comment.datetime {
        nodes.push(datetime_label(MAIN_DATETIME_X, datetime));
    }
    nodes.push(Node::Text(TextRun {
        origin: Point::new(MAIN_TEXT_X, params.text_y_offset),
        class: StyleClass::Body,
        font_size: None,
        anchor: None,
        content: stacked_lines(MAIN_TEXT_X, &layout.main_text_lines, params.line_height),
    }));
    if let Some(likes) = comment.likes {
        nodes.push(Node::Group {
            translate: LIKE_ANCHOR,
            children: vec![
                Node::Icon(Icon::Like),
                Node::Text(TextRun {
                    anchor: Some(TextAnchor::Start),
                    ..TextRun::plain(LIKE_LABEL, StyleClass::LikeCount, likes.to_string())
                }),
            ],
        });
    }

    Node::Group {
        translate: Vec2::new(0.0, y),
        children: nodes,
    }
}

fn reply_card(reply: &Reply, layout: &ReplyLayout, y: f64, params: &LayoutParams) -> Node {
    let mut nodes = vec![
        Node::Rect {
            rect: Rect::new(0.0, 0.0, REPLY_CARD_WIDTH, layout.card_height),
            class: StyleClass::ReplyCard,
            corner_radius: REPLY_CARD_RADIUS,
            shadow: false,
        },
        avatar(REPLY_AVATAR),
        nickname(REPLY_TEXT_X, &reply.username),
    ];
    if let Some(datetime) = &reply.datetime {
        nodes.push(datetime_label(REPLY_DATETIME_X, datetime));
    }
    nodes.push(Node::Text(TextRun {
        origin: Point::new(REPLY_TEXT_X, REPLY_TEXT_Y),
        class: StyleClass::Body,
        font_size: Some(REPLY_FONT_SIZE),
        anchor: None,
        content: stacked_lines(REPLY_TEXT_X, &layout.text_lines, params.line_height),
    }));

    Node::Group {
        translate: Vec2::new(REPLY_INDENT, y),
        children: nodes,
    }
}

fn avatar((cx, cy, r): (f64, f64, f64)) -> Node {
    Node::Circle {
        center: Point::new(cx, cy),
        radius: r,
        class: StyleClass::Avatar,
    }
}

fn nickname(x: f64, username: &str) -> Node {
    Node::Text(TextRun::plain(
        Point::new(x, HEADER_BASELINE),
        StyleClass::Nickname,
        format!("@{username}"),
    ))
}

fn datetime_label(x: f64, datetime: &str) -> Node {
    Node::Text(TextRun::plain(
        Point::new(x, HEADER_BASELINE),
        StyleClass::Datetime,
        datetime,
    ))
}

fn stacked_lines(x: f64, lines: &[String], line_height: f64) -> TextContent {
    TextContent::Spans(
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| Span {
                x,
                dy: if i == 0 { 0.0 } else { line_height },
                text: line.clone(),
            })
            .collect(),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/scene/build.rs"]
mod tests;
