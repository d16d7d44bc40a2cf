use crate::foundation::core::{Canvas, Point, Rect, Vec2};
use crate::scene::escape::EscapeMode;

/// Named visual styles shared by all scenes (serialized as CSS classes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleClass {
    /// Full-canvas backdrop rectangle (transparent; the rasterizer paints the background).
    Backdrop,
    /// Main comment card.
    Card,
    /// Reply card.
    ReplyCard,
    /// Avatar placeholder disc.
    Avatar,
    /// `@username` label.
    Nickname,
    /// Comment and reply body text.
    Body,
    /// Like-count label next to the like icon.
    LikeCount,
    /// Timestamp label.
    Datetime,
}

impl StyleClass {
    /// CSS class name used in serialized output.
    pub fn class_name(self) -> &'static str {
        match self {
            StyleClass::Backdrop => "bg",
            StyleClass::Card => "card-dense",
            StyleClass::ReplyCard => "reply-card",
            StyleClass::Avatar => "avatar-bg",
            StyleClass::Nickname => "nickname-dense",
            StyleClass::Body => "comment-dense",
            StyleClass::LikeCount => "like-count",
            StyleClass::Datetime => "datetime-text",
        }
    }
}

/// Reusable icon definitions referenced from the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Icon {
    /// Heart shown with the like count.
    Like,
}

impl Icon {
    /// Definition id used in serialized output.
    pub fn id(self) -> &'static str {
        match self {
            Icon::Like => "like-icon",
        }
    }
}

/// Horizontal text alignment relative to the text origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    /// Text starts at the origin.
    Start,
    /// Text is centered on the origin.
    Middle,
    /// Text ends at the origin.
    End,
}

/// One line of a multi-line text run.
#[derive(Clone, Debug, PartialEq)]
pub struct Span {
    /// Absolute x of the line start within the enclosing group.
    pub x: f64,
    /// Vertical advance from the previous line's baseline.
    pub dy: f64,
    /// Raw (unescaped) line text.
    pub text: String,
}

/// Text payload of a [`TextRun`].
#[derive(Clone, Debug, PartialEq)]
pub enum TextContent {
    /// A single line of raw text.
    Plain(String),
    /// Stacked lines.
    Spans(Vec<Span>),
}

/// A positioned piece of text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    /// Baseline origin of the first line.
    pub origin: Point,
    /// Visual style.
    pub class: StyleClass,
    /// Font size override in pixels.
    pub font_size: Option<f64>,
    /// Alignment override.
    pub anchor: Option<TextAnchor>,
    /// Raw (unescaped) content.
    pub content: TextContent,
}

impl TextRun {
    /// Single-line text run.
    pub fn plain(origin: Point, class: StyleClass, text: impl Into<String>) -> Self {
        Self {
            origin,
            class,
            font_size: None,
            anchor: None,
            content: TextContent::Plain(text.into()),
        }
    }

    /// The raw text with lines joined by `\n`.
    pub fn raw_text(&self) -> String {
        match &self.content {
            TextContent::Plain(s) => s.clone(),
            TextContent::Spans(spans) => spans
                .iter()
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// A draw directive.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Children drawn with an additional translation.
    Group {
        /// Offset applied to every child.
        translate: Vec2,
        /// Children in paint order.
        children: Vec<Node>,
    },
    /// Rounded rectangle.
    Rect {
        /// Geometry within the enclosing group.
        rect: Rect,
        /// Visual style.
        class: StyleClass,
        /// Corner radius.
        corner_radius: f64,
        /// Whether the drop-shadow filter is applied.
        shadow: bool,
    },
    /// Filled circle.
    Circle {
        /// Center within the enclosing group.
        center: Point,
        /// Radius.
        radius: f64,
        /// Visual style.
        class: StyleClass,
    },
    /// Text.
    Text(TextRun),
    /// Reference to a shared icon definition, drawn at the group origin.
    Icon(Icon),
}

/// A fixed-size vector scene for one page.
///
/// Text is stored raw; escaping happens during serialization according to `escape`.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Canvas size.
    pub canvas: Canvas,
    /// Top-level nodes in paint order.
    pub nodes: Vec<Node>,
    /// Escaping applied to user text when serialized.
    pub escape: EscapeMode,
}

impl Scene {
    /// Visit every node depth-first in paint order, with the absolute offset of its group.
    pub fn visit<'a>(&'a self, mut f: impl FnMut(&'a Node, Vec2)) {
        fn walk<'a>(nodes: &'a [Node], origin: Vec2, f: &mut impl FnMut(&'a Node, Vec2)) {
            for node in nodes {
                f(node, origin);
                if let Node::Group {
                    translate,
                    children,
                } = node
                {
                    walk(children, origin + *translate, f);
                }
            }
        }
        walk(&self.nodes, Vec2::ZERO, &mut f);
    }

    /// All text runs in paint order.
    pub fn text_runs(&self) -> Vec<&TextRun> {
        let mut out = Vec::new();
        self.visit(|node, _| {
            if let Node::Text(run) = node {
                out.push(run);
            }
        });
        out
    }

    /// Absolute bounds of every rectangle with `class`, in paint order.
    pub fn rects_with_class(&self, class: StyleClass) -> Vec<Rect> {
        let mut out = Vec::new();
        self.visit(|node, origin| {
            if let Node::Rect { rect, class: c, .. } = node
                && *c == class
            {
                out.push(*rect + origin);
            }
        });
        out
    }

    /// Stable 64-bit hash of the serialized SVG.
    pub fn fingerprint(&self) -> u64 {
        xxhash_rust::xxh3::xxh3_64(self.to_svg().as_bytes())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
