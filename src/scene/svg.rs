use crate::scene::escape::{EscapeMode, escape_markup};
use crate::scene::model::{Icon, Node, Scene, StyleClass, TextAnchor, TextContent, TextRun};

const SHADOW_FILTER_ID: &str = "shadow";

const LIKE_ICON_PATH: &str = "M12 21.35l-1.45-1.32C5.4 15.36 2 12.28 2 8.5 2 5.42 4.42 3 7.5 3c1.74 0 3.41.81 4.5 2.09C13.09 3.81 14.76 3 16.5 3 19.58 3 22 5.42 22 8.5c0 3.78-3.4 6.86-8.55 11.54L12 21.35z";

const STYLESHEET: &str = "\
.bg { fill: transparent; }
.card-dense { fill: rgba(255, 255, 255, 0.96); stroke: rgba(0, 0, 0, 0.05); stroke-width: 1; }
.avatar-bg { fill: #FFE0B2; }
.nickname-dense { font-family: sans-serif; font-size: 15px; font-weight: 700; fill: #BF360C; }
.comment-dense { font-family: sans-serif; font-size: 14px; fill: #37474F; }
.like-count { font-family: sans-serif; font-size: 12px; fill: #FF6B6B; font-weight: 600; alignment-baseline: middle; }
.reply-card { fill: rgba(247, 247, 247, 0.98); }
.datetime-text { font-family: sans-serif; font-size: 12px; fill: #999999; }
";

impl Scene {
    /// Serialize to a self-contained SVG document.
    ///
    /// The output depends only on the scene value, so equal scenes serialize to identical bytes.
    pub fn to_svg(&self) -> String {
        let mut w = SvgWriter {
            out: String::with_capacity(4096),
            escape: self.escape,
        };
        let (cw, ch) = (self.canvas.width, self.canvas.height);
        w.line(&format!(
            r#"<svg width="{cw}" height="{ch}" viewBox="0 0 {cw} {ch}" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">"#
        ));
        w.defs();
        w.line(&format!(
            r#"<rect width="{cw}" height="{ch}" class="{}"/>"#,
            StyleClass::Backdrop.class_name()
        ));
        for node in &self.nodes {
            w.node(node);
        }
        w.line("</svg>");
        w.out
    }
}

struct SvgWriter {
    out: String,
    escape: EscapeMode,
}

impl SvgWriter {
    fn line(&mut self, s: &str) {
        self.out.push_str(s);
        self.out.push('\n');
    }

    fn defs(&mut self) {
        self.line("<defs>");
        self.line(&format!(
            r##"<filter id="{SHADOW_FILTER_ID}" x="-20%" y="-20%" width="140%" height="140%"><feDropShadow dx="2" dy="3" stdDeviation="3" flood-color="#000000" flood-opacity="0.15"/></filter>"##
        ));
        self.line(&format!(
            r##"<g id="{}" transform="scale(0.9)"><path fill="#FF6B6B" d="{LIKE_ICON_PATH}"/></g>"##,
            Icon::Like.id()
        ));
        self.line("<style>");
        self.out.push_str(STYLESHEET);
        self.line("</style>");
        self.line("</defs>");
    }

    fn node(&mut self, node: &Node) {
        match node {
            Node::Group {
                translate,
                children,
            } => {
                self.line(&format!(
                    r#"<g transform="translate({}, {})">"#,
                    num(translate.x),
                    num(translate.y)
                ));
                for child in children {
                    self.node(child);
                }
                self.line("</g>");
            }
            Node::Rect {
                rect,
                class,
                corner_radius,
                shadow,
            } => {
                let mut s = String::from("<rect");
                if rect.x0 != 0.0 || rect.y0 != 0.0 {
                    s.push_str(&format!(r#" x="{}" y="{}""#, num(rect.x0), num(rect.y0)));
                }
                s.push_str(&format!(
                    r#" width="{}" height="{}""#,
                    num(rect.width()),
                    num(rect.height())
                ));
                if *corner_radius > 0.0 {
                    let r = num(*corner_radius);
                    s.push_str(&format!(r#" rx="{r}" ry="{r}""#));
                }
                s.push_str(&format!(r#" class="{}""#, class.class_name()));
                if *shadow {
                    s.push_str(&format!(r#" filter="url(#{SHADOW_FILTER_ID})""#));
                }
                s.push_str("/>");
                self.line(&s);
            }
            Node::Circle {
                center,
                radius,
                class,
            } => {
                self.line(&format!(
                    r#"<circle cx="{}" cy="{}" r="{}" class="{}"/>"#,
                    num(center.x),
                    num(center.y),
                    num(*radius),
                    class.class_name()
                ));
            }
            Node::Text(run) => self.text(run),
            Node::Icon(icon) => {
                self.line(&format!(r##"<use xlink:href="#{}"/>"##, icon.id()));
            }
        }
    }

    fn text(&mut self, run: &TextRun) {
        let mut s = format!(
            r#"<text x="{}" y="{}" class="{}""#,
            num(run.origin.x),
            num(run.origin.y),
            run.class.class_name()
        );
        if let Some(size) = run.font_size {
            s.push_str(&format!(r#" font-size="{}""#, num(size)));
        }
        if let Some(anchor) = run.anchor {
            let a = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            s.push_str(&format!(r#" text-anchor="{a}""#));
        }
        s.push('>');
        match &run.content {
            TextContent::Plain(text) => s.push_str(&escape_markup(text, self.escape)),
            TextContent::Spans(spans) => {
                for span in spans {
                    s.push_str(&format!(
                        r#"<tspan x="{}" dy="{}">{}</tspan>"#,
                        num(span.x),
                        num(span.dy),
                        escape_markup(&span.text, self.escape)
                    ));
                }
            }
        }
        s.push_str("</text>");
        self.line(&s);
    }
}

// Integral values print without a fractional part and `-0` prints as `0`.
fn num(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    format!("{v}")
}

#[cfg(test)]
#[path = "../../tests/unit/scene/svg.rs"]
mod tests;
