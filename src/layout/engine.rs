use crate::comments::model::Comment;
use crate::foundation::error::{CardError, CardResult};
use crate::layout::wrap::wrap_text;

/// Pixel metrics that drive card heights.
///
/// The defaults reproduce the reference card geometry exactly; changing them changes the
/// rendered output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParams {
    /// Baseline of the first main-text line, relative to the card top.
    pub text_y_offset: f64,
    /// Distance between consecutive text baselines.
    pub line_height: f64,
    /// Space after the last card of a comment (main card or final reply).
    pub card_gap: f64,
    /// Space before every reply card.
    pub reply_gap: f64,
    /// Wrap width of main comment text, in characters.
    pub main_max_width_chars: usize,
    /// Wrap width of reply text, in characters.
    pub reply_max_width_chars: usize,
    /// How much higher the first reply line sits than the first main line.
    pub reply_text_lift: f64,
    /// Space below the last text baseline.
    pub bottom_padding: f64,
    /// Lower bound for every card height.
    pub min_card_height: f64,
}

impl LayoutParams {
    /// Reference metrics.
    pub const DEFAULT: LayoutParams = LayoutParams {
        text_y_offset: 38.5,
        line_height: 18.0,
        card_gap: 5.0,
        reply_gap: 2.0,
        main_max_width_chars: 60,
        reply_max_width_chars: 55,
        reply_text_lift: 10.0,
        bottom_padding: 10.0,
        min_card_height: 45.0,
    };

    /// Baseline of the first reply-text line, relative to the reply card top.
    pub fn reply_text_y_offset(&self) -> f64 {
        self.text_y_offset - self.reply_text_lift
    }

    /// Check that wrap widths and metrics are usable.
    pub fn validate(&self) -> CardResult<()> {
        if self.main_max_width_chars == 0 || self.reply_max_width_chars == 0 {
            return Err(CardError::invalid_argument("wrap widths must be positive"));
        }
        let metrics = [
            self.text_y_offset,
            self.line_height,
            self.card_gap,
            self.reply_gap,
            self.reply_text_lift,
            self.bottom_padding,
            self.min_card_height,
        ];
        if metrics.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(CardError::invalid_argument(
                "layout metrics must be finite and non-negative",
            ));
        }
        Ok(())
    }

    fn card_height(&self, first_baseline: f64, line_count: usize) -> f64 {
        let text_height = first_baseline + (line_count.saturating_sub(1) as f64) * self.line_height;
        (text_height + self.bottom_padding).max(self.min_card_height)
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Wrapped text and card height of one reply.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplyLayout {
    /// Wrapped reply text.
    pub text_lines: Vec<String>,
    /// Reply card height in pixels.
    pub card_height: f64,
}

/// Pixel layout derived from a [`Comment`].
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutInfo {
    /// Wrapped main text.
    pub main_text_lines: Vec<String>,
    /// Main card height in pixels.
    pub main_card_height: f64,
    /// One entry per reply, parallel to `Comment::replies`.
    pub replies_layout: Vec<ReplyLayout>,
    /// Main card, every reply card with its leading gap, and the trailing card gap.
    pub total_height: f64,
}

/// A comment paired with its computed layout.
#[derive(Clone, Debug, PartialEq)]
pub struct LaidOutComment {
    /// The source comment, unchanged.
    pub comment: Comment,
    /// Derived layout.
    pub layout: LayoutInfo,
}

impl LaidOutComment {
    /// Iterate replies together with their layouts, in original order.
    pub fn replies(&self) -> impl Iterator<Item = (&crate::comments::model::Reply, &ReplyLayout)> {
        self.comment
            .replies
            .iter()
            .zip(self.layout.replies_layout.iter())
    }
}

/// Compute the layout of `comment` with the reference metrics.
pub fn compute_layout(comment: Comment) -> CardResult<LaidOutComment> {
    compute_layout_with(comment, &LayoutParams::DEFAULT)
}

/// Compute the layout of `comment` with explicit metrics.
pub fn compute_layout_with(comment: Comment, params: &LayoutParams) -> CardResult<LaidOutComment> {
    let main_text_lines = wrap_text(&comment.text, params.main_max_width_chars)?;
    let main_card_height = params.card_height(params.text_y_offset, main_text_lines.len());

    let mut total_height = main_card_height;
    let mut replies_layout = Vec::with_capacity(comment.replies.len());
    for reply in &comment.replies {
        let text_lines = wrap_text(&reply.text, params.reply_max_width_chars)?;
        let card_height = params.card_height(params.reply_text_y_offset(), text_lines.len());
        total_height += card_height + params.reply_gap;
        replies_layout.push(ReplyLayout {
            text_lines,
            card_height,
        });
    }
    total_height += params.card_gap;

    Ok(LaidOutComment {
        comment,
        layout: LayoutInfo {
            main_text_lines,
            main_card_height,
            replies_layout,
            total_height,
        },
    })
}

/// Lay out every comment in order.
pub fn layout_comments(
    comments: Vec<Comment>,
    params: &LayoutParams,
) -> CardResult<Vec<LaidOutComment>> {
    params.validate()?;
    comments
        .into_iter()
        .map(|c| compute_layout_with(c, params))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
