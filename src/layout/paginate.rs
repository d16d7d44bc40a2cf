use crate::layout::engine::LaidOutComment;

/// Height budget of one page. The canvas is 1080 px tall; 20 px are reserved for the top margin.
pub const MAX_PAGE_HEIGHT: f64 = 1060.0;

/// A non-empty run of consecutive laid-out comments rendered onto one canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    /// Comments in original order.
    pub items: Vec<LaidOutComment>,
}

impl Page {
    /// Sum of the items' total heights.
    pub fn height(&self) -> f64 {
        self.items.iter().map(|c| c.layout.total_height).sum()
    }

    /// Number of top-level comments on the page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Pages produced by [`paginate`] are never empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `true` when the page holds a single comment taller than [`MAX_PAGE_HEIGHT`].
    pub fn is_oversized(&self) -> bool {
        self.height() > MAX_PAGE_HEIGHT
    }
}

/// Greedily pack comments into pages, preserving order.
///
/// A page is closed when adding the next comment would push its height past
/// [`MAX_PAGE_HEIGHT`]. Comments are never split or reordered, so a comment taller than the
/// budget ends up alone on its own page.
pub fn paginate(items: Vec<LaidOutComment>) -> Vec<Page> {
    paginate_with_limit(items, MAX_PAGE_HEIGHT)
}

/// [`paginate`] with an explicit height budget.
pub fn paginate_with_limit(items: Vec<LaidOutComment>, max_height: f64) -> Vec<Page> {
    let mut pages = Vec::new();
    let mut current = Vec::new();
    let mut current_height = 0.0;

    for item in items {
        let h = item.layout.total_height;
        if current_height + h > max_height && !current.is_empty() {
            pages.push(Page {
                items: std::mem::take(&mut current),
            });
            current_height = 0.0;
        }
        current_height += h;
        current.push(item);
    }
    if !current.is_empty() {
        pages.push(Page { items: current });
    }
    pages
}

#[cfg(test)]
#[path = "../../tests/unit/layout/paginate.rs"]
mod tests;
