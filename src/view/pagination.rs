//! Visitor-log pagination.

use std::fmt;

/// Page count at or below which every page gets a button
pub const COMPACT_LIMIT: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(n) => write!(f, "{}", n),
            Self::Ellipsis => f.write_str("…"),
        }
    }
}

/// Buttons for `total` pages with `current` selected.
///
/// Up to five pages are all listed. Beyond that: first page, a window of one
/// page either side of the current one, last page, with an ellipsis over
/// each gap.
pub fn page_buttons(total: u32, current: u32) -> Vec<PageButton> {
    if total <= COMPACT_LIMIT {
        return (1..=total).map(PageButton::Page).collect();
    }

    let current = current.clamp(1, total);
    let start = current.saturating_sub(1).max(2);
    let end = (current + 1).min(total - 1);

    let mut buttons = vec![PageButton::Page(1)];
    if start > 2 {
        buttons.push(PageButton::Ellipsis);
    }
    buttons.extend((start..=end).map(PageButton::Page));
    if end < total - 1 {
        buttons.push(PageButton::Ellipsis);
    }
    buttons.push(PageButton::Page(total));
    buttons
}

/// Current page and page count of the visitor table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    current: u32,
    total: u32,
}

impl Default for Pager {
    fn default() -> Self {
        Self { current: 1, total: 1 }
    }
}

impl Pager {
    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Adopt the page count from a response, keeping the current page in range
    pub fn set_total(&mut self, total: u32) {
        self.total = total.max(1);
        self.current = self.current.clamp(1, self.total);
    }

    /// Jump to `page`, clamped to `[1, total]`. Returns true when it moved.
    pub fn go_to_page(&mut self, page: u32) -> bool {
        let target = page.clamp(1, self.total);
        let moved = target != self.current;
        self.current = target;
        moved
    }

    pub fn previous(&mut self) -> bool {
        self.go_to_page(self.current.saturating_sub(1))
    }

    pub fn next(&mut self) -> bool {
        self.go_to_page(self.current.saturating_add(1))
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total
    }

    /// Back to page 1, used when the site or date changes
    pub fn reset(&mut self) {
        self.current = 1;
    }

    pub fn buttons(&self) -> Vec<PageButton> {
        page_buttons(self.total, self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageButton::{Ellipsis, Page};

    fn render(buttons: &[PageButton]) -> String {
        buttons.iter().map(|b| b.to_string()).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_middle_page_has_both_ellipses() {
        assert_eq!(render(&page_buttons(12, 6)), "1 … 5 6 7 … 12");
    }

    #[test]
    fn test_small_total_lists_all() {
        assert_eq!(page_buttons(4, 1), vec![Page(1), Page(2), Page(3), Page(4)]);
        assert_eq!(page_buttons(5, 3).len(), 5);
    }

    #[test]
    fn test_edges_skip_redundant_ellipsis() {
        assert_eq!(page_buttons(12, 1), vec![Page(1), Page(2), Ellipsis, Page(12)]);
        assert_eq!(page_buttons(12, 3), vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(12)]);
        assert_eq!(page_buttons(12, 12), vec![Page(1), Ellipsis, Page(11), Page(12)]);
        assert_eq!(page_buttons(6, 5), vec![Page(1), Ellipsis, Page(4), Page(5), Page(6)]);
    }

    #[test]
    fn test_zero_pages() {
        assert!(page_buttons(0, 1).is_empty());
    }

    #[test]
    fn test_go_to_page_clamps() {
        let mut pager = Pager::default();
        pager.set_total(8);

        assert!(pager.go_to_page(20));
        assert_eq!(pager.current(), 8);
        assert!(!pager.next());
        assert!(pager.go_to_page(0));
        assert_eq!(pager.current(), 1);
        assert!(!pager.previous());
    }

    #[test]
    fn test_shrinking_total_clamps_current() {
        let mut pager = Pager::default();
        pager.set_total(10);
        pager.go_to_page(9);
        pager.set_total(3);
        assert_eq!(pager.current(), 3);
        pager.set_total(0);
        assert_eq!((pager.current(), pager.total()), (1, 1));
    }
}
