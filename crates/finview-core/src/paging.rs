//! Pagination window: a bounded, scannable row of page controls for
//! arbitrarily large page counts

use serde::Serialize;

/// One slot in the pagination control row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageItem {
    /// A clickable page number
    Number(u32),
    /// A gap between page numbers
    Ellipsis,
}

/// Largest page count rendered without ellipses
const FULL_WINDOW_MAX: u32 = 7;

/// The page-number sequence for `(current_page, total_pages)`
///
/// Up to seven pages every number is shown. Beyond that the first and
/// last page always appear, with a five-wide window anchored to
/// whichever end `current_page` is near, or centered on it in the
/// middle range.
pub fn page_window(current_page: u32, total_pages: u32) -> Vec<PageItem> {
    if total_pages <= FULL_WINDOW_MAX {
        return (1..=total_pages).map(PageItem::Number).collect();
    }

    let mut items = vec![PageItem::Number(1)];
    if current_page <= 4 {
        items.extend((2..=5).map(PageItem::Number));
        items.push(PageItem::Ellipsis);
    } else if current_page >= total_pages - 3 {
        items.push(PageItem::Ellipsis);
        items.extend((total_pages - 4..=total_pages - 1).map(PageItem::Number));
    } else {
        items.push(PageItem::Ellipsis);
        items.extend((current_page - 1..=current_page + 1).map(PageItem::Number));
        items.push(PageItem::Ellipsis);
    }
    items.push(PageItem::Number(total_pages));
    items
}

/// Which of the First/Previous/Next/Last controls are usable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavState {
    pub first: bool,
    pub previous: bool,
    pub next: bool,
    pub last: bool,
}

/// Control state for `(current_page, total_pages)`
///
/// An empty list counts as one page so the comparisons below never
/// go negative.
pub fn nav_state(current_page: u32, total_pages: u32) -> NavState {
    let last_page = total_pages.max(1);
    let at_start = current_page <= 1;
    let at_end = current_page >= last_page;
    NavState {
        first: !at_start,
        previous: !at_start,
        next: !at_end,
        last: !at_end,
    }
}

// ==================== Tests ====================
