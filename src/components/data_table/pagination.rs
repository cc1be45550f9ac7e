//! Pagination Component
//!
//! Local paging over an in-memory result set plus the page-selector model.
//! Pages are 1-based; an empty set has zero pages but still sits on page 1.

/// One page of a slice
#[derive(Debug)]
pub struct PageWindow<'a, T> {
    pub items: &'a [T],
    /// 1-based page actually shown
    pub current_page: usize,
    pub total_pages: usize,
}

impl<T> PageWindow<'_, T> {
    /// Offset of the first row on this page, for row numbering
    pub fn offset(&self, page_size: usize) -> usize {
        (self.current_page - 1) * page_size.max(1)
    }
}

/// `ceil(len / page_size)`; zero when `len` is zero
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}

/// Slice `items` into the requested page
///
/// A requested page of 0 or beyond the last page falls back to page 1.
pub fn paginate<T>(items: &[T], page_size: usize, requested_page: usize) -> PageWindow<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(items.len(), page_size);

    let current_page = if requested_page == 0 || requested_page > total_pages {
        1
    } else {
        requested_page
    };

    let start = ((current_page - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());

    PageWindow {
        items: &items[start..end],
        current_page,
        total_pages,
    }
}

/// A page-selector control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Prev { enabled: bool },
    Page { number: usize, active: bool },
    Ellipsis,
    Next { enabled: bool },
}

/// Selector controls for `current` of `total` pages
///
/// Shows the first and last page, `current ± 2`, and one ellipsis at
/// `current ± 3` when that position is not already a page button. Empty when
/// there is at most one page.
pub fn page_buttons(current: usize, total: usize) -> Vec<PageButton> {
    if total <= 1 {
        return Vec::new();
    }

    let mut buttons = vec![PageButton::Prev {
        enabled: current > 1,
    }];
    for number in 1..=total {
        let distance = number.abs_diff(current);
        if number == 1 || number == total || distance <= 2 {
            buttons.push(PageButton::Page {
                number,
                active: number == current,
            });
        } else if distance == 3 {
            buttons.push(PageButton::Ellipsis);
        }
    }
    buttons.push(PageButton::Next {
        enabled: current < total,
    });
    buttons
}

/// Current-page state of one paginated table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    current_page: usize,
    total_items: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
            total_items: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.page_size)
    }

    /// Record a new result-set size; a page that no longer exists resets to 1
    pub fn set_total(&mut self, total_items: usize) {
        self.total_items = total_items;
        if self.current_page > self.total_pages() {
            self.current_page = 1;
        }
    }

    /// Back to page 1, e.g. when the query changes
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Navigate to `page`; returns false and changes nothing when out of range
    pub fn go_to(&mut self, page: usize) -> bool {
        if page == 0 || page > self.total_pages() {
            tracing::debug!("Ignoring page {} of {}", page, self.total_pages());
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current_page + 1)
    }

    pub fn prev(&mut self) -> bool {
        self.current_page > 1 && self.go_to(self.current_page - 1)
    }

    /// The visible slice of `items`
    pub fn window<'a, T>(&self, items: &'a [T]) -> PageWindow<'a, T> {
        paginate(items, self.page_size, self.current_page)
    }

    /// Selector controls for the current state
    pub fn buttons(&self) -> Vec<PageButton> {
        page_buttons(self.current_page, self.total_pages())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(buttons: &[PageButton]) -> Vec<Option<usize>> {
        buttons
            .iter()
            .filter_map(|b| match b {
                PageButton::Page { number, .. } => Some(Some(*number)),
                PageButton::Ellipsis => Some(None),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_slicing_covers_every_item_once() {
        let items: Vec<usize> = (0..45).collect();
        let total = total_pages(items.len(), 20);
        assert_eq!(total, 3);

        let mut seen = Vec::new();
        for page in 1..=total {
            let window = paginate(&items, 20, page);
            assert_eq!(window.current_page, page);
            assert_eq!(window.total_pages, 3);
            seen.extend_from_slice(window.items);
        }
        assert_eq!(seen, items);
        assert_eq!(paginate(&items, 20, 3).items.len(), 5);
    }

    #[test]
    fn test_total_pages_edges() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
    }

    #[test]
    fn test_out_of_range_request_resets_to_first_page() {
        let items: Vec<usize> = (0..45).collect();
        let window = paginate(&items, 20, 9);
        assert_eq!(window.current_page, 1);
        assert_eq!(window.items[0], 0);

        assert_eq!(paginate(&items, 20, 0).current_page, 1);

        let empty: Vec<usize> = Vec::new();
        let window = paginate(&empty, 20, 4);
        assert_eq!(window.current_page, 1);
        assert_eq!(window.total_pages, 0);
        assert!(window.items.is_empty());
    }

    #[test]
    fn test_go_to_rejects_out_of_range() {
        let mut pager = Pager::new(20);
        pager.set_total(45);
        assert!(pager.go_to(3));
        assert!(!pager.go_to(4));
        assert!(!pager.go_to(0));
        assert_eq!(pager.current_page(), 3);
        assert!(!pager.next());
        assert!(pager.prev());
        assert_eq!(pager.current_page(), 2);
    }

    #[test]
    fn test_shrinking_result_resets_page() {
        let mut pager = Pager::new(20);
        pager.set_total(100);
        assert!(pager.go_to(5));

        pager.set_total(30);
        assert_eq!(pager.current_page(), 1);

        assert!(pager.go_to(2));
        pager.set_total(40);
        assert_eq!(pager.current_page(), 2);
    }

    #[test]
    fn test_buttons_hidden_for_single_page() {
        assert!(page_buttons(1, 1).is_empty());
        assert!(page_buttons(1, 0).is_empty());
    }

    #[test]
    fn test_buttons_middle_page() {
        let buttons = page_buttons(10, 20);
        assert_eq!(buttons.first(), Some(&PageButton::Prev { enabled: true }));
        assert_eq!(buttons.last(), Some(&PageButton::Next { enabled: true }));
        assert_eq!(
            pages(&buttons),
            vec![
                Some(1),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                None,
                Some(20)
            ]
        );
        assert!(buttons.contains(&PageButton::Page { number: 10, active: true }));
    }

    #[test]
    fn test_buttons_at_edges() {
        let first = page_buttons(1, 8);
        assert_eq!(first[0], PageButton::Prev { enabled: false });
        assert_eq!(pages(&first), vec![Some(1), Some(2), Some(3), None, Some(8)]);

        let last = page_buttons(8, 8);
        assert_eq!(last.last(), Some(&PageButton::Next { enabled: false }));
        assert_eq!(pages(&last), vec![Some(1), None, Some(6), Some(7), Some(8)]);

        // current - 3 is the first page itself: no ellipsis
        assert_eq!(pages(&page_buttons(4, 5)), vec![Some(1), Some(2), Some(3), Some(4), Some(5)]);
    }
}
