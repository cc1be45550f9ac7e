//! ListState - Fetched Collection with Load State and Paging

use std::sync::Arc;

use crate::components::data_table::{PageWindow, Pager};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Inline error panel text; the previous rows stay for a retry
    Error(Arc<str>),
}

/// A whole collection held in memory and shown one page at a time
#[derive(Debug)]
pub struct ListState<T> {
    rows: Vec<T>,
    load_state: LoadState,
    pager: Pager,
}

impl<T> ListState<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            rows: Vec::new(),
            load_state: LoadState::Idle,
            pager: Pager::new(page_size),
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn begin_loading(&mut self) {
        self.load_state = LoadState::Loading;
    }

    /// Replace the rows; the page resets to 1 if it no longer exists
    pub fn finish(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.pager.set_total(self.rows.len());
        self.load_state = LoadState::Ready;
    }

    /// Replace the rows for a new query, starting again at page 1
    pub fn replace(&mut self, rows: Vec<T>) {
        self.pager.reset();
        self.finish(rows);
    }

    pub fn fail(&mut self, message: impl Into<Arc<str>>) {
        self.load_state = LoadState::Error(message.into());
    }

    /// Navigate; out-of-range pages are ignored
    pub fn go_to(&mut self, page: usize) -> bool {
        self.pager.go_to(page)
    }

    pub fn page(&self) -> PageWindow<'_, T> {
        self.pager.window(&self.rows)
    }

    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.rows.iter().find(|row| predicate(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_shrink_resets_page() {
        let mut list = ListState::new(20);
        list.begin_loading();
        list.finish((0..100).collect::<Vec<u32>>());
        assert!(list.go_to(4));
        assert_eq!(list.page().items[0], 60);

        list.finish((0..25).collect());
        assert_eq!(list.pager().current_page(), 1);
        assert_eq!(list.page().items.len(), 20);
    }

    #[test]
    fn test_failure_keeps_rows() {
        let mut list = ListState::new(20);
        list.finish(vec![1, 2, 3]);
        list.fail("HTTP 500");
        assert_eq!(list.load_state(), &LoadState::Error(Arc::from("HTTP 500")));
        assert_eq!(list.rows().len(), 3);
    }

    #[test]
    fn test_replace_starts_at_first_page() {
        let mut list = ListState::new(10);
        list.finish((0..50).collect::<Vec<u32>>());
        assert!(list.go_to(3));
        list.replace((0..50).collect());
        assert_eq!(list.pager().current_page(), 1);
    }
}
