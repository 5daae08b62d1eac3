// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::ops::Range;

use smallvec::SmallVec;

use crate::{ChooseError, Item};

pub type FilterChars = SmallVec<[char; 16]>;

/// The items whose [`Item::text`] contains the filter, as positions into the original
/// list. The positions are strictly increasing, and with an empty filter this is the
/// identity mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    mapping: Vec<usize>,
}

impl FilteredView {
    #[must_use]
    pub fn compute<T: Item>(items: &[T], filter: &str) -> Self {
        let mapping = items
            .iter()
            .enumerate()
            .filter(|(_, item)| filter.is_empty() || item.text().contains(filter))
            .map(|(original_index, _)| original_index)
            .collect();
        Self { mapping }
    }

    #[must_use]
    pub fn len(&self) -> usize { self.mapping.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.mapping.is_empty() }

    /// Position in the original list of the item at `filtered_position`.
    #[must_use]
    pub fn original_index(&self, filtered_position: usize) -> Option<usize> {
        self.mapping.get(filtered_position).copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] { &self.mapping }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Next,
    Previous,
}

/// What has to be redrawn after a cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    /// Nothing changed on screen.
    Unchanged,
    /// Same rows, only the highlight moved.
    WithinPage { old_row: usize, new_row: usize },
    /// A different page is showing; everything has to be redrawn.
    PageChanged,
}

/// Cursor, page, and filter of one selection session. No I/O happens here, so every
/// rule about paging lives in this one place and can be tested without a terminal.
///
/// - `page` is 1 based, `cursor` is the 0 based row within the page.
/// - `max_page` is `ceil(filtered_len / page_capacity)`, which is `0` for an empty
///   filtered list (`page` is then `1` and no rows are visible).
/// - Paging wraps around in both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorState {
    cursor: usize,
    page: usize,
    page_capacity: usize,
    filter: FilterChars,
    filtered_view: FilteredView,
}

impl SelectorState {
    #[must_use]
    pub fn new<T: Item>(items: &[T], page_capacity: usize) -> Self {
        Self {
            cursor: 0,
            page: 1,
            page_capacity: page_capacity.max(1),
            filter: FilterChars::new(),
            filtered_view: FilteredView::compute(items, ""),
        }
    }

    #[must_use]
    pub fn cursor(&self) -> usize { self.cursor }

    #[must_use]
    pub fn page(&self) -> usize { self.page }

    #[must_use]
    pub fn page_capacity(&self) -> usize { self.page_capacity }

    #[must_use]
    pub fn filter_text(&self) -> String { self.filter.iter().collect() }

    #[must_use]
    pub fn filtered_view(&self) -> &FilteredView { &self.filtered_view }

    #[must_use]
    pub fn filtered_len(&self) -> usize { self.filtered_view.len() }

    #[must_use]
    pub fn max_page(&self) -> usize { self.filtered_len().div_ceil(self.page_capacity) }

    /// Number of item rows on the current page.
    #[must_use]
    pub fn visible_rows(&self) -> usize {
        let start = self.page_start();
        self.filtered_len()
            .saturating_sub(start)
            .min(self.page_capacity)
    }

    /// Positions in the filtered view that are shown on the current page.
    #[must_use]
    pub fn page_range(&self) -> Range<usize> {
        let start = self.page_start();
        start..start + self.visible_rows()
    }

    /// Position in the filtered view of the row under the cursor.
    #[must_use]
    pub fn absolute_position(&self) -> usize { self.page_start() + self.cursor }

    fn page_start(&self) -> usize { (self.page.max(1) - 1) * self.page_capacity }

    /// Call after the filter changed. Page and cursor are pulled back into bounds.
    pub fn recompute_filtered_view<T: Item>(&mut self, items: &[T]) {
        self.filtered_view = FilteredView::compute(items, &self.filter_text());
        self.clamp();
    }

    pub fn append_filter_char(&mut self, ch: char) { self.filter.push(ch); }

    /// Returns `false` if the filter was already empty.
    pub fn pop_filter_char(&mut self) -> bool { self.filter.pop().is_some() }

    /// Flip to the next or previous page, wrapping around. Does nothing when there are
    /// no pages.
    pub fn advance_page(&mut self, direction: PageDirection) {
        let max_page = self.max_page();
        if max_page == 0 {
            return;
        }
        self.page = match direction {
            PageDirection::Next if self.page >= max_page => 1,
            PageDirection::Next => self.page + 1,
            PageDirection::Previous if self.page <= 1 => max_page,
            PageDirection::Previous => self.page - 1,
        };
        self.clamp();
    }

    /// Move the cursor one row down. Past the last row it goes to the first row of the
    /// next page, or of the same page if there is only one.
    pub fn move_cursor_down(&mut self) -> CursorMove {
        let visible_rows = self.visible_rows();
        if visible_rows == 0 {
            return CursorMove::Unchanged;
        }

        let old_row = self.cursor;
        if old_row + 1 < visible_rows {
            self.cursor += 1;
            return CursorMove::WithinPage {
                old_row,
                new_row: self.cursor,
            };
        }

        if self.max_page() > 1 {
            self.advance_page(PageDirection::Next);
            self.cursor = 0;
            return CursorMove::PageChanged;
        }

        self.cursor = 0;
        if old_row == 0 {
            CursorMove::Unchanged
        } else {
            CursorMove::WithinPage { old_row, new_row: 0 }
        }
    }

    /// Move the cursor one row up. Above the first row it goes to the last row of the
    /// previous page, or of the same page if there is only one.
    pub fn move_cursor_up(&mut self) -> CursorMove {
        let visible_rows = self.visible_rows();
        if visible_rows == 0 {
            return CursorMove::Unchanged;
        }

        let old_row = self.cursor;
        if old_row > 0 {
            self.cursor -= 1;
            return CursorMove::WithinPage {
                old_row,
                new_row: self.cursor,
            };
        }

        if self.max_page() > 1 {
            self.advance_page(PageDirection::Previous);
            self.cursor = self.visible_rows().saturating_sub(1);
            return CursorMove::PageChanged;
        }

        self.cursor = visible_rows - 1;
        if self.cursor == old_row {
            CursorMove::Unchanged
        } else {
            CursorMove::WithinPage {
                old_row,
                new_row: self.cursor,
            }
        }
    }

    /// Change how many rows a page holds. The item under the cursor stays under the
    /// cursor, on whatever page it lands on now.
    pub fn resize(&mut self, page_capacity: usize) {
        let page_capacity = page_capacity.max(1);
        if page_capacity == self.page_capacity {
            return;
        }
        let absolute_position = self.absolute_position();
        self.page_capacity = page_capacity;
        self.page = absolute_position / page_capacity + 1;
        self.cursor = absolute_position % page_capacity;
        self.clamp();
    }

    /// Index in the original list of the item under the cursor.
    ///
    /// # Errors
    ///
    /// [`ChooseError::UnexpectedIndex`] if the cursor isn't on a visible row, which means
    /// this state is inconsistent.
    pub fn resolve_index(&self) -> Result<usize, ChooseError> {
        let position = self.absolute_position();
        let unexpected_index = || ChooseError::UnexpectedIndex {
            page: self.page,
            cursor: self.cursor,
            position,
            filtered_len: self.filtered_len(),
        };
        if self.cursor >= self.visible_rows() {
            return Err(unexpected_index());
        }
        self.filtered_view
            .original_index(position)
            .ok_or_else(unexpected_index)
    }

    fn clamp(&mut self) {
        let max_page = self.max_page();
        if self.page > max_page {
            self.page = 1;
        }
        if self.page < 1 {
            self.page = max_page.max(1);
        }
        let visible_rows = self.visible_rows();
        if self.cursor >= visible_rows {
            self.cursor = visible_rows.saturating_sub(1);
        }
    }
}

#[cfg(test)]
impl SelectorState {
    /// Place the cursor without clamping, to build states paging never produces.
    pub(crate) fn place_cursor_unchecked(&mut self, page: usize, cursor: usize) {
        self.page = page;
        self.cursor = cursor;
    }
}
