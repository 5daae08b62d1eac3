// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::style::Color;

/// Row offset above the list when none is given: a header row and a status row.
pub const DEFAULT_ROW_OFFSET: usize = 2;

/// Events that can be queued for a session before new ones are dropped.
pub const DEFAULT_EVENT_QUEUE_CAPACITY: usize = 64;

/// Knobs of a [`crate::Selector`]. Use the builder methods on the selector rather than
/// filling this in by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Rows above the list (header, status line). The list occupies rows
    /// `row_offset..height`.
    pub row_offset: usize,
    /// When `false`, typed characters and backspace are ignored, and the info label and
    /// filter prompt are not drawn.
    pub is_filter_enabled: bool,
    /// Background of the row under the cursor.
    pub highlight_bg: Color,
    pub event_queue_capacity: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            row_offset: DEFAULT_ROW_OFFSET,
            is_filter_enabled: true,
            highlight_bg: Color::Magenta,
            event_queue_capacity: DEFAULT_EVENT_QUEUE_CAPACITY,
        }
    }
}

impl SelectorConfig {
    /// Rows available for items on a surface of the given height. Never zero, so paging
    /// math stays defined on a tiny terminal.
    #[must_use]
    pub fn page_capacity(&self, surface_height: usize) -> usize {
        surface_height.saturating_sub(self.row_offset).max(1)
    }
}
