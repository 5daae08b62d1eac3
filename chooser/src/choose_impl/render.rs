// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Drawing the selector's region of the [`crate::RenderSurface`].
//!
//! The surface lock is held for one synchronous batch of draws plus the flush. The
//! filter prompt goes through the [`StatusLine`] afterwards, once the surface lock has
//! been released.

use std::time::Duration;

use crossterm::style::Color;

use crate::{CellStyle, Item, Pos, RenderSurface, SafeRenderSurface, SelectorConfig,
            SelectorState, StatusLine, lock_surface};

/// Row the info label is drawn on.
pub const HEADER_ROW_INDEX: usize = 0;

/// Cells blanked to the left of the info label, so that a shorter label doesn't leave
/// digits of a longer one behind.
pub const INFO_LABEL_CLEAR_WIDTH: usize = 10;

#[must_use]
pub fn format_info_label(state: &SelectorState) -> String {
    format!(
        "(Total {}: {} of {})",
        state.filtered_len(),
        state.page(),
        state.max_page()
    )
}

#[must_use]
pub fn format_filter_prompt(filter: &str) -> String { format!("Filter query> {filter}") }

/// Clear rows `row_offset..height`, draw the current page with the cursor row
/// highlighted, and flush. With filtering enabled, also draw the info label on the
/// header row and reissue the filter prompt on the status line.
///
/// # Errors
///
/// Returns an error if the surface or the status line can't be flushed.
pub fn render_page<T: Item>(
    surface: &SafeRenderSurface,
    status_line: &StatusLine,
    config: &SelectorConfig,
    state: &SelectorState,
    items: &[T],
) -> std::io::Result<()> {
    let filter = state.filter_text();

    {
        let mut surface = lock_surface(surface);
        let height = surface.size().row_height;
        surface.clear_rows(config.row_offset.min(height)..height);

        for (row, filtered_position) in state.page_range().enumerate() {
            let row_index = config.row_offset + row;
            if row_index >= height {
                break;
            }
            let maybe_item = state
                .filtered_view()
                .original_index(filtered_position)
                .and_then(|original_index| items.get(original_index));
            let Some(item) = maybe_item else {
                continue;
            };
            item.render(&mut *surface, row_index, &filter);
            if row == state.cursor() {
                surface.set_row_bg(row_index, config.highlight_bg);
            }
        }

        if config.is_filter_enabled {
            draw_info_label(&mut *surface, &format_info_label(state));
        }

        surface.flush()?;
    }

    if config.is_filter_enabled {
        status_line.message(format_filter_prompt(&filter), Duration::ZERO)?;
    }

    Ok(())
}

/// Move the highlight from `old_row` to `new_row` (both relative to the top of the
/// list) without redrawing any text, and flush.
///
/// # Errors
///
/// Returns an error if the surface can't be flushed.
pub fn render_cursor_move(
    surface: &SafeRenderSurface,
    config: &SelectorConfig,
    old_row: usize,
    new_row: usize,
) -> std::io::Result<()> {
    let mut surface = lock_surface(surface);
    surface.set_row_bg(config.row_offset + old_row, Color::Reset);
    surface.set_row_bg(config.row_offset + new_row, config.highlight_bg);
    surface.flush()
}

fn draw_info_label(surface: &mut dyn RenderSurface, label: &str) {
    let width = surface.size().col_width;
    let label_start = width.saturating_sub(label.chars().count());
    let clear_start = label_start.saturating_sub(INFO_LABEL_CLEAR_WIDTH);
    for col_index in clear_start..label_start {
        surface.set_cell(
            Pos::new(col_index, HEADER_ROW_INDEX),
            ' ',
            CellStyle::default(),
        );
    }
    surface.print_text(
        Pos::new(label_start, HEADER_ROW_INDEX),
        label,
        CellStyle::default(),
    );
}
