// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{ops::Range,
          sync::{Arc, MutexGuard, PoisonError}};

use crossterm::style::Color;
use unicode_width::UnicodeWidthChar;

use crate::{CellStyle, PixelChar, Pos, Size, StdMutex};

/// A grid of [`PixelChar`] cells. Drawing only changes the grid; nothing reaches the
/// terminal until [`RenderSurface::flush`] is called.
///
/// Writes outside the grid are silently dropped, so callers can draw without clipping
/// first.
pub trait RenderSurface: Send {
    fn size(&self) -> Size;

    /// Wide glyphs also claim the cell to their right (see [`PixelChar::Void`]).
    fn set_cell(&mut self, pos: Pos, display_char: char, style: CellStyle);

    fn row(&self, row_index: usize) -> Option<&[PixelChar]>;

    /// Direct cell access, eg: to recolor a row in place. The row is marked as changed.
    fn row_mut(&mut self, row_index: usize) -> Option<&mut [PixelChar]>;

    /// Blank out the given rows. Rows past the bottom edge are ignored.
    fn clear_rows(&mut self, rows: Range<usize>);

    fn resize(&mut self, new_size: Size);

    /// # Errors
    ///
    /// Returns an error if the output device can't be written to.
    fn flush(&mut self) -> std::io::Result<()>;

    /// Draw `text` left to right starting at `pos`, stopping at the right edge. Returns
    /// the column right after the last cell drawn.
    fn print_text(&mut self, pos: Pos, text: &str, style: CellStyle) -> usize {
        let max_col = self.size().col_width;
        let mut col_index = pos.col_index;
        for display_char in text.chars() {
            let char_width = display_char.width().unwrap_or(0);
            if char_width == 0 {
                continue;
            }
            if col_index + char_width > max_col {
                break;
            }
            self.set_cell(Pos::new(col_index, pos.row_index), display_char, style);
            col_index += char_width;
        }
        col_index
    }

    /// Fill the row with spaces in `style`, from `from_col` to the right edge.
    fn fill_row_from(&mut self, row_index: usize, from_col: usize, style: CellStyle) {
        let max_col = self.size().col_width;
        for col_index in from_col..max_col {
            self.set_cell(Pos::new(col_index, row_index), ' ', style);
        }
    }

    /// Change the background of every cell in the row, keeping chars and foregrounds.
    fn set_row_bg(&mut self, row_index: usize, bg: Color) {
        if let Some(row) = self.row_mut(row_index) {
            row.iter_mut().for_each(|pixel_char| pixel_char.set_bg(bg));
        }
    }

    /// The printable content of a row, without styles. Mostly for tests and logs.
    fn row_text(&self, row_index: usize) -> String {
        self.row(row_index)
            .map(|row| row.iter().filter_map(PixelChar::display_char).collect())
            .unwrap_or_default()
    }
}

/// The surface is shared between the selector, the status line, and the input dispatcher.
/// Lock it only for a synchronous batch of draws, never across an `.await`.
pub type SafeRenderSurface = Arc<StdMutex<dyn RenderSurface>>;

/// A poisoned lock is recovered: the next full redraw repaints whatever a panicking
/// writer left half drawn.
pub fn lock_surface(
    surface: &SafeRenderSurface,
) -> MutexGuard<'_, dyn RenderSurface + 'static> {
    surface.lock().unwrap_or_else(PoisonError::into_inner)
}
