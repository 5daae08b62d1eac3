// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::ops::Range;

use crossterm::{QueueableCommand,
                cursor::MoveTo,
                style::{Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor,
                        SetForegroundColor},
                terminal::{Clear, ClearType}};
use unicode_width::UnicodeWidthChar;

use crate::{CellStyle, LockedOutputDevice, OutputDevice, PixelChar, Pos, RenderSurface,
            Size, lock_output_device_as_mut};

/// [`RenderSurface`] backed by an in memory grid. Only rows that changed since the last
/// [`RenderSurface::flush`] are painted to the [`OutputDevice`].
#[allow(missing_debug_implementations)]
pub struct OffscreenBuffer {
    size: Size,
    lines: Vec<Vec<PixelChar>>,
    dirty_rows: Vec<bool>,
    /// Set after a resize, since the terminal may have reflowed or scrolled old content.
    needs_full_clear: bool,
    output_device: OutputDevice,
}

impl OffscreenBuffer {
    #[must_use]
    pub fn new(size: Size, output_device: OutputDevice) -> Self {
        Self {
            size,
            lines: new_lines(size),
            dirty_rows: vec![true; size.row_height],
            needs_full_clear: true,
            output_device,
        }
    }

    #[must_use]
    pub fn is_row_dirty(&self, row_index: usize) -> bool {
        self.dirty_rows.get(row_index).copied().unwrap_or(false)
    }

    fn mark_dirty(&mut self, row_index: usize) {
        if let Some(it) = self.dirty_rows.get_mut(row_index) {
            *it = true;
        }
    }

    /// Blank out a cell without touching its neighbors.
    fn blank_cell(&mut self, pos: Pos) {
        if let Some(cell) = self
            .lines
            .get_mut(pos.row_index)
            .and_then(|line| line.get_mut(pos.col_index))
        {
            *cell = PixelChar::PlainText {
                display_char: ' ',
                style: cell.style(),
            };
        }
    }
}

fn new_lines(size: Size) -> Vec<Vec<PixelChar>> {
    vec![vec![PixelChar::SPACER; size.col_width]; size.row_height]
}

impl RenderSurface for OffscreenBuffer {
    fn size(&self) -> Size { self.size }

    fn set_cell(&mut self, pos: Pos, display_char: char, style: CellStyle) {
        let Pos {
            col_index,
            row_index,
        } = pos;
        if row_index >= self.size.row_height || col_index >= self.size.col_width {
            return;
        }

        // Overwriting either half of a wide glyph leaves the other half as a blank.
        let existing = self.lines[row_index][col_index];
        match existing {
            PixelChar::Void { .. } if col_index > 0 => {
                self.blank_cell(Pos::new(col_index - 1, row_index));
            }
            PixelChar::PlainText { display_char, .. }
                if display_char.width() == Some(2) =>
            {
                self.blank_cell(Pos::new(col_index + 1, row_index));
            }
            _ => {}
        }

        let is_wide = display_char.width() == Some(2);
        if is_wide && col_index + 1 >= self.size.col_width {
            // No room for the right half.
            self.lines[row_index][col_index] = PixelChar::PlainText {
                display_char: ' ',
                style,
            };
        } else {
            self.lines[row_index][col_index] = PixelChar::PlainText {
                display_char,
                style,
            };
            if is_wide {
                let next = self.lines[row_index][col_index + 1];
                if next.display_char().and_then(UnicodeWidthChar::width) == Some(2) {
                    self.blank_cell(Pos::new(col_index + 2, row_index));
                }
                self.lines[row_index][col_index + 1] = PixelChar::Void { style };
            }
        }

        self.mark_dirty(row_index);
    }

    fn row(&self, row_index: usize) -> Option<&[PixelChar]> {
        self.lines.get(row_index).map(Vec::as_slice)
    }

    fn row_mut(&mut self, row_index: usize) -> Option<&mut [PixelChar]> {
        self.mark_dirty(row_index);
        self.lines.get_mut(row_index).map(Vec::as_mut_slice)
    }

    fn clear_rows(&mut self, rows: Range<usize>) {
        let end = rows.end.min(self.size.row_height);
        for row_index in rows.start..end {
            self.lines[row_index].fill(PixelChar::SPACER);
            self.mark_dirty(row_index);
        }
    }

    /// Content that still fits is kept, so a header drawn by the app survives.
    fn resize(&mut self, new_size: Size) {
        if new_size == self.size {
            return;
        }

        let mut new_lines = new_lines(new_size);
        for (new_line, old_line) in new_lines.iter_mut().zip(self.lines.iter()) {
            let count = new_line.len().min(old_line.len());
            new_line[..count].copy_from_slice(&old_line[..count]);
            // Don't keep a wide glyph whose right half got cut off.
            let is_cut_off = new_line
                .last()
                .and_then(PixelChar::display_char)
                .and_then(UnicodeWidthChar::width)
                == Some(2);
            if is_cut_off {
                if let Some(last) = new_line.last_mut() {
                    *last = PixelChar::SPACER;
                }
            }
        }

        self.size = new_size;
        self.lines = new_lines;
        self.dirty_rows = vec![true; new_size.row_height];
        self.needs_full_clear = true;
    }

    fn flush(&mut self) -> std::io::Result<()> {
        {
            let out: LockedOutputDevice<'_> = lock_output_device_as_mut!(self.output_device);

            if self.needs_full_clear {
                out.queue(ResetColor)?;
                out.queue(Clear(ClearType::All))?;
            }

            for (row_index, line) in self.lines.iter().enumerate() {
                if self.dirty_rows[row_index] {
                    paint_line(out, row_index, line)?;
                }
            }

            out.queue(SetAttribute(Attribute::Reset))?;
            out.queue(ResetColor)?;
            out.flush()?;
        }

        self.dirty_rows.fill(false);
        self.needs_full_clear = false;
        Ok(())
    }
}

fn paint_line(
    out: LockedOutputDevice<'_>,
    row_index: usize,
    line: &[PixelChar],
) -> std::io::Result<()> {
    out.queue(MoveTo(0, to_u16(row_index)))?;

    let mut current_style: Option<CellStyle> = None;
    for pixel_char in line {
        let PixelChar::PlainText {
            display_char,
            style,
        } = pixel_char
        else {
            continue;
        };
        if current_style != Some(*style) {
            apply_style(out, *style)?;
            current_style = Some(*style);
        }
        out.queue(Print(*display_char))?;
    }

    Ok(())
}

fn apply_style(out: LockedOutputDevice<'_>, style: CellStyle) -> std::io::Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(style.fg))?;
    out.queue(SetBackgroundColor(style.bg))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    Ok(())
}

fn to_u16(value: usize) -> u16 { u16::try_from(value).unwrap_or(u16::MAX) }
