// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::ops::Range;

use crossterm::style::Color;

use crate::{CellStyle, Pos, RenderSurface};

/// Anything that can be a row in a [`crate::Selector`].
///
/// - [`Item::text`] is what the filter is matched against (plain substring, case
///   sensitive).
/// - [`Item::render`] draws the row. The selector clears the row beforehand and applies
///   the cursor highlight afterwards, so implementations only draw their own content.
///
/// Variants don't need a common supertype: use `&[T]` for a homogeneous list, or
/// `&[Box<dyn Item>]` to mix them.
pub trait Item {
    fn text(&self) -> String;

    fn render(&self, surface: &mut dyn RenderSurface, row_index: usize, active_filter: &str);
}

impl<T: Item + ?Sized> Item for Box<T> {
    fn text(&self) -> String { (**self).text() }

    fn render(&self, surface: &mut dyn RenderSurface, row_index: usize, active_filter: &str) {
        (**self).render(surface, row_index, active_filter);
    }
}

/// Plain text rows, with the filter match highlighted.
impl Item for String {
    fn text(&self) -> String { self.clone() }

    fn render(&self, surface: &mut dyn RenderSurface, row_index: usize, active_filter: &str) {
        print_highlighted(
            surface,
            Pos::new(0, row_index),
            self,
            active_filter,
            CellStyle::default(),
        );
    }
}

impl Item for &str {
    fn text(&self) -> String { (*self).to_string() }

    fn render(&self, surface: &mut dyn RenderSurface, row_index: usize, active_filter: &str) {
        print_highlighted(
            surface,
            Pos::new(0, row_index),
            self,
            active_filter,
            CellStyle::default(),
        );
    }
}

/// Foreground used for the part of a row that matches the filter.
pub const FILTER_MATCH_FG: Color = Color::Yellow;

/// Returns the range of `char` indices (not byte offsets) of the first occurrence of
/// `filter` in `text`. `None` if `filter` is empty or not found.
///
/// ```
/// use r3bl_chooser::find_highlight_range;
/// assert_eq!(find_highlight_range("Lorem ipsum", "ipsum"), Some(6..11));
/// ```
#[must_use]
pub fn find_highlight_range(text: &str, filter: &str) -> Option<Range<usize>> {
    if filter.is_empty() {
        return None;
    }
    let byte_start = text.find(filter)?;
    let char_start = text[..byte_start].chars().count();
    let char_len = filter.chars().count();
    Some(char_start..char_start + char_len)
}

/// Draw `text` at `pos` in `base_style`, with the first match of `filter` in
/// [`FILTER_MATCH_FG`]. Returns the column right after the text.
pub fn print_highlighted(
    surface: &mut dyn RenderSurface,
    pos: Pos,
    text: &str,
    filter: &str,
    base_style: CellStyle,
) -> usize {
    let Some(range) = find_highlight_range(text, filter) else {
        return surface.print_text(pos, text, base_style);
    };

    let highlight_style = CellStyle {
        fg: FILTER_MATCH_FG,
        ..base_style
    };

    let before: String = text.chars().take(range.start).collect();
    let matched: String = text.chars().skip(range.start).take(range.len()).collect();
    let after: String = text.chars().skip(range.end).collect();

    let mut col_index = pos.col_index;
    for (segment, style) in [
        (before, base_style),
        (matched, highlight_style),
        (after, base_style),
    ] {
        col_index = surface.print_text(Pos::new(col_index, pos.row_index), &segment, style);
    }
    col_index
}
