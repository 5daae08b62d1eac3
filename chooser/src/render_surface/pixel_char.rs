// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::style::Color;

/// Colors and weight of a single cell. [`Color::Reset`] means "whatever the terminal's
/// default is".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellStyle {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            fg: Color::Reset,
            bg: Color::Reset,
            bold: false,
        }
    }
}

impl CellStyle {
    #[must_use]
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self {
            fg,
            bg,
            bold: false,
        }
    }

    #[must_use]
    pub const fn fg(fg: Color) -> Self { Self::new(fg, Color::Reset) }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// One cell of the [`crate::OffscreenBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelChar {
    /// The trailing cell covered by a wide glyph (eg: `日`) in the cell to its left. It
    /// is never painted, the terminal draws the glyph across both cells.
    Void { style: CellStyle },
    PlainText { display_char: char, style: CellStyle },
}

impl Default for PixelChar {
    fn default() -> Self { Self::SPACER }
}

impl PixelChar {
    pub const SPACER: PixelChar = PixelChar::PlainText {
        display_char: ' ',
        style: CellStyle {
            fg: Color::Reset,
            bg: Color::Reset,
            bold: false,
        },
    };

    #[must_use]
    pub fn style(&self) -> CellStyle {
        match self {
            PixelChar::Void { style } | PixelChar::PlainText { style, .. } => *style,
        }
    }

    pub fn set_bg(&mut self, bg: Color) {
        match self {
            PixelChar::Void { style } | PixelChar::PlainText { style, .. } => style.bg = bg,
        }
    }

    /// `None` for [`PixelChar::Void`].
    #[must_use]
    pub fn display_char(&self) -> Option<char> {
        match self {
            PixelChar::Void { .. } => None,
            PixelChar::PlainText { display_char, .. } => Some(*display_char),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_bg_keeps_char_and_fg() {
        let mut pixel_char = PixelChar::PlainText {
            display_char: 'x',
            style: CellStyle::fg(Color::Green).bold(),
        };
        pixel_char.set_bg(Color::Magenta);
        pretty_assertions::assert_eq!(
            pixel_char,
            PixelChar::PlainText {
                display_char: 'x',
                style: CellStyle {
                    fg: Color::Green,
                    bg: Color::Magenta,
                    bold: true,
                },
            }
        );
        pretty_assertions::assert_eq!(PixelChar::SPACER.display_char(), Some(' '));
    }
}
