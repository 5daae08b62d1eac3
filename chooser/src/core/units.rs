// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::{Debug, Formatter, Result};

/// Width and height of a terminal (or of the render surface that mirrors it), in cells.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub col_width: usize,
    pub row_height: usize,
}

impl Size {
    #[must_use]
    pub const fn new(col_width: usize, row_height: usize) -> Self {
        Self {
            col_width,
            row_height,
        }
    }
}

/// Crossterm reports sizes as `(columns, rows)`.
impl From<(u16, u16)> for Size {
    fn from((cols, rows): (u16, u16)) -> Self { Self::new(cols.into(), rows.into()) }
}

impl Debug for Size {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[width:{w}, height:{h}]", w = self.col_width, h = self.row_height)
    }
}

/// Zero based cell position. Column first, like crossterm's `MoveTo`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Pos {
    pub col_index: usize,
    pub row_index: usize,
}

impl Pos {
    #[must_use]
    pub const fn new(col_index: usize, row_index: usize) -> Self {
        Self {
            col_index,
            row_index,
        }
    }
}

impl Debug for Pos {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[col:{c}, row:{r}]", c = self.col_index, r = self.row_index)
    }
}
