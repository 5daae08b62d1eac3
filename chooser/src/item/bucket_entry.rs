// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::style::Color;

use crate::{CellStyle, Item, Pos, RenderSurface, print_highlighted};

const BUCKET_PREFIX: &str = "[Bucket] ";

/// A bucket row, shown as `[Bucket] name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketEntry {
    pub name: String,
}

impl BucketEntry {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self { Self { name: name.into() } }
}

impl Item for BucketEntry {
    fn text(&self) -> String { format!("{BUCKET_PREFIX}{}", self.name) }

    /// The prefix is never highlighted, only the name is matched against the filter.
    fn render(&self, surface: &mut dyn RenderSurface, row_index: usize, active_filter: &str) {
        let col_index = surface.print_text(
            Pos::new(0, row_index),
            BUCKET_PREFIX,
            CellStyle::fg(Color::Cyan),
        );
        print_highlighted(
            surface,
            Pos::new(col_index, row_index),
            &self.name,
            active_filter,
            CellStyle::fg(Color::White),
        );
    }
}
