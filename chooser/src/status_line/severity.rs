// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::style::Color;
use strum_macros::{Display, EnumIter};

use crate::CellStyle;

/// How loud a [`crate::StatusLine`] message is. Only the colors differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Severity {
    #[default]
    Neutral,
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Style for the message text, and for the padding that fills the rest of the row.
    #[must_use]
    pub fn style(self) -> CellStyle {
        match self {
            Severity::Neutral => CellStyle::fg(Color::White),
            Severity::Info => CellStyle::new(Color::Black, Color::Cyan),
            Severity::Warning => CellStyle::new(Color::Black, Color::Yellow),
            Severity::Error => CellStyle::new(Color::White, Color::Red),
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_each_severity_has_distinct_style() {
        let styles: Vec<CellStyle> = Severity::iter().map(Severity::style).collect();
        for (index, style) in styles.iter().enumerate() {
            assert!(!styles[index + 1..].contains(style));
        }
        pretty_assertions::assert_eq!(Severity::default().style().bg, Color::Reset);
    }
}
