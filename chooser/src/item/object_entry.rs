// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, Utc};
use crossterm::style::Color;

use crate::{CellStyle, Item, Pos, RenderSurface, print_highlighted};

/// Timestamps are shown in Japan Standard Time.
pub const JST_OFFSET_SECONDS: i32 = 9 * 60 * 60;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const PARENT_KEY: &str = "../";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    File,
    Directory,
    /// The `../` row that navigates one level up.
    Parent,
}

/// A row of an object listing: a file, a "directory" (common key prefix), or the parent
/// link.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectEntry {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub kind: ObjectKind,
}

/// One raw entry of a bucket listing, before it is folded into [`ObjectEntry`] rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedObject {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

impl ObjectEntry {
    #[must_use]
    pub fn new_parent() -> Self {
        Self {
            key: PARENT_KEY.to_string(),
            size: 0,
            last_modified: DateTime::<Utc>::UNIX_EPOCH,
            kind: ObjectKind::Parent,
        }
    }

    #[must_use]
    pub fn is_parent(&self) -> bool { self.kind == ObjectKind::Parent }

    #[must_use]
    pub fn is_dir(&self) -> bool { self.kind == ObjectKind::Directory }

    fn display_key(&self) -> String {
        match self.kind {
            ObjectKind::Directory => format!("{}/", self.key),
            ObjectKind::File | ObjectKind::Parent => self.key.clone(),
        }
    }

    fn display_size(&self) -> String {
        match self.kind {
            ObjectKind::File => self.size.to_string(),
            ObjectKind::Directory | ObjectKind::Parent => "-".to_string(),
        }
    }
}

impl Item for ObjectEntry {
    /// The parent row has no text, so it only shows up while the filter is empty.
    fn text(&self) -> String {
        match self.kind {
            ObjectKind::Parent => String::new(),
            ObjectKind::File | ObjectKind::Directory => format!(
                "{} {:>10}  {}",
                utc_to_jst(self.last_modified),
                self.display_size(),
                self.display_key()
            ),
        }
    }

    fn render(&self, surface: &mut dyn RenderSurface, row_index: usize, active_filter: &str) {
        if self.is_parent() {
            surface.print_text(
                Pos::new(0, row_index),
                PARENT_KEY,
                CellStyle::new(Color::White, Color::Blue),
            );
            return;
        }

        let mut col_index = surface.print_text(
            Pos::new(0, row_index),
            &utc_to_jst(self.last_modified),
            CellStyle::fg(Color::White),
        );
        col_index = surface.print_text(
            Pos::new(col_index, row_index),
            &format!(" {:>12}    ", self.display_size()),
            CellStyle::fg(Color::Cyan),
        );
        let key_style = if self.is_dir() {
            CellStyle::fg(Color::Green).bold()
        } else {
            CellStyle::fg(Color::White)
        };
        print_highlighted(
            surface,
            Pos::new(col_index, row_index),
            &self.display_key(),
            active_filter,
            key_style,
        );
    }
}

/// Format a UTC timestamp in JST.
#[must_use]
pub fn utc_to_jst(utc: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(JST_OFFSET_SECONDS) {
        Some(jst) => utc.with_timezone(&jst).format(TIMESTAMP_FORMAT).to_string(),
        None => utc.format(TIMESTAMP_FORMAT).to_string(),
    }
}

/// Turn a flat listing of keys under `prefix` into rows: keys directly under the prefix
/// become files, deeper keys are folded into one directory row per first path segment.
/// Order follows the listing. The parent row is not included, see
/// [`ObjectEntry::new_parent`].
#[must_use]
pub fn fold_object_listing(
    listing: impl IntoIterator<Item = ListedObject>,
    prefix: &[String],
) -> Vec<ObjectEntry> {
    let prefix_str = if prefix.is_empty() {
        String::new()
    } else {
        format!("{}/", prefix.join("/"))
    };

    let mut seen_dirs = HashSet::<String>::new();
    let mut acc = vec![];

    for listed in listing {
        let key = listed.key.replacen(&prefix_str, "", 1);
        let (key, kind) = match key.split_once('/') {
            Some((dir_name, _)) => {
                if !seen_dirs.insert(dir_name.to_string()) {
                    continue;
                }
                (dir_name.to_string(), ObjectKind::Directory)
            }
            None => (key, ObjectKind::File),
        };
        acc.push(ObjectEntry {
            key,
            size: listed.size,
            last_modified: listed.last_modified,
            kind,
        });
    }

    acc
}
