// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::style::Color;
use strum_macros::{Display, EnumIter};

use crate::{CellStyle, Item, Pos, RenderSurface};

/// What can be done with a selected object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ObjectAction {
    #[strum(to_string = "Back To List")]
    Back,
    #[strum(to_string = "View file content")]
    View,
    #[strum(to_string = "Download this file")]
    Download,
}

/// Content types whose body can be shown as text.
pub const VIEWABLE_CONTENT_TYPES: [&str; 4] = [
    "text/plain",
    "text/html",
    "text/css",
    "application/javascript",
];

/// A row of the action menu that is shown after an object is selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionCommand {
    pub action: ObjectAction,
    pub name: String,
}

impl From<ObjectAction> for ActionCommand {
    fn from(action: ObjectAction) -> Self {
        Self {
            action,
            name: action.to_string(),
        }
    }
}

impl Item for ActionCommand {
    fn text(&self) -> String { self.name.clone() }

    fn render(&self, surface: &mut dyn RenderSurface, row_index: usize, _active_filter: &str) {
        surface.print_text(
            Pos::new(0, row_index),
            &self.name,
            CellStyle::fg(Color::White),
        );
    }
}

/// The menu for an object with the given content type. "View" is only offered for
/// [`VIEWABLE_CONTENT_TYPES`], so the menu has two or three entries and the index a
/// chooser returns must be mapped back through this list, not assumed.
#[must_use]
pub fn action_menu(content_type: &str) -> Vec<ActionCommand> {
    let is_viewable = VIEWABLE_CONTENT_TYPES.contains(&content_type);
    let mut menu = vec![ActionCommand::from(ObjectAction::Back)];
    if is_viewable {
        menu.push(ActionCommand::from(ObjectAction::View));
    }
    menu.push(ActionCommand::from(ObjectAction::Download));
    menu
}
