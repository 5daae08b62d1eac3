// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Why [`crate::Selector::choose`] did not return an index.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ChooseError {
    #[error("The user cancelled the selection")]
    #[diagnostic(
        code(r3bl_chooser::interrupted),
        help("This is not a failure: the user pressed Esc or Ctrl+C.")
    )]
    Interrupted,

    #[error(
        "No item at position {position} (page {page}, cursor {cursor}) of a filtered list of {filtered_len}"
    )]
    #[diagnostic(
        code(r3bl_chooser::unexpected_index),
        help("The selector's paging state is out of sync with its filtered list. Please report this.")
    )]
    UnexpectedIndex {
        page: usize,
        cursor: usize,
        position: usize,
        filtered_len: usize,
    },

    #[error("There is nothing to choose from")]
    #[diagnostic(
        code(r3bl_chooser::empty_list),
        help("Pass at least one item to choose().")
    )]
    EmptyList,

    #[error("The input source closed before a choice was made")]
    #[diagnostic(
        code(r3bl_chooser::input_closed),
        help("The input dispatcher stopped, or stdin reached end of file.")
    )]
    InputClosed,

    #[error("Failed to paint the terminal")]
    #[diagnostic(code(r3bl_chooser::render))]
    Render(#[from] std::io::Error),
}
