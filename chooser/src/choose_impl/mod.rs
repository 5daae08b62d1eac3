// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The [`Selector`] and everything it needs for a session: state, config, errors, the
//! session guard, and drawing.

// Attach.
pub mod choose_error;
pub mod render;
pub mod selector;
pub mod selector_config;
pub mod selector_state;
pub mod session;

// Re-export.
pub use choose_error::*;
pub use render::*;
pub use selector::*;
pub use selector_config::*;
pub use selector_state::*;
pub use session::*;

/// Turn on verbose per key press logging of the selector state.
pub const DEVELOPMENT_MODE: bool = false;
