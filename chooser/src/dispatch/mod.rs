// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The task that owns the [`crate::InputDevice`] and hands events to whichever
//! [`crate::Selector`] session is running.

// Attach.
pub mod input_dispatcher;

// Re-export.
pub use input_dispatcher::*;
