// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The [`Item`] render contract, and the row types of an S3 style browser built on top
//! of it.

// Attach.
pub mod action_command;
pub mod bucket_entry;
pub mod item_trait;
pub mod object_entry;

// Re-export.
pub use action_command::*;
pub use bucket_entry::*;
pub use item_trait::*;
pub use object_entry::*;
