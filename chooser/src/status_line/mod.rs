// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod severity;
pub mod status_line_impl;

// Re-export.
pub use severity::*;
pub use status_line_impl::*;
