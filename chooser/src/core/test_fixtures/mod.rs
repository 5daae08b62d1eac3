// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Mock input and output devices. These are compiled into the library (not just
//! `#[cfg(test)]`) so that integration tests and downstream crates can drive a
//! [`crate::Selector`] without a real terminal.

// Attach sources.
pub mod input_device_fixtures;
pub mod output_device_fixtures;

// Re-export.
pub use input_device_fixtures::*;
pub use output_device_fixtures::*;
