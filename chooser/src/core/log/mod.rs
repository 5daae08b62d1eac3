// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Tracing setup. Nothing in here installs itself implicitly: you either build a
//! [`tracing::Dispatch`] to inject into a [`crate::Selector`], or explicitly install it
//! as the global default (which is what the `chs` binary does).

// Attach.
pub mod rolling_file_appender_impl;
pub mod tracing_config;
pub mod tracing_init;

// Re-export.
pub use tracing_config::*;
pub use tracing_init::*;
