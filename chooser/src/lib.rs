// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # r3bl_chooser
//!
//! An async, keyboard driven list chooser for terminal apps. Given an ordered list of
//! renderable items, the user can page through them, narrow them down with an
//! incremental substring filter, move a cursor, and commit a selection. The caller gets
//! back the index of the chosen item in its *original* list, or
//! [`ChooseError::Interrupted`] if the user cancelled.
//!
//! The pieces:
//!
//! | Piece               | What it does                                                   |
//! | ------------------- | -------------------------------------------------------------- |
//! | [`Selector`]        | Runs one selection session at a time; paging, filter, cursor.  |
//! | [`SelectorState`]   | Pure cursor / page / filter math, no I/O.                      |
//! | [`Item`]            | Render contract for list rows.                                 |
//! | [`StatusLine`]      | Single row of transient messages, with severity colors.        |
//! | [`InputDispatcher`] | Owns the [`InputDevice`] and routes events to active sessions. |
//! | [`RenderSurface`]   | Cell grid trait; [`OffscreenBuffer`] paints it via crossterm.  |
//!
//! # Wiring it up
//!
//! ```no_run
//! use std::sync::Arc;
//! use r3bl_chooser::{DispatchOptions, InputDevice, InputDispatcher, OffscreenBuffer,
//!                    OutputDevice, SafeRenderSurface, Selector, StatusLine, StdMutex,
//!                    TerminalModeGuard, get_size};
//!
//! # async fn run() -> miette::Result<()> {
//! let output_device = OutputDevice::new_stdout();
//! let mode_guard = TerminalModeGuard::try_enter(output_device.clone())?;
//! let surface: SafeRenderSurface = Arc::new(StdMutex::new(OffscreenBuffer::new(
//!     get_size()?,
//!     output_device,
//! )));
//!
//! let status_line = StatusLine::new(1, surface.clone());
//! let selector = Selector::new(2, surface.clone(), status_line.clone());
//!
//! let dispatcher = InputDispatcher::spawn(
//!     InputDevice::new_event_stream(),
//!     surface.clone(),
//!     status_line,
//!     DispatchOptions::default(),
//! );
//! dispatcher.register(selector.route());
//!
//! let items = vec!["apple".to_string(), "banana".to_string()];
//! let result = selector.choose(&items).await;
//!
//! dispatcher.shutdown().await?;
//! drop(mode_guard);
//! println!("{result:?}");
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! A [`Selector`] never logs to the process wide subscriber. It carries an injected
//! [`tracing::Dispatch`] (a no-op by default, see [`Selector::with_log_dispatch`]).
//! Build one with [`TracingConfig::try_create_dispatch`].

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach modules (re-exported below to provide a flat public API).
pub mod choose_impl;
pub mod core;
pub mod dispatch;
pub mod item;
pub mod render_surface;
pub mod status_line;

// Re-export.
pub use choose_impl::*;
pub use core::*;
pub use dispatch::*;
pub use item::*;
pub use render_surface::*;
pub use status_line::*;
