// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A grid of styled cells that widgets draw into, and that gets painted to the terminal
//! on [`RenderSurface::flush`].

// Attach.
pub mod offscreen_buffer;
pub mod pixel_char;
pub mod render_surface_trait;

// Re-export.
pub use offscreen_buffer::*;
pub use pixel_char::*;
pub use render_surface_trait::*;
