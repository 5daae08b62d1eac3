// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Building blocks shared by every other module: dimensions, terminal I/O, logging, and
//! test fixtures.

// Attach sources.
pub mod log;
pub mod terminal_io;
pub mod test_fixtures;
pub mod units;

// Re-export.
pub use log::*;
pub use terminal_io::*;
pub use test_fixtures::*;
pub use units::*;
