// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::Write;

use crossterm::{QueueableCommand,
                cursor::{Hide, Show},
                terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
                           disable_raw_mode, enable_raw_mode}};
use miette::IntoDiagnostic;

use crate::{LockedOutputDevice, OutputDevice, lock_output_device_as_mut};

/// Puts the terminal in raw mode, switches to the alternate screen, and hides the cursor
/// for as long as this guard is alive. All of it is undone when the guard is dropped,
/// including when unwinding from a panic or returning early with `?`.
#[allow(missing_debug_implementations)]
pub struct TerminalModeGuard {
    output_device: OutputDevice,
}

impl TerminalModeGuard {
    /// # Errors
    ///
    /// Returns an error if raw mode can't be enabled (eg: stdin isn't a TTY) or if the
    /// setup sequences can't be written.
    pub fn try_enter(output_device: OutputDevice) -> miette::Result<Self> {
        enable_raw_mode().into_diagnostic()?;

        // From here on, `Drop` restores the terminal even if the writes below fail.
        let this = Self { output_device };
        {
            let out: LockedOutputDevice<'_> = lock_output_device_as_mut!(this.output_device);
            out.queue(EnterAlternateScreen).into_diagnostic()?;
            out.queue(Hide).into_diagnostic()?;
            out.queue(Clear(ClearType::All)).into_diagnostic()?;
            out.flush().into_diagnostic()?;
        }

        tracing::debug!(message = "Entered raw mode and alternate screen");
        Ok(this)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        {
            let out: LockedOutputDevice<'_> = lock_output_device_as_mut!(self.output_device);
            let result = restore(out);
            if let Err(error) = result {
                tracing::error!(message = "Failed to leave alternate screen", error = ?error);
            }
        }
        if let Err(error) = disable_raw_mode() {
            tracing::error!(message = "Failed to disable raw mode", error = ?error);
        }
    }
}

fn restore(out: LockedOutputDevice<'_>) -> std::io::Result<()> {
    out.queue(Show)?;
    out.queue(LeaveAlternateScreen)?;
    out.flush()
}
