// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::IsTerminal;

use miette::IntoDiagnostic;

use crate::Size;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum TTYResult {
    IsInteractive,
    IsNotInteractive,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum StdoutIsPipedResult {
    StdoutIsPiped,
    StdoutIsNotPiped,
}

/// Get the terminal size.
///
/// # Errors
///
/// Returns an error if the terminal size cannot be determined, eg: when there is no TTY.
pub fn get_size() -> miette::Result<Size> {
    let size = crossterm::terminal::size().into_diagnostic()?;
    Ok(Size::from(size))
}

/// Returns [`TTYResult::IsInteractive`] if stdin is an interactive terminal, which is
/// required to read key presses.
#[must_use]
pub fn is_stdin_interactive() -> TTYResult {
    if std::io::stdin().is_terminal() {
        TTYResult::IsInteractive
    } else {
        TTYResult::IsNotInteractive
    }
}

/// Returns [`TTYResult::IsInteractive`] if stderr is an interactive terminal.
#[must_use]
pub fn is_stderr_interactive() -> TTYResult {
    if std::io::stderr().is_terminal() {
        TTYResult::IsInteractive
    } else {
        TTYResult::IsNotInteractive
    }
}

/// If you run `chs a b c | xargs echo` the following will return
/// [`StdoutIsPipedResult::StdoutIsPiped`].
/// More info: <https://unix.stackexchange.com/questions/597083/how-does-piping-affect-stdin>
#[must_use]
pub fn is_stdout_piped() -> StdoutIsPipedResult {
    if std::io::stdout().is_terminal() {
        StdoutIsPipedResult::StdoutIsNotPiped
    } else {
        StdoutIsPipedResult::StdoutIsPiped
    }
}
