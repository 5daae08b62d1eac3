// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! `chs` picks one item from a list in the terminal and prints it, eg:
//! `chs apple banana cherry` or `ls | chs --from-file /dev/stdin`.
//!
//! The chosen item is printed to stdout as `{index}\t{item}`, where `index` is its
//! position in the original list. The list is drawn on stderr when stdout is piped, so
//! `chs a b c | cut -f2` works. Cancelling with Esc or Ctrl+C exits with code 130.

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use clap::Parser;
use crossterm::style::Color;
use miette::{IntoDiagnostic, bail};
use r3bl_chooser::{CellStyle, ChooseError, DEFAULT_LOG_FILE_NAME, DEFAULT_ROW_OFFSET,
                   DispatchOptions, InputDevice, InputDispatcher, OffscreenBuffer,
                   OutputDevice, Pos, RenderSurface, SafeRenderSurface, Selector,
                   StatusLine, StdMutex, StdoutIsPipedResult, TTYResult,
                   TerminalModeGuard, TracingConfig, get_size, is_stdin_interactive,
                   is_stdout_piped, lock_surface};
use tracing::Dispatch;
use tracing_core::LevelFilter;

const HEADER_TEXT: &str = "Enter to choose, Esc to cancel";
const STATUS_ROW_INDEX: usize = 1;
const EXIT_CODE_INTERRUPTED: u8 = 130;

/// More info: <https://docs.rs/clap/latest/clap/_derive/_tutorial/chapter_2/index.html>
#[derive(Debug, Parser)]
#[command(bin_name = "chs")]
#[command(about = "Choose one item from a list, with paging and incremental filtering")]
#[command(version)]
#[command(next_line_help = true)]
#[command(arg_required_else_help(true))]
pub struct CliArg {
    #[arg(name = "items")]
    pub items: Vec<String>,

    #[arg(
        long,
        short = 'f',
        help = "Also read items from this file, one per line. Empty lines are skipped."
    )]
    pub from_file: Option<PathBuf>,

    #[arg(long, help = "Ignore typed characters instead of filtering the list.")]
    pub no_filter: bool,

    #[arg(
        long,
        short = 'o',
        default_value_t = DEFAULT_ROW_OFFSET,
        help = "Rows above the list. The first two hold the header and the status line."
    )]
    pub offset: usize,

    #[arg(
        long,
        short = 'l',
        help = "Log to this file. Setting the DEBUG env var logs to `ls3.log` instead."
    )]
    pub log_file: Option<PathBuf>,

    #[arg(long, default_value = "debug", help = "One of off, error, warn, info, debug, trace.")]
    pub log_level: LevelFilter,
}

#[tokio::main]
#[allow(clippy::needless_return)]
async fn main() -> miette::Result<ExitCode> {
    let cli_arg = CliArg::parse();

    let log_dispatch = create_log_dispatch(&cli_arg)?;

    // % is Display, ? is Debug.
    tracing::debug!(message = "Start logging...", cli_arg = ?cli_arg);

    let items = load_items(&cli_arg)?;
    if items.is_empty() {
        bail!("Nothing to choose from: pass items as arguments or with --from-file");
    }
    if cli_arg.offset < DEFAULT_ROW_OFFSET {
        bail!("--offset must be at least {DEFAULT_ROW_OFFSET}");
    }
    if is_stdin_interactive() == TTYResult::IsNotInteractive {
        bail!("stdin is not an interactive terminal, there is no way to read key presses");
    }

    let result = run_chooser(&cli_arg, &items, log_dispatch).await?;
    tracing::debug!(message = "Stop logging...", result = ?result);

    match result {
        Ok(index) => {
            if let Some(item) = items.get(index) {
                println!("{index}\t{item}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(ChooseError::Interrupted) => Ok(ExitCode::from(EXIT_CODE_INTERRUPTED)),
        Err(error) => Err(error.into()),
    }
}

/// The terminal is restored before this returns, so the caller can print freely.
async fn run_chooser(
    cli_arg: &CliArg,
    items: &[String],
    log_dispatch: Dispatch,
) -> miette::Result<Result<usize, ChooseError>> {
    let output_device = match is_stdout_piped() {
        StdoutIsPipedResult::StdoutIsPiped => OutputDevice::new_stderr(),
        StdoutIsPipedResult::StdoutIsNotPiped => OutputDevice::new_stdout(),
    };

    let mode_guard = TerminalModeGuard::try_enter(output_device.clone())?;

    let surface: SafeRenderSurface = Arc::new(StdMutex::new(OffscreenBuffer::new(
        get_size()?,
        output_device,
    )));
    draw_header(&surface).into_diagnostic()?;

    let status_line = StatusLine::new(STATUS_ROW_INDEX, surface.clone());

    let mut selector = Selector::new(cli_arg.offset, surface.clone(), status_line.clone())
        .with_log_dispatch(log_dispatch.clone());
    if cli_arg.no_filter {
        selector = selector.without_filter();
    }

    let dispatcher = InputDispatcher::spawn(
        InputDevice::new_event_stream(),
        surface,
        status_line,
        DispatchOptions {
            bridge_interrupt_signal: true,
            log_dispatch,
        },
    );
    dispatcher.register(selector.route());

    let result = selector.choose(items).await;

    dispatcher.shutdown().await?;
    drop(mode_guard);

    Ok(result)
}

fn draw_header(surface: &SafeRenderSurface) -> std::io::Result<()> {
    let mut surface = lock_surface(surface);
    surface.print_text(
        Pos::new(0, 0),
        HEADER_TEXT,
        CellStyle::fg(Color::Green).bold(),
    );
    surface.flush()
}

fn load_items(cli_arg: &CliArg) -> miette::Result<Vec<String>> {
    let mut items = cli_arg.items.clone();
    if let Some(path) = &cli_arg.from_file {
        let content = std::fs::read_to_string(path).into_diagnostic()?;
        items.extend(
            content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string),
        );
    }
    Ok(items)
}

/// `--log-file` wins over `DEBUG`. Without either, nothing is logged.
fn create_log_dispatch(cli_arg: &CliArg) -> miette::Result<Dispatch> {
    let maybe_log_file = match &cli_arg.log_file {
        Some(path) => Some(path.display().to_string()),
        None => std::env::var_os("DEBUG").map(|_| DEFAULT_LOG_FILE_NAME.to_string()),
    };

    let Some(log_file) = maybe_log_file else {
        return Ok(Dispatch::none());
    };

    let dispatch = TracingConfig::new_file(log_file, cli_arg.log_level).try_create_dispatch()?;
    tracing::dispatcher::set_global_default(dispatch.clone()).into_diagnostic()?;
    Ok(dispatch)
}
