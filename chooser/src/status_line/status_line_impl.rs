// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{sync::{Arc, MutexGuard, PoisonError},
          time::Duration};

use tokio::sync::oneshot;
use tracing::instrument::WithSubscriber;

use crate::{Pos, SafeRenderSurface, Severity, StdMutex, lock_surface};

/// Resolves when a message is done: right away for a message without a delay, or once
/// the delay has elapsed (and the message was cleared, unless a newer one replaced it).
pub type StatusDone = oneshot::Receiver<()>;

/// A single row of the screen used for transient messages, eg: `Filter query> ab` or
/// `Downloading report.csv ...`.
///
/// It is cheap to clone; clones share the same row and the same "current message".
/// The last message shown wins: a timer from an older message never clears a newer one.
#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct StatusLine {
    row_index: usize,
    surface: SafeRenderSurface,
    shared: Arc<StdMutex<StatusLineState>>,
}

#[derive(Debug, Default)]
struct StatusLineState {
    current: Option<ShownMessage>,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ShownMessage {
    text: String,
    severity: Severity,
    generation: u64,
}

impl StatusLine {
    #[must_use]
    pub fn new(row_index: usize, surface: SafeRenderSurface) -> Self {
        Self {
            row_index,
            surface,
            shared: Arc::new(StdMutex::new(StatusLineState::default())),
        }
    }

    #[must_use]
    pub fn row_index(&self) -> usize { self.row_index }

    /// Text and severity of the message on screen right now, if any.
    #[must_use]
    pub fn current_message(&self) -> Option<(String, Severity)> {
        self.lock_state()
            .current
            .as_ref()
            .map(|it| (it.text.clone(), it.severity))
    }

    /// Paint `message` on the status row, padded to the right edge with the severity's
    /// background, and flush.
    ///
    /// With a zero `delay` the message stays until replaced and the returned signal
    /// resolves immediately. Otherwise a timer task clears the row after `delay` (if this
    /// is still the current message) and then resolves the signal.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface can't be flushed.
    ///
    /// # Panics
    ///
    /// A non zero `delay` spawns a tokio task, which panics outside of a tokio runtime.
    pub fn show(
        &self,
        message: impl Into<String>,
        severity: Severity,
        delay: Duration,
    ) -> std::io::Result<StatusDone> {
        let text = message.into();
        let generation = {
            let mut state = self.lock_state();
            state.generation += 1;
            let generation = state.generation;
            self.paint(&text, severity)?;
            state.current = Some(ShownMessage {
                text,
                severity,
                generation,
            });
            generation
        };

        let (sender, receiver) = oneshot::channel();

        if delay.is_zero() {
            sender.send(()).ok();
            return Ok(receiver);
        }

        let this = self.clone();
        let timer = async move {
            tokio::time::sleep(delay).await;
            if let Err(error) = this.clear_if_current(generation) {
                tracing::warn!(message = "Failed to clear status line", error = ?error);
            }
            sender.send(()).ok();
        };
        tokio::spawn(timer.with_current_subscriber());

        Ok(receiver)
    }

    /// [`Severity::Neutral`] message.
    ///
    /// # Errors
    ///
    /// See [`Self::show`].
    pub fn message(
        &self,
        message: impl Into<String>,
        delay: Duration,
    ) -> std::io::Result<StatusDone> {
        self.show(message, Severity::Neutral, delay)
    }

    /// # Errors
    ///
    /// See [`Self::show`].
    pub fn info(
        &self,
        message: impl Into<String>,
        delay: Duration,
    ) -> std::io::Result<StatusDone> {
        self.show(message, Severity::Info, delay)
    }

    /// # Errors
    ///
    /// See [`Self::show`].
    pub fn warn(
        &self,
        message: impl Into<String>,
        delay: Duration,
    ) -> std::io::Result<StatusDone> {
        self.show(message, Severity::Warning, delay)
    }

    /// # Errors
    ///
    /// See [`Self::show`].
    pub fn error(
        &self,
        message: impl Into<String>,
        delay: Duration,
    ) -> std::io::Result<StatusDone> {
        self.show(message, Severity::Error, delay)
    }

    /// Blank the row and forget the current message. Pending timers become no-ops.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface can't be flushed.
    pub fn clear(&self) -> std::io::Result<()> {
        let mut state = self.lock_state();
        state.current = None;
        self.blank()
    }

    /// Repaint the current message after the surface was resized (and possibly wiped).
    ///
    /// # Errors
    ///
    /// Returns an error if the surface can't be flushed.
    pub fn on_resize(&self) -> std::io::Result<()> {
        let state = self.lock_state();
        match &state.current {
            Some(shown) => self.paint(&shown.text, shown.severity),
            None => Ok(()),
        }
    }

    fn clear_if_current(&self, generation: u64) -> std::io::Result<()> {
        let mut state = self.lock_state();
        let is_current = state
            .current
            .as_ref()
            .is_some_and(|it| it.generation == generation);
        if !is_current {
            return Ok(());
        }
        state.current = None;
        self.blank()
    }

    /// The state lock is always taken before the surface lock.
    fn lock_state(&self) -> MutexGuard<'_, StatusLineState> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn paint(&self, text: &str, severity: Severity) -> std::io::Result<()> {
        let style = severity.style();
        let mut surface = lock_surface(&self.surface);
        let end_col = surface.print_text(Pos::new(0, self.row_index), text, style);
        surface.fill_row_from(self.row_index, end_col, style);
        surface.flush()
    }

    fn blank(&self) -> std::io::Result<()> {
        let mut surface = lock_surface(&self.surface);
        surface.clear_rows(self.row_index..self.row_index + 1);
        surface.flush()
    }
}

#[cfg(test)]
mod tests {
    use crossterm::style::Color;

    use super::*;
    use crate::{OffscreenBuffer, OutputDevice, OutputDeviceExt, RenderSurface, Size};

    fn new_status_line() -> (StatusLine, Arc<StdMutex<OffscreenBuffer>>) {
        let (output_device, _) = OutputDevice::new_mock();
        let buffer = Arc::new(StdMutex::new(OffscreenBuffer::new(
            Size::new(12, 3),
            output_device,
        )));
        let surface: SafeRenderSurface = buffer.clone();
        (StatusLine::new(1, surface), buffer)
    }

    fn row_text(buffer: &Arc<StdMutex<OffscreenBuffer>>, row_index: usize) -> String {
        buffer.lock().unwrap().row_text(row_index)
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_zero_delay_resolves_immediately_and_message_stays() {
        let (status_line, buffer) = new_status_line();

        let done = status_line.info("hello", Duration::ZERO).unwrap();
        done.await.unwrap();

        pretty_assertions::assert_eq!(row_text(&buffer, 1), "hello       ");
        let last_cell_style = buffer.lock().unwrap().row(1).unwrap()[11].style();
        pretty_assertions::assert_eq!(last_cell_style.bg, Color::Cyan);
        pretty_assertions::assert_eq!(
            status_line.current_message(),
            Some(("hello".to_string(), Severity::Info))
        );
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_delay_clears_row_after_it_elapses() {
        let (status_line, buffer) = new_status_line();

        let start_time = std::time::Instant::now();
        let done = status_line.warn("careful", Duration::from_millis(30)).unwrap();
        pretty_assertions::assert_eq!(row_text(&buffer, 1), "careful     ");

        done.await.unwrap();
        assert!(start_time.elapsed() >= Duration::from_millis(30));
        pretty_assertions::assert_eq!(row_text(&buffer, 1), "            ");
        pretty_assertions::assert_eq!(status_line.current_message(), None);
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_newer_message_is_not_cleared_by_older_timer() {
        let (status_line, buffer) = new_status_line();

        let older = status_line.error("old", Duration::from_millis(20)).unwrap();
        status_line.message("new", Duration::ZERO).unwrap();

        older.await.unwrap();
        pretty_assertions::assert_eq!(row_text(&buffer, 1), "new         ");
        pretty_assertions::assert_eq!(
            status_line.current_message(),
            Some(("new".to_string(), Severity::Neutral))
        );
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_on_resize_repaints_current_message() {
        let (status_line, buffer) = new_status_line();
        status_line.message("keep me", Duration::ZERO).unwrap();

        buffer.lock().unwrap().resize(Size::new(10, 3));
        buffer.lock().unwrap().clear_rows(0..3);
        status_line.on_resize().unwrap();

        pretty_assertions::assert_eq!(row_text(&buffer, 1), "keep me   ");
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_clear_forgets_message() {
        let (status_line, buffer) = new_status_line();
        status_line.message("bye", Duration::ZERO).unwrap();

        status_line.clear().unwrap();
        status_line.on_resize().unwrap();

        pretty_assertions::assert_eq!(row_text(&buffer, 1), "            ");
        pretty_assertions::assert_eq!(status_line.current_message(), None);
    }
}
