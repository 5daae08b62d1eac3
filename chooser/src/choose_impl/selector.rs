// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::style::Color;
use tracing::{Dispatch, instrument::WithSubscriber};

use crate::{ChooseError, CursorMove, DEVELOPMENT_MODE, InputEvent, Item, Key,
            SafeRenderSurface, SelectorConfig, SelectorState, SessionChannel,
            SessionEvent, SessionRoute, StatusLine, lock_surface, render_cursor_move,
            render_page};

/// A list chooser drawn on rows `row_offset..height` of a shared render surface.
///
/// The selector doesn't read input itself. Hand [`Selector::route`] to an
/// [`crate::InputDispatcher`], which delivers events while a session is running.
///
/// Only one session runs at a time: a second [`Selector::choose`] call waits until the
/// first one has returned. Once registered, that holds across every widget on the same
/// dispatcher, since they all draw on the same surface.
#[allow(missing_debug_implementations)]
pub struct Selector {
    config: SelectorConfig,
    surface: SafeRenderSurface,
    status_line: StatusLine,
    log_dispatch: Dispatch,
    channel: SessionChannel,
}

/// What the event loop does after handling one event.
#[derive(Debug)]
pub enum EventLoopResult {
    Continue,
    /// Only the highlight moved.
    RerenderRows { old_row: usize, new_row: usize },
    Rerender,
    ExitWithResult(usize),
    ExitWithoutResult,
    ExitWithError(ChooseError),
}

impl Selector {
    /// Filtering is enabled, logging goes nowhere, see the `with_*` methods to change
    /// that.
    #[must_use]
    pub fn new(row_offset: usize, surface: SafeRenderSurface, status_line: StatusLine) -> Self {
        let config = SelectorConfig {
            row_offset,
            ..Default::default()
        };
        Self {
            channel: SessionChannel::new(config.event_queue_capacity),
            config,
            surface,
            status_line,
            log_dispatch: Dispatch::none(),
        }
    }

    /// Takes effect at the start of the next session.
    pub fn set_offset(&mut self, row_offset: usize) { self.config.row_offset = row_offset; }

    #[must_use]
    pub fn with_filter(mut self) -> Self {
        self.config.is_filter_enabled = true;
        self
    }

    #[must_use]
    pub fn without_filter(mut self) -> Self {
        self.config.is_filter_enabled = false;
        self
    }

    /// Background of the row under the cursor.
    #[must_use]
    pub fn with_highlight(mut self, highlight_bg: Color) -> Self {
        self.config.highlight_bg = highlight_bg;
        self
    }

    /// Sessions log through `dispatch` instead of discarding everything. Build one with
    /// [`crate::TracingConfig::try_create_dispatch`].
    #[must_use]
    pub fn with_log_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.log_dispatch = dispatch;
        self
    }

    /// Replaces the event queue, so call this before [`Selector::route`].
    #[must_use]
    pub fn with_event_queue_capacity(mut self, capacity: usize) -> Self {
        self.config.event_queue_capacity = capacity;
        self.channel = SessionChannel::new(capacity);
        self
    }

    #[must_use]
    pub fn config(&self) -> &SelectorConfig { &self.config }

    /// Register this with the [`crate::InputDispatcher`].
    #[must_use]
    pub fn route(&self) -> SessionRoute { self.channel.route() }

    /// Show `items` and let the user pick one.
    ///
    /// Returns the index into `items` (not into the filtered list) of the row under the
    /// cursor when Enter is pressed. Enter does nothing when the filter matches no item.
    ///
    /// # Errors
    ///
    /// - [`ChooseError::Interrupted`] on Esc, Ctrl+C, or an interrupt signal.
    /// - [`ChooseError::EmptyList`] if `items` is empty. Nothing is drawn.
    /// - [`ChooseError::InputClosed`] if the input source ended.
    /// - [`ChooseError::UnexpectedIndex`] if paging got out of sync with the filtered
    ///   list.
    /// - [`ChooseError::Render`] if the terminal can't be painted.
    pub async fn choose<T: Item>(&self, items: &[T]) -> Result<usize, ChooseError> {
        if items.is_empty() {
            return Err(ChooseError::EmptyList);
        }
        self.run_session(items)
            .with_subscriber(self.log_dispatch.clone())
            .await
    }

    async fn run_session<T: Item>(&self, items: &[T]) -> Result<usize, ChooseError> {
        let mut session = self.channel.begin().await?;

        let surface_height = lock_surface(&self.surface).size().row_height;
        let mut state = SelectorState::new(items, self.config.page_capacity(surface_height));
        tracing::debug!(
            message = "Session started",
            item_count = items.len(),
            page_capacity = state.page_capacity()
        );

        self.render(&state, items)?;

        loop {
            let input_event = match session.next_event().await {
                Some(SessionEvent::Input(input_event)) => input_event,
                Some(SessionEvent::InputClosed) | None => {
                    tracing::debug!(message = "Input closed during session");
                    return Err(ChooseError::InputClosed);
                }
            };

            match handle_event(&self.config, &mut state, items, input_event) {
                EventLoopResult::Continue => {}
                EventLoopResult::RerenderRows { old_row, new_row } => {
                    render_cursor_move(&self.surface, &self.config, old_row, new_row)?;
                }
                EventLoopResult::Rerender => self.render(&state, items)?,
                EventLoopResult::ExitWithResult(index) => {
                    tracing::debug!(message = "Session committed", index = index);
                    return Ok(index);
                }
                EventLoopResult::ExitWithoutResult => {
                    tracing::debug!(message = "Session cancelled");
                    return Err(ChooseError::Interrupted);
                }
                EventLoopResult::ExitWithError(error) => return Err(error),
            }
        }
    }

    fn render<T: Item>(&self, state: &SelectorState, items: &[T]) -> std::io::Result<()> {
        render_page(&self.surface, &self.status_line, &self.config, state, items)
    }
}

/// Apply one event to `state`. No drawing happens here; the result says what has to be
/// redrawn, or how the session ends.
pub fn handle_event<T: Item>(
    config: &SelectorConfig,
    state: &mut SelectorState,
    items: &[T],
    input_event: InputEvent,
) -> EventLoopResult {
    DEVELOPMENT_MODE.then(|| {
        // % is Display, ? is Debug.
        tracing::debug!(
            message = "handle_event() *before*",
            input_event = ?input_event,
            state = ?state
        );
    });

    let return_it = match input_event {
        InputEvent::Resize(size) => {
            state.resize(config.page_capacity(size.row_height));
            EventLoopResult::Rerender
        }

        InputEvent::Interrupt | InputEvent::Keyboard(Key::Esc | Key::CtrlC) => {
            EventLoopResult::ExitWithoutResult
        }

        InputEvent::Keyboard(Key::Down) => cursor_move_to_result(state.move_cursor_down()),

        InputEvent::Keyboard(Key::Up) => cursor_move_to_result(state.move_cursor_up()),

        InputEvent::Keyboard(Key::Enter) => {
            if state.filtered_view().is_empty() {
                EventLoopResult::Continue
            } else {
                match state.resolve_index() {
                    Ok(index) => EventLoopResult::ExitWithResult(index),
                    Err(error) => {
                        tracing::error!(message = "Could not resolve selection", error = ?error);
                        EventLoopResult::ExitWithError(error)
                    }
                }
            }
        }

        InputEvent::Keyboard(Key::Backspace) if config.is_filter_enabled => {
            if state.pop_filter_char() {
                state.recompute_filtered_view(items);
                EventLoopResult::Rerender
            } else {
                EventLoopResult::Continue
            }
        }

        InputEvent::Keyboard(Key::Character(ch)) if config.is_filter_enabled => {
            state.append_filter_char(ch);
            state.recompute_filtered_view(items);
            EventLoopResult::Rerender
        }

        InputEvent::Keyboard(Key::Backspace | Key::Character(_)) => EventLoopResult::Continue,
    };

    DEVELOPMENT_MODE.then(|| {
        // % is Display, ? is Debug.
        tracing::debug!(
            message = "handle_event() *after*",
            result = ?return_it,
            state = ?state
        );
    });

    return_it
}

fn cursor_move_to_result(cursor_move: CursorMove) -> EventLoopResult {
    match cursor_move {
        CursorMove::Unchanged => EventLoopResult::Continue,
        CursorMove::WithinPage { old_row, new_row } => {
            EventLoopResult::RerenderRows { old_row, new_row }
        }
        CursorMove::PageChanged => EventLoopResult::Rerender,
    }
}
