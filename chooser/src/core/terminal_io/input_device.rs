// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::event::EventStream;
use futures_util::{FutureExt, StreamExt};

use crate::{CrosstermEventResult, InputEvent, PinnedInputStream};

/// This struct represents an input device that can be used to read from the terminal. See
/// [`crate::InputDeviceExtMock`] for testing features.
#[allow(missing_debug_implementations)]
pub struct InputDevice {
    pub resource: PinnedInputStream<CrosstermEventResult>,
}

impl InputDevice {
    #[must_use]
    pub fn new_event_stream() -> InputDevice {
        InputDevice {
            resource: Box::pin(EventStream::new()),
        }
    }
}

impl InputDevice {
    /// Waits for the next event that this crate cares about. Events that don't map to an
    /// [`InputEvent`] (mouse, focus, paste, key release, etc) are skipped.
    ///
    /// Returns `None` once the underlying stream has ended or failed; callers treat that
    /// as "no more input will ever arrive".
    ///
    /// This is cancel safe: an event is only ever consumed from the stream when it is
    /// either returned or skipped.
    pub async fn next_input_event(&mut self) -> Option<InputEvent> {
        loop {
            match self.resource.next().fuse().await {
                Some(Ok(event)) => {
                    if let Ok(input_event) = InputEvent::try_from(event) {
                        return Some(input_event);
                    }
                }
                Some(Err(error)) => {
                    tracing::error!(message = "Input stream failed", error = ?error);
                    return None;
                }
                None => return None,
            }
        }
    }
}
