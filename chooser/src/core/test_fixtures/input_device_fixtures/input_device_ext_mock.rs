// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use super::{gen_input_stream, gen_input_stream_with_delay};
use crate::{CrosstermEventResult, InlineVec, InputDevice};

pub trait InputDeviceExtMock {
    fn new_mock(generator_vec: InlineVec<CrosstermEventResult>) -> InputDevice;

    fn new_mock_with_delay(
        generator_vec: InlineVec<CrosstermEventResult>,
        delay: Duration,
    ) -> InputDevice;
}

impl InputDeviceExtMock for InputDevice {
    fn new_mock(generator_vec: InlineVec<CrosstermEventResult>) -> InputDevice {
        InputDevice {
            resource: gen_input_stream(generator_vec),
        }
    }

    fn new_mock_with_delay(
        generator_vec: InlineVec<CrosstermEventResult>,
        delay: Duration,
    ) -> InputDevice {
        InputDevice {
            resource: gen_input_stream_with_delay(generator_vec, delay),
        }
    }
}

/// Shorthand for scripting key presses in mock input streams.
#[must_use]
pub fn key_press(code: KeyCode) -> CrosstermEventResult {
    Ok(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

/// Shorthand for typing a string into a mock input stream, one event per char.
#[must_use]
pub fn key_presses_for_text(text: &str) -> InlineVec<CrosstermEventResult> {
    text.chars().map(|ch| key_press(KeyCode::Char(ch))).collect()
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::*;
    use crate::{InputEvent, Key};

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_mock_input_device_scripted_text() {
        let mut events = key_presses_for_text("ab");
        events.push(key_press(KeyCode::Enter));
        let mut input_device = InputDevice::new_mock(events);

        for expected in [Key::Character('a'), Key::Character('b'), Key::Enter] {
            pretty_assertions::assert_eq!(
                input_device.next_input_event().await,
                Some(InputEvent::Keyboard(expected))
            );
        }
        pretty_assertions::assert_eq!(input_device.next_input_event().await, None);
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_mock_input_device_with_delay() {
        let mut input_device = InputDevice::new_mock_with_delay(
            smallvec![key_press(KeyCode::Esc)],
            Duration::from_millis(5),
        );
        pretty_assertions::assert_eq!(
            input_device.next_input_event().await,
            Some(InputEvent::Keyboard(Key::Esc))
        );
    }
}
