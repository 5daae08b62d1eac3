// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::Size;

/// The keys a chooser session reacts to. Everything else on the keyboard is dropped at
/// conversion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Character(char),
    Up,
    Down,
    Enter,
    Backspace,
    Esc,
    CtrlC,
}

/// Input events after conversion from raw [`crossterm`] events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    Keyboard(Key),
    Resize(Size),
    /// The process received an interrupt signal (`SIGINT`), as opposed to the `Ctrl+C`
    /// key press that a terminal in raw mode delivers as [`Key::CtrlC`].
    Interrupt,
}

/// Events that can't be represented as an [`InputEvent`] are rejected with `Err(())` and
/// are meant to be skipped.
impl TryFrom<Event> for InputEvent {
    type Error = ();

    fn try_from(event: Event) -> Result<Self, Self::Error> {
        match event {
            Event::Key(key_event) => Key::try_from(key_event).map(InputEvent::Keyboard),
            Event::Resize(cols, rows) => Ok(InputEvent::Resize(Size::from((cols, rows)))),
            _ => Err(()),
        }
    }
}

impl TryFrom<KeyEvent> for Key {
    type Error = ();

    fn try_from(key_event: KeyEvent) -> Result<Self, Self::Error> {
        // Windows reports both press and release.
        if key_event.kind == KeyEventKind::Release {
            return Err(());
        }

        let KeyEvent {
            code, modifiers, ..
        } = key_event;

        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                Ok(Key::CtrlC)
            }
            KeyCode::Char(_)
                if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Err(())
            }
            KeyCode::Char(ch) => Ok(Key::Character(ch)),
            KeyCode::Up => Ok(Key::Up),
            KeyCode::Down => Ok(Key::Down),
            KeyCode::Enter => Ok(Key::Enter),
            KeyCode::Backspace => Ok(Key::Backspace),
            KeyCode::Esc => Ok(Key::Esc),
            _ => Err(()),
        }
    }
}
