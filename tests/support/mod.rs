#![allow(dead_code)]

pub mod mock_buffer;
pub mod mock_clipboard;

use vi_mode::traits::Buffer;
use vi_mode::{Engine, InputEvent, KeyCode, KeyEvent, Modifiers};

pub fn key(c: char) -> InputEvent {
    InputEvent::Key(KeyEvent {
        code: KeyCode::Char(c),
        mods: Modifiers::empty(),
    })
}

pub fn ctrl(c: char) -> InputEvent {
    InputEvent::Key(KeyEvent {
        code: KeyCode::Char(c),
        mods: Modifiers::CTRL,
    })
}

pub fn esc() -> InputEvent {
    InputEvent::Key(KeyEvent {
        code: KeyCode::Esc,
        mods: Modifiers::empty(),
    })
}

pub fn enter() -> InputEvent {
    InputEvent::Key(KeyEvent {
        code: KeyCode::Enter,
        mods: Modifiers::empty(),
    })
}

pub fn backspace() -> InputEvent {
    InputEvent::Key(KeyEvent {
        code: KeyCode::Backspace,
        mods: Modifiers::empty(),
    })
}

/// Feed every character of `keys` as an individual key press.
pub fn feed(engine: &mut Engine, buffer: &mut dyn Buffer, keys: &str) {
    for c in keys.chars() {
        engine.handle_event(buffer, key(c));
    }
}
