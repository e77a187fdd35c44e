/// Key codes representing individual keys on the keyboard.
///
/// This enum provides a platform-agnostic representation of keys.
/// Hosts should map their platform-specific key events to these codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A character key. Hosts should normalize to lowercase for consistency.
    /// For example, 'A' should be mapped to 'a' unless SHIFT is held.
    Char(char),
    /// The Escape key, used to exit modes and cancel compositions.
    Esc,
    /// The Enter/Return key.
    Enter,
    /// The Backspace key for deleting characters in insert-style modes.
    Backspace,
}

bitflags::bitflags! {
    /// Keyboard modifier flags.
    ///
    /// These can be combined to represent multiple modifiers held simultaneously.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

/// A key press event with optional modifiers.
///
/// This represents a single key press, including any modifier keys held down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub code: KeyCode,
    /// Modifier keys held during the key press.
    pub mods: Modifiers,
}

/// Input events that can be processed by the engine.
///
/// This enum distinguishes between key presses (used for commands)
/// and text input (used in insert-style modes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key press event, typically used for commands and navigation.
    Key(KeyEvent),
    /// A character received in text input mode.
    /// This allows hosts to handle composed characters and IME input.
    ReceivedChar(char),
}

/// Canonical key identity used by the dispatch table and by macro recordings.
///
/// A host [`InputEvent`] collapses to one of these before matching: an
/// unmodified `Char` key press and a `ReceivedChar` are deliberately
/// indistinguishable, so a recorded macro replays identically however the
/// host delivered the original text input. SHIFT is assumed to be baked into
/// the character itself; ALT and META carry no bindings and are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A plain character key.
    Char(char),
    /// A character key with CTRL held, stored lowercase.
    Ctrl(char),
    /// The Escape key.
    Esc,
    /// The Enter/Return key.
    Enter,
    /// The Backspace key.
    Backspace,
}

impl Key {
    /// Collapse a host event into its dispatch identity.
    pub fn from_input(input: &InputEvent) -> Key {
        match input {
            InputEvent::ReceivedChar(ch) => Key::Char(*ch),
            InputEvent::Key(ke) => match ke.code {
                KeyCode::Char(c) if ke.mods.contains(Modifiers::CTRL) => {
                    Key::Ctrl(c.to_ascii_lowercase())
                }
                KeyCode::Char(c) => Key::Char(c),
                KeyCode::Esc => Key::Esc,
                KeyCode::Enter => Key::Enter,
                KeyCode::Backspace => Key::Backspace,
            },
        }
    }

    /// Append this key to a macro body.
    ///
    /// Non-character keys are stored as the control characters a terminal
    /// would have sent for them, which keeps macro bodies plain text and
    /// lets them live in ordinary registers.
    pub fn encode(&self, out: &mut String) {
        match *self {
            Key::Char(c) => out.push(c),
            Key::Ctrl(c) => out.push((c as u8 & 0x1f) as char),
            Key::Esc => out.push('\x1b'),
            Key::Enter => out.push('\r'),
            Key::Backspace => out.push('\x7f'),
        }
    }

    /// Decode a macro body back into keys. Inverse of [`Key::encode`] for
    /// every key the engine binds.
    pub fn decode_all(text: &str) -> Vec<Key> {
        text.chars()
            .map(|c| match c {
                '\x1b' => Key::Esc,
                '\r' => Key::Enter,
                '\x7f' => Key::Backspace,
                c if (c as u32) < 0x20 => Key::Ctrl(((c as u8) | 0x60) as char),
                c => Key::Char(c),
            })
            .collect()
    }
}
