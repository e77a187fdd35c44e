use std::collections::HashMap;
use std::fmt;

use crate::key::Key;
use crate::traits::Clipboard;
use crate::types::SelectionKind;

/// Text stored in a register, together with the shape it should paste as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterContents {
    pub text: String,
    pub kind: SelectionKind,
}

impl RegisterContents {
    pub fn characters(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: SelectionKind::Characters }
    }

    pub fn lines(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: SelectionKind::Lines }
    }

    pub fn block(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: SelectionKind::Block }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// True for characters that may follow `"`, `q`, or `@`.
///
/// `+` is the system clipboard; it behaves as an ordinary named slot until a
/// [`Clipboard`] is attached.
pub fn is_register_id(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '+'
}

/// The session's registers: one unnamed default slot plus named slots keyed
/// by a lowercase letter or digit. Cut/yank payloads and recorded macro
/// bodies share these slots.
#[derive(Default)]
pub struct RegisterFile {
    unnamed: Option<RegisterContents>,
    named: HashMap<char, RegisterContents>,
    clipboard: Option<Box<dyn Clipboard>>,
}

impl fmt::Debug for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterFile")
            .field("unnamed", &self.unnamed)
            .field("named", &self.named)
            .field("clipboard", &self.clipboard.is_some())
            .finish()
    }
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route the `+` register through `clip` from now on.
    pub fn attach_clipboard(&mut self, clip: Box<dyn Clipboard>) {
        self.clipboard = Some(clip);
    }

    /// Store `contents` in the register `name`, or the unnamed one.
    pub fn write(&mut self, name: Option<char>, contents: RegisterContents) {
        match name {
            Some('+') if self.clipboard.is_some() => {
                if let Some(clip) = self.clipboard.as_mut() {
                    clip.set(contents.text);
                }
            }
            Some(ch) => {
                self.named.insert(ch, contents);
            }
            None => self.unnamed = Some(contents),
        }
    }

    /// Contents of the register `name` (or the unnamed one). The clipboard
    /// register reads fresh from the host, hence `&mut self`.
    pub fn read(&mut self, name: Option<char>) -> Option<RegisterContents> {
        match name {
            Some('+') if self.clipboard.is_some() => self
                .clipboard
                .as_mut()
                .and_then(|clip| clip.get())
                .map(RegisterContents::characters),
            Some(ch) => self.named.get(&ch).cloned(),
            None => self.unnamed.clone(),
        }
    }

    /// Direct view of a plain slot, without touching the clipboard.
    pub fn get(&self, name: Option<char>) -> Option<&RegisterContents> {
        match name {
            Some(ch) => self.named.get(&ch),
            None => self.unnamed.as_ref(),
        }
    }

    /// A stored macro body, decoded back into keys.
    pub fn read_keys(&mut self, name: Option<char>) -> Option<Vec<Key>> {
        self.read(name).map(|c| Key::decode_all(&c.text))
    }
}

#[cfg(feature = "clipboard")]
mod system {
    use crate::traits::Clipboard;

    /// System clipboard bridge backed by `arboard`.
    pub struct SystemClipboard {
        inner: arboard::Clipboard,
    }

    impl SystemClipboard {
        /// None when the platform clipboard is unavailable.
        pub fn new() -> Option<Self> {
            arboard::Clipboard::new().ok().map(|inner| Self { inner })
        }
    }

    impl Clipboard for SystemClipboard {
        fn get(&mut self) -> Option<String> {
            self.inner.get_text().ok()
        }

        fn set(&mut self, text: String) {
            let _ = self.inner.set_text(text);
        }
    }
}

#[cfg(feature = "clipboard")]
pub use system::SystemClipboard;
