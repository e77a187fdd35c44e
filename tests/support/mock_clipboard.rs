use std::cell::RefCell;
use std::rc::Rc;

use vi_mode::traits::Clipboard;

/// In-memory clipboard whose content tests can inspect from outside the
/// engine through a shared handle.
#[derive(Default, Debug, Clone)]
pub struct MockClipboard {
    content: Rc<RefCell<Option<String>>>,
}

impl MockClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A second handle onto the same storage.
    pub fn handle(&self) -> Self {
        self.clone()
    }

    pub fn content(&self) -> Option<String> {
        self.content.borrow().clone()
    }

    pub fn set_content(&self, text: &str) {
        *self.content.borrow_mut() = Some(text.to_string());
    }
}

impl Clipboard for MockClipboard {
    fn get(&mut self) -> Option<String> {
        self.content.borrow().clone()
    }

    fn set(&mut self, text: String) {
        *self.content.borrow_mut() = Some(text);
    }
}
