/// The current input mode of the engine.
///
/// Vi is modal: the same keys perform different actions depending on the
/// current mode. Selections are not a mode of their own; they are an
/// orthogonal flag carried by [`ModeState`](crate::state::ModeState) while
/// the engine stays in [`Mode::Navigation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Navigation mode - motions, operators, and command composition.
    Navigation,
    /// Insert mode - typed characters go into the buffer.
    Insert,
    /// Block-insert mode - typed characters are buffered and replayed on
    /// every line a block selection spanned.
    InsertMultiple,
    /// Replace mode - typed characters overwrite existing text.
    Replace,
    /// Single replace - the next character overwrites the one under the
    /// cursor, then the engine returns to Navigation.
    ReplaceSingle,
}

/// The shape of a selection, and of register contents when pasted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    /// Character-wise (v).
    Characters,
    /// Line-wise (V).
    Lines,
    /// Rectangular column block (Ctrl-V).
    Block,
}

/// What the engine did with an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    /// The event completed one or more bindings.
    Handled,
    /// The event extended a multi-key sequence still waiting for input.
    Pending,
    /// The event was invalid where it arrived; the host should ring its
    /// bell. Composition state is preserved unless Escape cleared it.
    Bell,
}
