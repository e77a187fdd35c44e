use crate::key::Key;
use crate::registers::RegisterFile;
use crate::registry::Operator;
use crate::types::{Mode, SelectionKind};

/// Accumulates count digits typed ahead of a command.
#[derive(Debug, Default, Clone)]
pub struct CountBuffer {
    current: Option<u32>,
}

impl CountBuffer {
    pub fn push_digit(&mut self, d: u32) {
        let next = self
            .current
            .unwrap_or(0)
            .saturating_mul(10)
            .saturating_add(d);
        self.current = Some(next);
    }

    /// The accumulated count, consuming it.
    pub fn take(&mut self) -> Option<u32> {
        self.current.take()
    }

    /// The accumulated count, without consuming it.
    pub fn peek(&self) -> Option<u32> {
        self.current
    }

    pub fn in_progress(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

/// An operator key has been pressed and awaits its motion.
///
/// "Operator-pending" is this field being set, not a distinct [`Mode`]: the
/// engine stays in Navigation and every motion binding checks for it.
#[derive(Debug, Clone, Copy)]
pub struct PendingOperator {
    /// The operator to run once a motion resolves the range.
    pub apply: Operator,
    /// Count typed before the operator key, multiplied with the motion's.
    pub count: Option<u32>,
}

/// The most recent f/F/t/T search, replayed by `;` and `,`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterFind {
    pub ch: char,
    pub forward: bool,
    /// Stop one short of the match (t/T).
    pub before: bool,
}

impl CharacterFind {
    /// The same search with its direction flipped, for `,`.
    pub fn reversed(self) -> Self {
        Self { forward: !self.forward, ..self }
    }
}

/// An in-progress macro recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    /// Register the body will be committed to.
    pub register: char,
    /// Raw keys captured so far.
    pub keys: Vec<Key>,
}

/// Pending block-insert replay, captured on entering InsertMultiple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockInsert {
    /// First and last line the block selection spanned.
    pub first_line: usize,
    pub last_line: usize,
    /// Column the buffered text replays at.
    pub column: usize,
    /// Text typed since entry.
    pub text: String,
}

/// Session state for the modal engine.
///
/// One of these lives inside each [`Engine`](crate::Engine); handlers mutate
/// it as keys dispatch. It is never serialized and dies with the session.
#[derive(Debug)]
pub struct ModeState {
    pub mode: Mode,
    /// Active selection shape; selections stay in Navigation-style dispatch.
    pub selection: Option<SelectionKind>,
    pub pending_operator: Option<PendingOperator>,
    pub count: CountBuffer,
    /// Register named by a `"` prefix, consumed by the next operator/paste.
    pub pending_register: Option<char>,
    pub last_character_find: Option<CharacterFind>,
    pub recording: Option<Recording>,
    /// Register most recently played back, for `@@`.
    pub last_played_register: Option<char>,
    /// Ctrl-K was pressed; the next two characters form a digraph.
    pub waiting_for_digraph: bool,
    pub digraph_first: Option<char>,
    /// Mode to return to after one Navigation command (Ctrl-O).
    pub temporary_navigation: Option<Mode>,
    pub block_insert: Option<BlockInsert>,
    pub registers: RegisterFile,
}

impl Default for ModeState {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Navigation,
            selection: None,
            pending_operator: None,
            count: CountBuffer::default(),
            pending_register: None,
            last_character_find: None,
            recording: None,
            last_played_register: None,
            waiting_for_digraph: false,
            digraph_first: None,
            temporary_navigation: None,
            block_insert: None,
            registers: RegisterFile::new(),
        }
    }

    /// Switch modes, upholding the invariant that an armed operator never
    /// survives leaving Navigation.
    pub fn enter_mode(&mut self, mode: Mode) {
        if mode != Mode::Navigation {
            self.pending_operator = None;
        }
        self.mode = mode;
    }

    /// True while an operator waits for its motion.
    pub fn operator_pending(&self) -> bool {
        self.pending_operator.is_some()
    }

    /// Drop everything a half-typed composition may have armed.
    pub fn reset_composition(&mut self) {
        self.pending_operator = None;
        self.count.clear();
        self.pending_register = None;
    }
}
