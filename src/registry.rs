use std::collections::VecDeque;

use crate::key::Key;
use crate::object::TextObject;
use crate::state::ModeState;
use crate::traits::{Buffer, Digraphs, Document};
use crate::types::Mode;

/// One step of a binding's key pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Match exactly this key.
    Key(Key),
    /// Match any plain character key.
    AnyChar,
}

impl Pattern {
    pub fn matches(self, key: Key) -> bool {
        match self {
            Pattern::Key(k) => k == key,
            Pattern::AnyChar => matches!(key, Key::Char(_)),
        }
    }

    /// Pattern sequence matching the characters of `s` one key each.
    pub fn chars(s: &str) -> Vec<Pattern> {
        s.chars().map(|c| Pattern::Key(Key::Char(c))).collect()
    }
}

/// Mode predicate deciding whether a binding currently participates in
/// matching. Plain functions so the binding table stays inspectable.
pub type Condition = fn(&ModeState) -> bool;

/// A motion or structural text-object resolver.
///
/// Receives the effective count (`None` when the user typed none) and
/// returns the range it stands for, or `None` when the matched keys name no
/// valid target (a wildcard captured something unknown) - the caller then
/// bells without consuming composition state. Failed-but-valid motions
/// return a zero-offset object instead.
pub type Motion = fn(&mut Context<'_>, Option<u32>) -> Option<TextObject>;

/// An operator: mutates the buffer (and registers, and possibly the mode)
/// over the range a motion resolved.
pub type Operator = fn(&mut Context<'_>, TextObject);

/// Handler invoked when a binding fires.
pub type Action = Box<dyn Fn(&mut Context<'_>)>;

/// Everything a handler may touch while it runs.
pub struct Context<'a> {
    pub state: &'a mut ModeState,
    pub buffer: &'a mut dyn Buffer,
    /// The keys that matched the fired binding's pattern.
    pub keys: &'a [Key],
    digraphs: &'a dyn Digraphs,
    injected: &'a mut VecDeque<Key>,
    bell: &'a mut bool,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        state: &'a mut ModeState,
        buffer: &'a mut dyn Buffer,
        keys: &'a [Key],
        digraphs: &'a dyn Digraphs,
        injected: &'a mut VecDeque<Key>,
        bell: &'a mut bool,
    ) -> Self {
        Self { state, buffer, keys, digraphs, injected, bell }
    }

    /// The buffer, read-only.
    pub fn doc(&self) -> &dyn Document {
        &*self.buffer
    }

    /// The accumulated count, consuming it.
    pub fn take_count(&mut self) -> Option<u32> {
        self.state.count.take()
    }

    /// The accumulated count or `default`, consuming it. Never zero.
    pub fn take_count_or(&mut self, default: u32) -> u32 {
        self.state.count.take().unwrap_or(default).max(1)
    }

    /// Last key of the matched sequence as a plain character, for bindings
    /// ending in a wildcard.
    pub fn last_char(&self) -> Option<char> {
        match self.keys.last() {
            Some(Key::Char(c)) => Some(*c),
            _ => None,
        }
    }

    /// Signal invalid input to the host.
    pub fn bell(&mut self) {
        *self.bell = true;
    }

    /// Queue keys for dispatch after the current one completes, as if typed.
    /// They land ahead of anything already queued, so nested playback runs
    /// depth-first. Replayed keys are never re-recorded.
    pub fn inject_keys(&mut self, keys: &[Key]) {
        for key in keys.iter().rev() {
            self.injected.push_front(*key);
        }
    }

    /// Digraph table lookup.
    pub fn digraph(&self, first: char, second: char) -> Option<char> {
        self.digraphs.resolve(first, second)
    }
}

struct Binding {
    pattern: Vec<Pattern>,
    condition: Condition,
    action: Action,
}

impl Binding {
    fn wildcards(&self) -> usize {
        self.pattern
            .iter()
            .filter(|p| matches!(p, Pattern::AnyChar))
            .count()
    }
}

/// The key-dispatch table.
///
/// Bindings pair a [`Pattern`] sequence with a [`Condition`]; the engine
/// feeds buffered keys through the lookup methods to decide whether to fire
/// a handler, wait for more input, or flush a prefix.
#[derive(Default)]
pub struct Registry {
    bindings: Vec<Binding>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `action` under `pattern`, active while `condition` holds.
    pub fn add(
        &mut self,
        pattern: Vec<Pattern>,
        condition: Condition,
        action: impl Fn(&mut Context<'_>) + 'static,
    ) {
        self.bindings.push(Binding { pattern, condition, action: Box::new(action) });
    }

    /// The active binding exactly matching `keys`, if any. Among several,
    /// the fewest wildcards win, ties going to the most recently added.
    pub fn match_exact(&self, keys: &[Key], state: &ModeState) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (idx, b) in self.bindings.iter().enumerate() {
            if b.pattern.len() == keys.len()
                && (b.condition)(state)
                && b.pattern.iter().zip(keys).all(|(p, k)| p.matches(*k))
            {
                let wild = b.wildcards();
                if best.is_none_or(|(w, _)| wild <= w) {
                    best = Some((wild, idx));
                }
            }
        }
        best.map(|(_, idx)| idx)
    }

    /// True when some active binding could still match with more keys.
    pub fn has_extension(&self, keys: &[Key], state: &ModeState) -> bool {
        self.bindings.iter().any(|b| {
            b.pattern.len() > keys.len()
                && (b.condition)(state)
                && b.pattern.iter().zip(keys).all(|(p, k)| p.matches(*k))
        })
    }

    /// Longest proper prefix of `keys` with an exact active match.
    pub fn longest_prefix(&self, keys: &[Key], state: &ModeState) -> Option<(usize, usize)> {
        for len in (1..keys.len()).rev() {
            if let Some(idx) = self.match_exact(&keys[..len], state) {
                return Some((len, idx));
            }
        }
        None
    }

    pub(crate) fn action(&self, idx: usize) -> &Action {
        &self.bindings[idx].action
    }
}

// Mode predicates for binding conditions. Bindings name the situations they
// are live in through these rather than ad-hoc checks inside handlers.

/// Bare Navigation: no selection, no armed operator.
pub fn navigation(s: &ModeState) -> bool {
    s.mode == Mode::Navigation && s.selection.is_none() && s.pending_operator.is_none()
}

/// Navigation with an operator armed and waiting for its motion.
pub fn operator_pending(s: &ModeState) -> bool {
    s.mode == Mode::Navigation && s.selection.is_none() && s.pending_operator.is_some()
}

/// A selection of any shape is active.
pub fn selection_active(s: &ModeState) -> bool {
    s.mode == Mode::Navigation && s.selection.is_some()
}

/// A block selection is active.
pub fn block_selection(s: &ModeState) -> bool {
    s.mode == Mode::Navigation && s.selection == Some(crate::types::SelectionKind::Block)
}

/// Anywhere count digits may accumulate: Navigation in any composition state.
pub fn counting(s: &ModeState) -> bool {
    s.mode == Mode::Navigation
}

/// Navigation or selection, nothing armed: where `v`/`V`/Ctrl-V and the
/// register-select prefix make sense.
pub fn selectable(s: &ModeState) -> bool {
    s.mode == Mode::Navigation && s.pending_operator.is_none()
}

pub fn in_navigation(s: &ModeState) -> bool {
    s.mode == Mode::Navigation
}

/// Insert mode, outside a digraph.
pub fn insert(s: &ModeState) -> bool {
    s.mode == Mode::Insert && !s.waiting_for_digraph
}

/// Replace mode, outside a digraph.
pub fn replace(s: &ModeState) -> bool {
    s.mode == Mode::Replace && !s.waiting_for_digraph
}

pub fn insert_or_replace(s: &ModeState) -> bool {
    insert(s) || replace(s)
}

pub fn replace_single(s: &ModeState) -> bool {
    s.mode == Mode::ReplaceSingle
}

pub fn insert_multiple(s: &ModeState) -> bool {
    s.mode == Mode::InsertMultiple
}

/// Ctrl-K has been pressed; digraph symbols are expected.
pub fn digraph_pending(s: &ModeState) -> bool {
    (s.mode == Mode::Insert || s.mode == Mode::Replace) && s.waiting_for_digraph
}

/// Bare Navigation with no recording under way (`q` starts one).
pub fn record_start(s: &ModeState) -> bool {
    navigation(s) && s.recording.is_none()
}

/// Bare Navigation while recording (`q` stops it).
pub fn record_stop(s: &ModeState) -> bool {
    navigation(s) && s.recording.is_some()
}
