use std::collections::VecDeque;
use std::fmt;

use crate::key::{InputEvent, Key};
use crate::registry::{Context, Registry};
use crate::state::ModeState;
use crate::traits::{Buffer, Clipboard, Digraphs, NoDigraphs};
use crate::types::{DispatchResult, Mode, SelectionKind};
use crate::{macros, modes, motions, operators, text_objects};

/// Cap on keys dispatched per host event. Replay can queue more keys than it
/// consumes (a macro playing itself); past this many the queue is abandoned
/// with a bell.
const REPLAY_KEY_LIMIT: usize = 8192;

/// Install every built-in handler family into `registry`.
///
/// [`EngineBuilder::build`] does this automatically; hosts wiring the
/// registry into their own dispatch layer can call it directly, and add
/// their own bindings before or after.
pub fn install(registry: &mut Registry) {
    motions::install(registry);
    text_objects::install(registry);
    operators::install(registry);
    modes::install(registry);
    macros::install(registry);
}

/// The modal editing engine.
///
/// Owns the mode state, the binding registry, and the key buffer; the host
/// owns the text and feeds events through [`Engine::handle_event`].
pub struct Engine {
    state: ModeState,
    registry: Registry,
    /// Keys received but not yet resolved to a binding.
    buffered: Vec<Key>,
    /// Keys queued by macro playback, dispatched after the current key.
    injected: VecDeque<Key>,
    digraphs: Box<dyn Digraphs>,
}

/// Read-only view of the engine for status lines and tests.
#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    pub mode: Mode,
    pub selection: Option<SelectionKind>,
    pub pending_count: Option<u32>,
    pub operator_pending: bool,
    /// Register an in-progress recording will commit to.
    pub recording: Option<char>,
    /// Buffered keys still waiting for a longer binding.
    pub pending_keys: Vec<Key>,
}

pub struct EngineBuilder {
    mode: Mode,
    digraphs: Box<dyn Digraphs>,
    clipboard: Option<Box<dyn Clipboard>>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            mode: Mode::Navigation,
            digraphs: Box::new(NoDigraphs),
            clipboard: None,
        }
    }
}

impl EngineBuilder {
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn digraphs(mut self, digraphs: impl Digraphs + 'static) -> Self {
        self.digraphs = Box::new(digraphs);
        self
    }

    /// Back the `+` register with a host clipboard.
    pub fn clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Some(Box::new(clipboard));
        self
    }

    pub fn build(self) -> Engine {
        let mut state = ModeState::new();
        state.mode = self.mode;
        if let Some(clip) = self.clipboard {
            state.registers.attach_clipboard(clip);
        }
        let mut registry = Registry::new();
        install(&mut registry);
        Engine {
            state,
            registry,
            buffered: Vec::new(),
            injected: VecDeque::new(),
            digraphs: self.digraphs,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        EngineBuilder::default().build()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state)
            .field("buffered", &self.buffered)
            .field("injected", &self.injected)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            mode: self.state.mode,
            selection: self.state.selection,
            pending_count: self.state.count.peek(),
            operator_pending: self.state.operator_pending(),
            recording: self.state.recording.as_ref().map(|r| r.register),
            pending_keys: self.buffered.clone(),
        }
    }

    pub fn registers(&self) -> &crate::registers::RegisterFile {
        &self.state.registers
    }

    pub fn registers_mut(&mut self) -> &mut crate::registers::RegisterFile {
        &mut self.state.registers
    }

    /// The binding registry, for hosts adding their own motions, text
    /// objects, or operators.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Feed one host input event through the dispatch path, then drain any
    /// keys macro playback queued behind it.
    pub fn handle_event(&mut self, buffer: &mut dyn Buffer, input: InputEvent) -> DispatchResult {
        let key = Key::from_input(&input);
        let mut result = self.process(buffer, key, true);
        let mut replayed = 0usize;
        while let Some(next) = self.injected.pop_front() {
            replayed += 1;
            if replayed > REPLAY_KEY_LIMIT {
                self.injected.clear();
                self.state.reset_composition();
                return DispatchResult::Bell;
            }
            let step = self.process(buffer, next, false);
            result = merge(result, step);
        }
        result
    }

    /// Dispatch one key against the buffered sequence.
    ///
    /// Exact match with no longer candidate fires; a possible longer match
    /// waits; a dead end fires the longest matching prefix and reprocesses
    /// the remainder under whatever state that left, or drops the first key
    /// with a bell when nothing matches at all.
    fn process(&mut self, buffer: &mut dyn Buffer, key: Key, live: bool) -> DispatchResult {
        let was_recording = self.state.recording.is_some();
        let temp_before = self.state.temporary_navigation.is_some();
        self.buffered.push(key);

        let mut bell = false;
        let mut fired = false;
        let waiting = loop {
            if self.buffered.is_empty() {
                break false;
            }
            let exact = self.registry.match_exact(&self.buffered, &self.state);
            let extendable = self.registry.has_extension(&self.buffered, &self.state);
            match exact {
                Some(idx) if !extendable => {
                    let keys = std::mem::take(&mut self.buffered);
                    self.fire(buffer, idx, &keys, &mut bell);
                    fired = true;
                }
                Some(_) => break true,
                None if extendable => break true,
                None => match self.registry.longest_prefix(&self.buffered, &self.state) {
                    Some((len, idx)) => {
                        let rest = self.buffered.split_off(len);
                        let keys = std::mem::take(&mut self.buffered);
                        self.fire(buffer, idx, &keys, &mut bell);
                        fired = true;
                        self.buffered = rest;
                    }
                    None => {
                        bell = true;
                        self.buffered.remove(0);
                    }
                },
            }
        };

        // captured only when a recording spans the whole event, which
        // excludes the q that started or stopped it
        if live
            && was_recording
            && let Some(rec) = self.state.recording.as_mut()
        {
            rec.keys.push(key);
        }

        if temp_before {
            if self.state.mode == Mode::Navigation {
                let settled = fired
                    && !bell
                    && !waiting
                    && !self.state.operator_pending()
                    && self.state.count.is_empty()
                    && self.state.pending_register.is_none();
                if settled && let Some(mode) = self.state.temporary_navigation.take() {
                    self.state.enter_mode(mode);
                }
            } else {
                // the one command moved modes on its own; nothing to restore
                self.state.temporary_navigation = None;
            }
        }

        if bell {
            DispatchResult::Bell
        } else if waiting {
            DispatchResult::Pending
        } else {
            DispatchResult::Handled
        }
    }

    fn fire(&mut self, buffer: &mut dyn Buffer, idx: usize, keys: &[Key], bell: &mut bool) {
        let mut ctx = Context::new(
            &mut self.state,
            buffer,
            keys,
            self.digraphs.as_ref(),
            &mut self.injected,
            bell,
        );
        (self.registry.action(idx))(&mut ctx);
    }
}

fn merge(a: DispatchResult, b: DispatchResult) -> DispatchResult {
    use DispatchResult::*;
    match (a, b) {
        (Bell, _) | (_, Bell) => Bell,
        (Pending, _) | (_, Pending) => Pending,
        _ => Handled,
    }
}
