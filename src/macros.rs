use crate::key::Key;
use crate::registers::{RegisterContents, is_register_id};
use crate::registry::{Context, Pattern, Registry, navigation, record_start, record_stop};
use crate::state::Recording;

/// `q` plus a lowercase/digit register id begins capturing raw keys.
fn start_recording(ctx: &mut Context<'_>) {
    match ctx.last_char() {
        Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() => {
            ctx.state.recording = Some(Recording { register: c, keys: Vec::new() });
        }
        _ => ctx.bell(),
    }
}

/// `q` again commits the captured keys to the register, encoded as text so
/// macros share the register file with yanks.
fn stop_recording(ctx: &mut Context<'_>) {
    if let Some(recording) = ctx.state.recording.take() {
        let mut body = String::new();
        for key in &recording.keys {
            key.encode(&mut body);
        }
        ctx.state
            .registers
            .write(Some(recording.register), RegisterContents::characters(body));
    }
}

/// Queue the register's keys for dispatch; a count queues that many passes.
fn play_register(ctx: &mut Context<'_>, register: char) {
    let count = ctx.take_count_or(1) as usize;
    let Some(keys) = ctx.state.registers.read_keys(Some(register)) else {
        return;
    };
    if keys.is_empty() {
        return;
    }
    ctx.state.last_played_register = Some(register);
    let mut run = Vec::with_capacity(keys.len() * count);
    for _ in 0..count {
        run.extend_from_slice(&keys);
    }
    ctx.inject_keys(&run);
}

fn play(ctx: &mut Context<'_>) {
    match ctx.last_char() {
        Some(c) if is_register_id(c) => play_register(ctx, c),
        _ => ctx.bell(),
    }
}

fn play_last(ctx: &mut Context<'_>) {
    match ctx.state.last_played_register {
        Some(register) => play_register(ctx, register),
        None => ctx.bell(),
    }
}

pub fn install(registry: &mut Registry) {
    registry.add(
        vec![Pattern::Key(Key::Char('q')), Pattern::AnyChar],
        record_start,
        start_recording,
    );
    registry.add(vec![Pattern::Key(Key::Char('q'))], record_stop, stop_recording);
    registry.add(
        vec![Pattern::Key(Key::Char('@')), Pattern::AnyChar],
        navigation,
        play,
    );
    registry.add(Pattern::chars("@@"), navigation, play_last);
}
