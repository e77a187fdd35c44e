use crate::key::Key;
use crate::object::TextObject;
use crate::registry::{
    Context, Motion, Pattern, Registry, counting, navigation, operator_pending, selection_active,
};
use crate::state::CharacterFind;
use crate::traits::Document;

/// Multiplicative count composition: operator count times motion count, each
/// defaulting to 1; absent stays absent when neither side typed one.
pub(crate) fn combine_counts(a: Option<u32>, b: Option<u32>) -> Option<u32> {
    match (a, b) {
        (None, None) => None,
        _ => Some(a.unwrap_or(1).saturating_mul(b.unwrap_or(1)).max(1)),
    }
}

/// Resolve the armed operator over `motion`'s range, then clear it. An
/// invalid trailing key (wildcard captured something unknown) bells and
/// leaves the composition armed.
pub(crate) fn resolve_pending(ctx: &mut Context<'_>, motion: Motion) {
    let Some(pending) = ctx.state.pending_operator else {
        return;
    };
    let eff = combine_counts(pending.count, ctx.state.count.peek());
    match motion(ctx, eff) {
        Some(object) => {
            ctx.state.count.take();
            ctx.state.pending_operator = None;
            (pending.apply)(ctx, object);
        }
        None => ctx.bell(),
    }
}

/// Move the cursor to the motion's target, clamped onto its line. Also the
/// selection-extension behavior: the anchor lives in the buffer, so moving
/// the cursor is the extension.
pub(crate) fn apply_move(ctx: &mut Context<'_>, motion: Motion) {
    let count = ctx.take_count();
    match motion(ctx, count) {
        Some(object) => {
            let doc = ctx.doc();
            let target = doc.cursor().saturating_add_signed(object.start).min(doc.len());
            let target = doc.clamp_to_line(target);
            ctx.buffer.set_cursor(target);
        }
        None => ctx.bell(),
    }
}

/// Install a simple motion under `keys` in its three roles: resolving a
/// pending operator, bare cursor movement, and selection extension.
pub fn register_motion(registry: &mut Registry, keys: &[Pattern], motion: Motion) {
    registry.add(keys.to_vec(), operator_pending, move |ctx| {
        resolve_pending(ctx, motion)
    });
    registry.add(keys.to_vec(), navigation, move |ctx| apply_move(ctx, motion));
    registry.add(keys.to_vec(), selection_active, move |ctx| apply_move(ctx, motion));
}

fn exclusive_or_zero(delta: Option<isize>) -> TextObject {
    TextObject::exclusive(delta.unwrap_or(0))
}

fn inclusive_or_zero(delta: Option<isize>) -> TextObject {
    match delta {
        Some(d) if d != 0 => TextObject::inclusive(d),
        _ => TextObject::exclusive(0),
    }
}

fn count_of(count: Option<u32>) -> usize {
    count.unwrap_or(1).max(1) as usize
}

fn motion_left(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    let doc = ctx.doc();
    let cursor = doc.cursor();
    let avail = cursor - doc.line_start(doc.line_of(cursor));
    Some(TextObject::exclusive(-(count_of(count).min(avail) as isize)))
}

fn motion_right(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    let doc = ctx.doc();
    let cursor = doc.cursor();
    let avail = doc.line_end(doc.line_of(cursor)).saturating_sub(cursor);
    Some(TextObject::exclusive(count_of(count).min(avail) as isize))
}

/// Offset from `cursor` to the same column on `target` line, clamped to that
/// line's last character.
fn line_col_offset(doc: &dyn Document, cursor: usize, target: usize) -> isize {
    let col = cursor - doc.line_start(doc.line_of(cursor));
    let start = doc.line_start(target);
    let len = doc.line_end(target) - start;
    let dest = start + col.min(len.saturating_sub(1));
    dest as isize - cursor as isize
}

fn motion_down(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    let doc = ctx.doc();
    let cursor = doc.cursor();
    let line = doc.line_of(cursor);
    let target = (line + count_of(count)).min(doc.line_count() - 1);
    if target == line {
        return Some(TextObject::exclusive(0));
    }
    Some(TextObject::linewise(line_col_offset(doc, cursor, target)))
}

fn motion_up(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    let doc = ctx.doc();
    let cursor = doc.cursor();
    let line = doc.line_of(cursor);
    let target = line.saturating_sub(count_of(count));
    if target == line {
        return Some(TextObject::exclusive(0));
    }
    Some(TextObject::linewise(line_col_offset(doc, cursor, target)))
}

fn motion_word_forward(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    Some(exclusive_or_zero(ctx.doc().next_word_start(count_of(count))))
}

fn motion_word_back(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    Some(exclusive_or_zero(ctx.doc().prev_word_start(count_of(count))))
}

fn motion_word_end(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    Some(inclusive_or_zero(ctx.doc().next_word_end(count_of(count))))
}

fn motion_big_word_forward(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    Some(exclusive_or_zero(ctx.doc().next_big_word_start(count_of(count))))
}

fn motion_big_word_back(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    Some(exclusive_or_zero(ctx.doc().prev_big_word_start(count_of(count))))
}

fn motion_big_word_end(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    Some(inclusive_or_zero(ctx.doc().next_big_word_end(count_of(count))))
}

pub(crate) fn motion_line_start(ctx: &mut Context<'_>, _count: Option<u32>) -> Option<TextObject> {
    let doc = ctx.doc();
    let cursor = doc.cursor();
    let start = doc.line_start(doc.line_of(cursor));
    Some(TextObject::exclusive(start as isize - cursor as isize))
}

fn motion_line_end(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    let doc = ctx.doc();
    let cursor = doc.cursor();
    let line = doc.line_of(cursor);
    let target = (line + count_of(count) - 1).min(doc.line_count() - 1);
    Some(TextObject::exclusive(doc.line_end(target) as isize - cursor as isize))
}

fn motion_first_non_blank(ctx: &mut Context<'_>, _count: Option<u32>) -> Option<TextObject> {
    let doc = ctx.doc();
    let cursor = doc.cursor();
    let dest = doc.first_non_blank(doc.line_of(cursor));
    Some(TextObject::exclusive(dest as isize - cursor as isize))
}

/// Linewise jump landing on `line`'s first non-blank character.
fn goto_line_object(doc: &dyn Document, line: usize) -> TextObject {
    TextObject::linewise(doc.first_non_blank(line) as isize - doc.cursor() as isize)
}

fn motion_goto_first_line(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    let doc = ctx.doc();
    let line = match count {
        Some(n) if n > 0 => (n as usize - 1).min(doc.line_count() - 1),
        _ => 0,
    };
    Some(goto_line_object(doc, line))
}

fn motion_goto_last_line(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    let doc = ctx.doc();
    let line = match count {
        Some(n) if n > 0 => (n as usize - 1).min(doc.line_count() - 1),
        _ => doc.line_count() - 1,
    };
    Some(goto_line_object(doc, line))
}

fn motion_paragraph_forward(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    Some(exclusive_or_zero(ctx.doc().next_paragraph_start(count_of(count))))
}

fn motion_paragraph_back(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    Some(exclusive_or_zero(ctx.doc().prev_paragraph_start(count_of(count))))
}

fn motion_match_bracket(ctx: &mut Context<'_>, _count: Option<u32>) -> Option<TextObject> {
    let doc = ctx.doc();
    Some(match doc.matching_bracket() {
        Some(target) if target != doc.cursor() => {
            TextObject::inclusive(target as isize - doc.cursor() as isize)
        }
        _ => TextObject::exclusive(0),
    })
}

fn motion_screen_top(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    let doc = ctx.doc();
    let (top, bottom) = doc.visible_lines();
    let line = (top + count_of(count) - 1).min(bottom).min(doc.line_count() - 1);
    Some(goto_line_object(doc, line))
}

fn motion_screen_middle(ctx: &mut Context<'_>, _count: Option<u32>) -> Option<TextObject> {
    let doc = ctx.doc();
    let (top, bottom) = doc.visible_lines();
    let line = (top + (bottom - top) / 2).min(doc.line_count() - 1);
    Some(goto_line_object(doc, line))
}

fn motion_screen_bottom(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    let doc = ctx.doc();
    let (top, bottom) = doc.visible_lines();
    let line = bottom
        .saturating_sub(count_of(count) - 1)
        .max(top)
        .min(doc.line_count() - 1);
    Some(goto_line_object(doc, line))
}

/// Shared by f/F/t/T and their `;`/`,` replays.
fn resolve_find(ctx: &Context<'_>, find: CharacterFind, count: usize) -> TextObject {
    let doc = ctx.doc();
    match doc.find_char_in_line(find.ch, find.forward, count) {
        None => TextObject::exclusive(0),
        Some(delta) if find.forward => {
            let target = if find.before { delta - 1 } else { delta };
            if target <= 0 {
                TextObject::exclusive(0)
            } else {
                TextObject::inclusive(target)
            }
        }
        Some(delta) => {
            let target = if find.before { delta + 1 } else { delta };
            if target >= 0 {
                TextObject::exclusive(0)
            } else {
                TextObject::exclusive(target)
            }
        }
    }
}

fn char_find(ctx: &mut Context<'_>, count: Option<u32>, forward: bool, before: bool)
-> Option<TextObject> {
    let ch = ctx.last_char()?;
    let find = CharacterFind { ch, forward, before };
    // recorded even when the search fails, so `;` can retry it
    ctx.state.last_character_find = Some(find);
    Some(resolve_find(ctx, find, count_of(count)))
}

fn motion_find_forward(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    char_find(ctx, count, true, false)
}

fn motion_find_back(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    char_find(ctx, count, false, false)
}

fn motion_till_forward(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    char_find(ctx, count, true, true)
}

fn motion_till_back(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    char_find(ctx, count, false, true)
}

fn motion_repeat_find(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    match ctx.state.last_character_find {
        Some(find) => Some(resolve_find(ctx, find, count_of(count))),
        None => Some(TextObject::exclusive(0)),
    }
}

fn motion_repeat_find_reversed(ctx: &mut Context<'_>, count: Option<u32>) -> Option<TextObject> {
    match ctx.state.last_character_find {
        Some(find) => Some(resolve_find(ctx, find.reversed(), count_of(count))),
        None => Some(TextObject::exclusive(0)),
    }
}

/// Install every simple motion plus the count-digit handlers.
pub fn install(registry: &mut Registry) {
    register_motion(registry, &Pattern::chars("h"), motion_left);
    register_motion(registry, &Pattern::chars("l"), motion_right);
    register_motion(registry, &Pattern::chars("j"), motion_down);
    register_motion(registry, &Pattern::chars("k"), motion_up);
    register_motion(registry, &Pattern::chars("w"), motion_word_forward);
    register_motion(registry, &Pattern::chars("b"), motion_word_back);
    register_motion(registry, &Pattern::chars("e"), motion_word_end);
    register_motion(registry, &Pattern::chars("W"), motion_big_word_forward);
    register_motion(registry, &Pattern::chars("B"), motion_big_word_back);
    register_motion(registry, &Pattern::chars("E"), motion_big_word_end);
    register_motion(registry, &Pattern::chars("$"), motion_line_end);
    register_motion(registry, &Pattern::chars("^"), motion_first_non_blank);
    register_motion(registry, &Pattern::chars("gg"), motion_goto_first_line);
    register_motion(registry, &Pattern::chars("G"), motion_goto_last_line);
    register_motion(registry, &Pattern::chars("{"), motion_paragraph_back);
    register_motion(registry, &Pattern::chars("}"), motion_paragraph_forward);
    register_motion(registry, &Pattern::chars("%"), motion_match_bracket);
    register_motion(registry, &Pattern::chars("H"), motion_screen_top);
    register_motion(registry, &Pattern::chars("M"), motion_screen_middle);
    register_motion(registry, &Pattern::chars("L"), motion_screen_bottom);
    register_motion(registry, &Pattern::chars(";"), motion_repeat_find);
    register_motion(registry, &Pattern::chars(","), motion_repeat_find_reversed);

    let find = |c| vec![Pattern::Key(Key::Char(c)), Pattern::AnyChar];
    register_motion(registry, &find('f'), motion_find_forward);
    register_motion(registry, &find('F'), motion_find_back);
    register_motion(registry, &find('t'), motion_till_forward);
    register_motion(registry, &find('T'), motion_till_back);

    // Count digits accumulate anywhere in Navigation composition.
    for d in 1..=9u32 {
        let ch = (b'0' + d as u8) as char;
        registry.add(vec![Pattern::Key(Key::Char(ch))], counting, move |ctx| {
            ctx.state.count.push_digit(d)
        });
    }
    // Leading zero is the line-start motion; otherwise it extends the count.
    registry.add(vec![Pattern::Key(Key::Char('0'))], counting, |ctx| {
        if ctx.state.count.in_progress() {
            ctx.state.count.push_digit(0);
        } else if ctx.state.operator_pending() {
            resolve_pending(ctx, motion_line_start);
        } else {
            apply_move(ctx, motion_line_start);
        }
    });
}
