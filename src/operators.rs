use crate::key::Key;
use crate::object::{TextObject, TextObjectKind};
use crate::registers::{RegisterContents, is_register_id};
use crate::registry::{
    Context, Operator, Pattern, Registry, navigation, selectable, selection_active,
};
use crate::state::PendingOperator;
use crate::traits::Document;
use crate::types::{Mode, SelectionKind};

/// Install an operator under `keys` in its two roles: arming from bare
/// Navigation (the motion that follows picks the range) and immediate
/// application over an active selection.
pub fn register_operator(registry: &mut Registry, keys: &[Pattern], op: Operator) {
    registry.add(keys.to_vec(), navigation, move |ctx| {
        ctx.state.pending_operator = Some(PendingOperator { apply: op, count: ctx.take_count() });
    });
    registry.add(keys.to_vec(), selection_active, move |ctx| {
        apply_to_selection(ctx, op)
    });
}

/// The selection's bounds as a cursor-relative object, shaped by the
/// selection kind. Both endpoints are covered, whichever side the anchor is
/// on.
fn selection_object(ctx: &Context<'_>) -> Option<TextObject> {
    let kind = ctx.state.selection?;
    let anchor = ctx.buffer.selection_anchor()?;
    let delta = anchor as isize - ctx.doc().cursor() as isize;
    let object_kind = match kind {
        SelectionKind::Characters => TextObjectKind::Inclusive,
        SelectionKind::Lines => TextObjectKind::Linewise,
        SelectionKind::Block => TextObjectKind::Block,
    };
    Some(TextObject::new(object_kind, delta, 0))
}

/// Drop the selection and run `op` over the range it covered.
pub(crate) fn apply_to_selection(ctx: &mut Context<'_>, op: Operator) {
    let Some(object) = selection_object(ctx) else {
        return;
    };
    ctx.state.count.clear();
    ctx.state.selection = None;
    ctx.buffer.clear_selection();
    op(ctx, object);
}

pub(crate) fn delete_operator(ctx: &mut Context<'_>, object: TextObject) {
    let register = ctx.state.pending_register.take();
    if ctx.buffer.read_only() {
        return;
    }
    // landing offsets reference the text before the cut
    let landing = {
        let doc = ctx.doc();
        match object.kind {
            TextObjectKind::Block => {
                object.block_segments(doc).first().map_or(doc.cursor(), |s| s.0)
            }
            TextObjectKind::Linewise => doc.line_start(object.line_range(doc).0),
            _ => object.operator_range(doc).0,
        }
    };
    let payload = object.cut(ctx.buffer);
    if payload.is_empty() {
        return;
    }
    let linewise = payload.kind == SelectionKind::Lines;
    ctx.state.registers.write(register, payload);
    let target = {
        let doc = ctx.doc();
        let at = landing.min(doc.len());
        if linewise {
            doc.first_non_blank(doc.line_of(at))
        } else {
            doc.clamp_to_line(at)
        }
    };
    ctx.buffer.set_cursor(target);
}

pub(crate) fn yank_operator(ctx: &mut Context<'_>, object: TextObject) {
    let register = ctx.state.pending_register.take();
    let payload = object.read(ctx.doc());
    if payload.is_empty() {
        return;
    }
    let kind = payload.kind;
    ctx.state.registers.write(register, payload);
    // a backwards character yank pulls the cursor to the range start
    if kind == SelectionKind::Characters {
        let doc = ctx.doc();
        let target = doc.cursor().min(object.operator_range(doc).0);
        ctx.buffer.set_cursor(target);
    }
}

pub(crate) fn change_operator(ctx: &mut Context<'_>, object: TextObject) {
    let register = ctx.state.pending_register.take();
    if ctx.buffer.read_only() {
        return;
    }
    match object.kind {
        TextObjectKind::Linewise => {
            // remove the line contents but keep one empty line to type into
            let (from, to) = {
                let doc = ctx.doc();
                let (first, last) = object.line_range(doc);
                (doc.line_start(first), doc.line_end(last))
            };
            let removed = ctx.buffer.delete(from, to);
            if !removed.is_empty() {
                ctx.state.registers.write(register, RegisterContents::lines(removed));
            }
            ctx.buffer.set_cursor(from);
        }
        _ => {
            let from = object.operator_range(ctx.doc()).0;
            let payload = object.cut(ctx.buffer);
            if !payload.is_empty() {
                ctx.state.registers.write(register, payload);
            }
            let target = from.min(ctx.doc().len());
            ctx.buffer.set_cursor(target);
        }
    }
    ctx.state.enter_mode(Mode::Insert);
}

fn shift_lines(ctx: &mut Context<'_>, object: TextObject, levels: isize) {
    ctx.state.pending_register = None;
    if ctx.buffer.read_only() {
        return;
    }
    let (first, last) = object.line_range(ctx.doc());
    ctx.buffer.indent(first, last - first + 1, levels);
    let target = ctx.doc().first_non_blank(first);
    ctx.buffer.set_cursor(target);
}

pub(crate) fn indent_operator(ctx: &mut Context<'_>, object: TextObject) {
    shift_lines(ctx, object, 1);
}

pub(crate) fn unindent_operator(ctx: &mut Context<'_>, object: TextObject) {
    shift_lines(ctx, object, -1);
}

fn toggle_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_uppercase() {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
    }
    out
}

fn apply_case(ctx: &mut Context<'_>, object: TextObject, f: &dyn Fn(&str) -> String) {
    ctx.state.pending_register = None;
    if ctx.buffer.read_only() {
        return;
    }
    match object.kind {
        TextObjectKind::Block => {
            let segments = object.block_segments(ctx.doc());
            // bottom-up so earlier offsets survive length changes
            for &(from, to) in segments.iter().rev() {
                if to > from {
                    ctx.buffer.transform(from, to, f);
                }
            }
            if let Some(&(from, _)) = segments.first() {
                ctx.buffer.set_cursor(from);
            }
        }
        _ => {
            let (from, to) = object.operator_range(ctx.doc());
            if to <= from {
                return;
            }
            ctx.buffer.transform(from, to, f);
            if object.kind != TextObjectKind::Linewise {
                ctx.buffer.set_cursor(from);
            }
        }
    }
}

pub(crate) fn lowercase_operator(ctx: &mut Context<'_>, object: TextObject) {
    apply_case(ctx, object, &|s: &str| s.to_lowercase());
}

pub(crate) fn uppercase_operator(ctx: &mut Context<'_>, object: TextObject) {
    apply_case(ctx, object, &|s: &str| s.to_uppercase());
}

pub(crate) fn togglecase_operator(ctx: &mut Context<'_>, object: TextObject) {
    apply_case(ctx, object, &toggle_case);
}

/// Linewise object covering the cursor line and `count - 1` lines below,
/// for the doubled-key shortcuts.
fn current_lines(ctx: &mut Context<'_>) -> TextObject {
    let count = ctx.take_count_or(1) as usize;
    let doc = ctx.doc();
    let cursor = doc.cursor();
    let line = doc.line_of(cursor);
    let target = (line + count - 1).min(doc.line_count() - 1);
    TextObject::linewise(doc.line_start(target) as isize - cursor as isize)
}

/// dd and friends: synthesize the current-lines object and run the operator
/// without ever arming it.
fn register_line_shortcut(registry: &mut Registry, keys: &str, op: Operator) {
    registry.add(Pattern::chars(keys), navigation, move |ctx| {
        let object = current_lines(ctx);
        op(ctx, object);
    });
}

fn delete_char_forward(ctx: &mut Context<'_>) {
    let count = ctx.take_count_or(1) as usize;
    let object = {
        let doc = ctx.doc();
        let avail = doc.line_end(doc.line_of(doc.cursor())) - doc.cursor();
        TextObject::exclusive(count.min(avail) as isize)
    };
    delete_operator(ctx, object);
}

fn delete_char_back(ctx: &mut Context<'_>) {
    let count = ctx.take_count_or(1) as usize;
    let object = {
        let doc = ctx.doc();
        let avail = doc.cursor() - doc.line_start(doc.line_of(doc.cursor()));
        TextObject::exclusive(-(count.min(avail) as isize))
    };
    delete_operator(ctx, object);
}

/// Exclusive object from the cursor to the end of the `count`-th line.
fn line_tail_object(ctx: &Context<'_>, count: usize) -> TextObject {
    let doc = ctx.doc();
    let cursor = doc.cursor();
    let line = doc.line_of(cursor);
    let target = (line + count - 1).min(doc.line_count() - 1);
    TextObject::exclusive(doc.line_end(target) as isize - cursor as isize)
}

fn delete_to_line_end(ctx: &mut Context<'_>) {
    let count = ctx.take_count_or(1) as usize;
    let object = line_tail_object(ctx, count);
    delete_operator(ctx, object);
}

fn change_to_line_end(ctx: &mut Context<'_>) {
    let count = ctx.take_count_or(1) as usize;
    let object = line_tail_object(ctx, count);
    change_operator(ctx, object);
}

fn substitute_chars(ctx: &mut Context<'_>) {
    let count = ctx.take_count_or(1) as usize;
    let object = {
        let doc = ctx.doc();
        let avail = doc.line_end(doc.line_of(doc.cursor())) - doc.cursor();
        TextObject::exclusive(count.min(avail) as isize)
    };
    change_operator(ctx, object);
}

fn toggle_char_case(ctx: &mut Context<'_>) {
    let count = ctx.take_count_or(1) as usize;
    if ctx.buffer.read_only() {
        return;
    }
    let (from, to) = {
        let doc = ctx.doc();
        let cursor = doc.cursor();
        let end = doc.line_end(doc.line_of(cursor));
        (cursor, (cursor + count).min(end))
    };
    if to <= from {
        return;
    }
    ctx.buffer.transform(from, to, &toggle_case);
    let target = ctx.doc().clamp_to_line(to);
    ctx.buffer.set_cursor(target);
}

/// Join `joins` following lines onto `line`, cursor landing on the first
/// seam.
fn join_line_range(ctx: &mut Context<'_>, line: usize, joins: usize, separator: &str) {
    let joins = {
        let doc = ctx.doc();
        joins.min(doc.line_count() - 1 - line)
    };
    if joins == 0 || ctx.buffer.read_only() {
        return;
    }
    let seam = ctx.doc().line_end(line);
    ctx.buffer.join_lines(line, joins, separator);
    let target = {
        let doc = ctx.doc();
        doc.clamp_to_line(seam.min(doc.len()))
    };
    ctx.buffer.set_cursor(target);
}

fn join_cmd(ctx: &mut Context<'_>, separator: &str) {
    let count = ctx.take_count_or(1) as usize;
    let line = {
        let doc = ctx.doc();
        doc.line_of(doc.cursor())
    };
    join_line_range(ctx, line, count.max(2) - 1, separator);
}

fn join_selection(ctx: &mut Context<'_>, separator: &str) {
    let Some(object) = selection_object(ctx) else {
        return;
    };
    ctx.state.count.clear();
    ctx.state.selection = None;
    ctx.buffer.clear_selection();
    let (first, last) = object.line_range(ctx.doc());
    join_line_range(ctx, first, (last - first).max(1), separator);
}

fn undo_cmd(ctx: &mut Context<'_>) {
    let count = ctx.take_count_or(1);
    if ctx.buffer.read_only() {
        return;
    }
    for _ in 0..count {
        if !ctx.buffer.undo() {
            ctx.bell();
            break;
        }
    }
}

fn redo_cmd(ctx: &mut Context<'_>) {
    let count = ctx.take_count_or(1);
    if ctx.buffer.read_only() {
        return;
    }
    for _ in 0..count {
        if !ctx.buffer.redo() {
            ctx.bell();
            break;
        }
    }
}

fn paste(ctx: &mut Context<'_>, after: bool) {
    let count = ctx.take_count_or(1) as usize;
    let register = ctx.state.pending_register.take();
    let Some(payload) = ctx.state.registers.read(register) else {
        return;
    };
    if payload.is_empty() || ctx.buffer.read_only() {
        return;
    }
    match payload.kind {
        SelectionKind::Characters => {
            let text = payload.text.repeat(count);
            let at = {
                let doc = ctx.doc();
                let cursor = doc.cursor();
                if after {
                    (cursor + 1).min(doc.line_end(doc.line_of(cursor)))
                } else {
                    cursor
                }
            };
            let placed = text.chars().count();
            ctx.buffer.insert(at, &text, false);
            ctx.buffer.set_cursor(at + placed - 1);
        }
        SelectionKind::Lines => {
            let body = vec![payload.text.as_str(); count].join("\n");
            let (at, text, target_line) = {
                let doc = ctx.doc();
                let line = doc.line_of(doc.cursor());
                if after {
                    let end = doc.line_end(line);
                    if end == doc.len() {
                        // final line has no newline to paste below; grow one
                        (doc.len(), format!("\n{body}"), line + 1)
                    } else {
                        (end + 1, format!("{body}\n"), line + 1)
                    }
                } else {
                    (doc.line_start(line), format!("{body}\n"), line)
                }
            };
            ctx.buffer.insert(at, &text, false);
            let target = ctx.doc().first_non_blank(target_line);
            ctx.buffer.set_cursor(target);
        }
        SelectionKind::Block => {
            let parts: Vec<String> = payload.text.split('\n').map(|p| p.repeat(count)).collect();
            let (line, col, landing) = {
                let doc = ctx.doc();
                let cursor = doc.cursor();
                let line = doc.line_of(cursor);
                let start = doc.line_start(line);
                let col = cursor - start + usize::from(after);
                let len = doc.line_end(line) - start;
                (line, col, start + col.min(len))
            };
            for (row, part) in parts.iter().enumerate() {
                if part.is_empty() {
                    continue;
                }
                let at = {
                    let doc = ctx.doc();
                    let target = line + row;
                    if target >= doc.line_count() {
                        None
                    } else {
                        let start = doc.line_start(target);
                        let len = doc.line_end(target) - start;
                        Some(start + col.min(len))
                    }
                };
                match at {
                    Some(at) => ctx.buffer.insert(at, part, false),
                    None => {
                        // ran out of lines; the block grows the document
                        let end = ctx.doc().len();
                        ctx.buffer.insert(end, &format!("\n{part}"), false);
                    }
                }
            }
            ctx.buffer.set_cursor(landing);
        }
    }
}

fn select_register(ctx: &mut Context<'_>) {
    match ctx.last_char() {
        Some(c) if is_register_id(c) => ctx.state.pending_register = Some(c),
        _ => ctx.bell(),
    }
}

/// Install the operators, their line shortcuts, and the direct editing
/// commands.
pub fn install(registry: &mut Registry) {
    register_operator(registry, &Pattern::chars("d"), delete_operator);
    register_operator(registry, &Pattern::chars("y"), yank_operator);
    register_operator(registry, &Pattern::chars("c"), change_operator);
    register_operator(registry, &Pattern::chars(">"), indent_operator);
    register_operator(registry, &Pattern::chars("<"), unindent_operator);
    register_operator(registry, &Pattern::chars("gu"), lowercase_operator);
    register_operator(registry, &Pattern::chars("gU"), uppercase_operator);
    register_operator(registry, &Pattern::chars("g~"), togglecase_operator);

    register_line_shortcut(registry, "dd", delete_operator);
    register_line_shortcut(registry, "yy", yank_operator);
    register_line_shortcut(registry, "cc", change_operator);
    register_line_shortcut(registry, ">>", indent_operator);
    register_line_shortcut(registry, "<<", unindent_operator);
    register_line_shortcut(registry, "guu", lowercase_operator);
    register_line_shortcut(registry, "gUU", uppercase_operator);
    register_line_shortcut(registry, "g~~", togglecase_operator);

    registry.add(Pattern::chars("x"), navigation, delete_char_forward);
    registry.add(Pattern::chars("x"), selection_active, |ctx| {
        apply_to_selection(ctx, delete_operator)
    });
    registry.add(Pattern::chars("X"), navigation, delete_char_back);
    registry.add(Pattern::chars("D"), navigation, delete_to_line_end);
    registry.add(Pattern::chars("C"), navigation, change_to_line_end);
    registry.add(Pattern::chars("s"), navigation, substitute_chars);
    registry.add(Pattern::chars("S"), navigation, |ctx| {
        let object = current_lines(ctx);
        change_operator(ctx, object);
    });
    registry.add(Pattern::chars("~"), navigation, toggle_char_case);
    registry.add(Pattern::chars("~"), selection_active, |ctx| {
        apply_to_selection(ctx, togglecase_operator)
    });
    registry.add(Pattern::chars("J"), navigation, |ctx| join_cmd(ctx, " "));
    registry.add(Pattern::chars("gJ"), navigation, |ctx| join_cmd(ctx, ""));
    registry.add(Pattern::chars("J"), selection_active, |ctx| join_selection(ctx, " "));
    registry.add(Pattern::chars("gJ"), selection_active, |ctx| join_selection(ctx, ""));
    registry.add(Pattern::chars("u"), navigation, undo_cmd);
    registry.add(vec![Pattern::Key(Key::Ctrl('r'))], navigation, redo_cmd);
    registry.add(Pattern::chars("p"), navigation, |ctx| paste(ctx, true));
    registry.add(Pattern::chars("P"), navigation, |ctx| paste(ctx, false));

    // "x routes the next operator or paste through register x
    registry.add(
        vec![Pattern::Key(Key::Char('"')), Pattern::AnyChar],
        selectable,
        select_register,
    );
}
