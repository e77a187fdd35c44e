use crate::key::Key;
use crate::registry::{
    Context, Pattern, Registry, block_selection, digraph_pending, in_navigation, insert,
    insert_multiple, insert_or_replace, navigation, replace, replace_single, selectable,
};
use crate::state::BlockInsert;
use crate::types::{Mode, SelectionKind};

fn enter_insert(ctx: &mut Context<'_>) {
    ctx.state.count.clear();
    if ctx.buffer.read_only() {
        return;
    }
    ctx.state.enter_mode(Mode::Insert);
}

fn enter_insert_first_non_blank(ctx: &mut Context<'_>) {
    ctx.state.count.clear();
    if ctx.buffer.read_only() {
        return;
    }
    let target = {
        let doc = ctx.doc();
        doc.first_non_blank(doc.line_of(doc.cursor()))
    };
    ctx.buffer.set_cursor(target);
    ctx.state.enter_mode(Mode::Insert);
}

fn enter_insert_after(ctx: &mut Context<'_>) {
    ctx.state.count.clear();
    if ctx.buffer.read_only() {
        return;
    }
    let target = {
        let doc = ctx.doc();
        (doc.cursor() + 1).min(doc.line_end(doc.line_of(doc.cursor())))
    };
    ctx.buffer.set_cursor(target);
    ctx.state.enter_mode(Mode::Insert);
}

fn enter_insert_line_end(ctx: &mut Context<'_>) {
    ctx.state.count.clear();
    if ctx.buffer.read_only() {
        return;
    }
    let target = {
        let doc = ctx.doc();
        doc.line_end(doc.line_of(doc.cursor()))
    };
    ctx.buffer.set_cursor(target);
    ctx.state.enter_mode(Mode::Insert);
}

fn open_below(ctx: &mut Context<'_>) {
    ctx.state.count.clear();
    if ctx.buffer.read_only() {
        return;
    }
    let line = {
        let doc = ctx.doc();
        doc.line_of(doc.cursor())
    };
    let at = ctx.buffer.insert_line_below(line);
    ctx.buffer.set_cursor(at);
    ctx.state.enter_mode(Mode::Insert);
}

fn open_above(ctx: &mut Context<'_>) {
    ctx.state.count.clear();
    if ctx.buffer.read_only() {
        return;
    }
    let line = {
        let doc = ctx.doc();
        doc.line_of(doc.cursor())
    };
    let at = ctx.buffer.insert_line_above(line);
    ctx.buffer.set_cursor(at);
    ctx.state.enter_mode(Mode::Insert);
}

fn enter_replace(ctx: &mut Context<'_>) {
    ctx.state.count.clear();
    if ctx.buffer.read_only() {
        return;
    }
    ctx.state.enter_mode(Mode::Replace);
}

/// `r` keeps the accumulated count so 3rx can overwrite a run.
fn enter_replace_single(ctx: &mut Context<'_>) {
    if ctx.buffer.read_only() {
        return;
    }
    ctx.state.enter_mode(Mode::ReplaceSingle);
}

/// v/V/Ctrl-V: same kind toggles off, another kind rebinds the shape while
/// the anchor stays put.
fn toggle_selection(ctx: &mut Context<'_>, kind: SelectionKind) {
    ctx.state.count.clear();
    match ctx.state.selection {
        Some(current) if current == kind => {
            ctx.state.selection = None;
            ctx.buffer.clear_selection();
        }
        Some(_) => ctx.state.selection = Some(kind),
        None => {
            let anchor = ctx.doc().cursor();
            ctx.buffer.begin_selection(anchor);
            ctx.state.selection = Some(kind);
        }
    }
}

/// Escape in Navigation throws away any half-typed composition.
fn escape_navigation(ctx: &mut Context<'_>) {
    ctx.state.reset_composition();
    ctx.state.temporary_navigation = None;
    if ctx.state.selection.take().is_some() {
        ctx.buffer.clear_selection();
    }
}

/// Escape out of Insert/Replace: cursor steps left, stopping at column 0.
fn escape_to_navigation(ctx: &mut Context<'_>) {
    let target = {
        let doc = ctx.doc();
        let cursor = doc.cursor();
        let start = doc.line_start(doc.line_of(cursor));
        cursor.saturating_sub(1).max(start)
    };
    ctx.buffer.set_cursor(target);
    ctx.state.enter_mode(Mode::Navigation);
    ctx.state.temporary_navigation = None;
}

fn cancel_replace_single(ctx: &mut Context<'_>) {
    ctx.state.count.clear();
    ctx.state.enter_mode(Mode::Navigation);
}

fn insert_char(ctx: &mut Context<'_>) {
    let Some(c) = ctx.last_char() else {
        return;
    };
    let at = ctx.doc().cursor();
    ctx.buffer.insert(at, &c.to_string(), false);
    ctx.buffer.set_cursor(at + 1);
}

fn replace_char(ctx: &mut Context<'_>) {
    let Some(c) = ctx.last_char() else {
        return;
    };
    let at = ctx.doc().cursor();
    ctx.buffer.insert(at, &c.to_string(), true);
    ctx.buffer.set_cursor(at + 1);
}

/// The single overwrite `r` was waiting for. A count replaces a run and
/// fails whole when the line is too short.
fn replace_single_char(ctx: &mut Context<'_>) {
    let count = ctx.take_count_or(1) as usize;
    let Some(c) = ctx.last_char() else {
        return;
    };
    let fits = {
        let doc = ctx.doc();
        let cursor = doc.cursor();
        cursor + count <= doc.line_end(doc.line_of(cursor))
    };
    if !fits {
        ctx.bell();
        ctx.state.enter_mode(Mode::Navigation);
        return;
    }
    let text: String = (0..count).map(|_| c).collect();
    let at = ctx.doc().cursor();
    ctx.buffer.insert(at, &text, true);
    ctx.buffer.set_cursor(at + count - 1);
    ctx.state.enter_mode(Mode::Navigation);
}

fn insert_newline(ctx: &mut Context<'_>) {
    let at = ctx.doc().cursor();
    ctx.buffer.insert(at, "\n", false);
    ctx.buffer.set_cursor(at + 1);
}

fn insert_backspace(ctx: &mut Context<'_>) {
    let at = ctx.doc().cursor();
    if at == 0 {
        return;
    }
    ctx.buffer.delete(at - 1, at);
    ctx.buffer.set_cursor(at - 1);
}

/// Replace-mode backspace steps back without restoring anything.
fn replace_backspace(ctx: &mut Context<'_>) {
    let (at, start) = {
        let doc = ctx.doc();
        let at = doc.cursor();
        (at, doc.line_start(doc.line_of(at)))
    };
    if at > start {
        ctx.buffer.set_cursor(at - 1);
    }
}

fn begin_digraph(ctx: &mut Context<'_>) {
    ctx.state.waiting_for_digraph = true;
    ctx.state.digraph_first = None;
}

fn cancel_digraph(ctx: &mut Context<'_>) {
    ctx.state.waiting_for_digraph = false;
    ctx.state.digraph_first = None;
}

/// Two symbol keys after Ctrl-K. An unknown pair bells and is abandoned.
fn digraph_char(ctx: &mut Context<'_>) {
    let Some(c) = ctx.last_char() else {
        return;
    };
    match ctx.state.digraph_first {
        None => ctx.state.digraph_first = Some(c),
        Some(first) => {
            ctx.state.waiting_for_digraph = false;
            ctx.state.digraph_first = None;
            match ctx.digraph(first, c) {
                Some(composed) => {
                    let overwrite = ctx.state.mode == Mode::Replace;
                    let at = ctx.doc().cursor();
                    ctx.buffer.insert(at, &composed.to_string(), overwrite);
                    ctx.buffer.set_cursor(at + 1);
                }
                None => ctx.bell(),
            }
        }
    }
}

/// Ctrl-O: one Navigation command, then back to the insert-style mode.
fn enter_temporary_navigation(ctx: &mut Context<'_>) {
    ctx.state.temporary_navigation = Some(ctx.state.mode);
    ctx.state.enter_mode(Mode::Navigation);
}

/// I/A on a block selection: insert on the first line now, replay on the
/// rest at commit.
fn block_insert_start(ctx: &mut Context<'_>, append: bool) {
    ctx.state.count.clear();
    if ctx.buffer.read_only() {
        return;
    }
    let Some(anchor) = ctx.buffer.selection_anchor() else {
        return;
    };
    let (first_line, last_line, column, at) = {
        let doc = ctx.doc();
        let cursor = doc.cursor();
        let (a_line, c_line) = (doc.line_of(anchor), doc.line_of(cursor));
        let (first, last) = (a_line.min(c_line), a_line.max(c_line));
        let a_col = anchor - doc.line_start(a_line);
        let c_col = cursor - doc.line_start(c_line);
        let column = if append {
            a_col.max(c_col) + 1
        } else {
            a_col.min(c_col)
        };
        let start = doc.line_start(first);
        let len = doc.line_end(first) - start;
        (first, last, column, start + column.min(len))
    };
    ctx.state.selection = None;
    ctx.buffer.clear_selection();
    ctx.buffer.set_cursor(at);
    ctx.state.block_insert = Some(BlockInsert {
        first_line,
        last_line,
        column,
        text: String::new(),
    });
    ctx.state.enter_mode(Mode::InsertMultiple);
}

fn insert_multiple_char(ctx: &mut Context<'_>) {
    let Some(c) = ctx.last_char() else {
        return;
    };
    let at = ctx.doc().cursor();
    ctx.buffer.insert(at, &c.to_string(), false);
    ctx.buffer.set_cursor(at + 1);
    if let Some(block) = ctx.state.block_insert.as_mut() {
        block.text.push(c);
    }
}

/// Backspace during block insert only retracts text typed since entry.
fn insert_multiple_backspace(ctx: &mut Context<'_>) {
    let typed = ctx
        .state
        .block_insert
        .as_ref()
        .is_some_and(|b| !b.text.is_empty());
    if !typed {
        ctx.bell();
        return;
    }
    if let Some(block) = ctx.state.block_insert.as_mut() {
        block.text.pop();
    }
    let at = ctx.doc().cursor();
    if at > 0 {
        ctx.buffer.delete(at - 1, at);
        ctx.buffer.set_cursor(at - 1);
    }
}

/// Escape from block insert: replay the typed text on every other spanned
/// line, clipping the column to short lines.
fn commit_block_insert(ctx: &mut Context<'_>) {
    if let Some(block) = ctx.state.block_insert.take() {
        if !block.text.is_empty() && !ctx.buffer.read_only() {
            for line in (block.first_line + 1..=block.last_line).rev() {
                let at = {
                    let doc = ctx.doc();
                    if line >= doc.line_count() {
                        continue;
                    }
                    let start = doc.line_start(line);
                    let len = doc.line_end(line) - start;
                    start + block.column.min(len)
                };
                ctx.buffer.insert(at, &block.text, false);
            }
        }
    }
    escape_to_navigation(ctx);
}

/// Install mode switches, insert-family input, and the Escape bindings.
pub fn install(registry: &mut Registry) {
    registry.add(Pattern::chars("i"), navigation, enter_insert);
    registry.add(Pattern::chars("I"), navigation, enter_insert_first_non_blank);
    registry.add(Pattern::chars("a"), navigation, enter_insert_after);
    registry.add(Pattern::chars("A"), navigation, enter_insert_line_end);
    registry.add(Pattern::chars("o"), navigation, open_below);
    registry.add(Pattern::chars("O"), navigation, open_above);
    registry.add(Pattern::chars("R"), navigation, enter_replace);
    registry.add(Pattern::chars("r"), navigation, enter_replace_single);

    registry.add(Pattern::chars("v"), selectable, |ctx| {
        toggle_selection(ctx, SelectionKind::Characters)
    });
    registry.add(Pattern::chars("V"), selectable, |ctx| {
        toggle_selection(ctx, SelectionKind::Lines)
    });
    registry.add(vec![Pattern::Key(Key::Ctrl('v'))], selectable, |ctx| {
        toggle_selection(ctx, SelectionKind::Block)
    });

    registry.add(Pattern::chars("I"), block_selection, |ctx| {
        block_insert_start(ctx, false)
    });
    registry.add(Pattern::chars("A"), block_selection, |ctx| {
        block_insert_start(ctx, true)
    });

    registry.add(vec![Pattern::Key(Key::Esc)], in_navigation, escape_navigation);
    registry.add(vec![Pattern::Key(Key::Esc)], insert_or_replace, escape_to_navigation);
    registry.add(vec![Pattern::Key(Key::Esc)], insert_multiple, commit_block_insert);
    registry.add(vec![Pattern::Key(Key::Esc)], replace_single, cancel_replace_single);
    registry.add(vec![Pattern::Key(Key::Esc)], digraph_pending, cancel_digraph);

    registry.add(vec![Pattern::AnyChar], insert, insert_char);
    registry.add(vec![Pattern::AnyChar], replace, replace_char);
    registry.add(vec![Pattern::AnyChar], replace_single, replace_single_char);
    registry.add(vec![Pattern::AnyChar], insert_multiple, insert_multiple_char);
    registry.add(vec![Pattern::AnyChar], digraph_pending, digraph_char);

    registry.add(vec![Pattern::Key(Key::Enter)], insert_or_replace, insert_newline);
    registry.add(vec![Pattern::Key(Key::Enter)], insert_multiple, |ctx| ctx.bell());
    registry.add(vec![Pattern::Key(Key::Backspace)], insert, insert_backspace);
    registry.add(vec![Pattern::Key(Key::Backspace)], replace, replace_backspace);
    registry.add(
        vec![Pattern::Key(Key::Backspace)],
        insert_multiple,
        insert_multiple_backspace,
    );

    registry.add(vec![Pattern::Key(Key::Ctrl('k'))], insert_or_replace, begin_digraph);
    registry.add(
        vec![Pattern::Key(Key::Ctrl('o'))],
        insert_or_replace,
        enter_temporary_navigation,
    );
}
