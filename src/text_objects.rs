use crate::key::Key;
use crate::motions::resolve_pending;
use crate::object::{TextObject, TextObjectKind};
use crate::registry::{Context, Motion, Pattern, Registry, operator_pending, selection_active};
use crate::traits::Document;

/// Install a structural text object under `keys`: operator resolution and
/// selection reshaping. Text objects never act as bare cursor motions.
pub fn register_text_object(registry: &mut Registry, keys: &[Pattern], object: Motion) {
    registry.add(keys.to_vec(), operator_pending, move |ctx| {
        resolve_pending(ctx, object)
    });
    registry.add(keys.to_vec(), selection_active, move |ctx| {
        reshape_selection(ctx, object)
    });
}

/// Snap the active selection to the object's bounds (viw and friends).
fn reshape_selection(ctx: &mut Context<'_>, object: Motion) {
    let eff = ctx.state.count.peek();
    match object(ctx, eff) {
        Some(obj) => {
            ctx.state.count.take();
            if obj.is_zero() {
                return;
            }
            let (from, to) = obj.operator_range(ctx.doc());
            if to <= from {
                return;
            }
            ctx.buffer.begin_selection(from);
            ctx.buffer.set_cursor(to - 1);
        }
        None => ctx.bell(),
    }
}

fn span(cursor: usize, from: usize, to: usize) -> TextObject {
    TextObject::new(
        TextObjectKind::Exclusive,
        from as isize - cursor as isize,
        to as isize - cursor as isize,
    )
}

fn is_blank_char(c: Option<char>) -> bool {
    matches!(c, Some(' ') | Some('\t'))
}

/// Bounds of the whitespace run at `offset`, not crossing line ends.
fn whitespace_run(doc: &dyn Document, offset: usize) -> Option<(usize, usize)> {
    if !is_blank_char(doc.char_at(offset)) {
        return None;
    }
    let mut from = offset;
    while from > 0 && is_blank_char(doc.char_at(from - 1)) {
        from -= 1;
    }
    let mut to = offset + 1;
    while is_blank_char(doc.char_at(to)) {
        to += 1;
    }
    Some((from, to))
}

fn word_object(ctx: &Context<'_>, big: bool, around: bool) -> TextObject {
    let doc = ctx.doc();
    let cursor = doc.cursor();
    let bounds = if big {
        doc.big_word_bounds_at(cursor)
    } else {
        doc.word_bounds_at(cursor)
    };
    let (mut from, mut to, on_word) = match bounds {
        Some((f, t)) => (f, t, true),
        None => match whitespace_run(doc, cursor) {
            Some((f, t)) => (f, t, false),
            None => return TextObject::exclusive(0),
        },
    };
    if around {
        if on_word {
            // trailing whitespace joins the word; leading only as fallback
            let mut ext = to;
            while is_blank_char(doc.char_at(ext)) {
                ext += 1;
            }
            if ext > to {
                to = ext;
            } else {
                while from > 0 && is_blank_char(doc.char_at(from - 1)) {
                    from -= 1;
                }
            }
        } else {
            // started in whitespace: take the following word too
            let more = if big {
                doc.big_word_bounds_at(to)
            } else {
                doc.word_bounds_at(to)
            };
            if let Some((_, t)) = more {
                to = t;
            }
        }
    }
    span(cursor, from, to)
}

fn quote_object(ctx: &Context<'_>, quote: char, around: bool) -> TextObject {
    let doc = ctx.doc();
    let cursor = doc.cursor();
    let line = doc.line_of(cursor);
    let start = doc.line_start(line);
    let text: Vec<char> = doc.slice(start, doc.line_end(line)).chars().collect();
    let col = cursor - start;
    let marks: Vec<usize> = text
        .iter()
        .enumerate()
        .filter(|&(_, &c)| c == quote)
        .map(|(i, _)| i)
        .collect();
    // quotes pair up left to right; take the first pair not already behind us
    let mut pick = None;
    let mut i = 0;
    while i + 1 < marks.len() {
        let (a, b) = (marks[i], marks[i + 1]);
        if b >= col {
            pick = Some((a, b));
            break;
        }
        i += 2;
    }
    let Some((a, b)) = pick else {
        return TextObject::exclusive(0);
    };
    let (mut from, mut to) = if around {
        (start + a, start + b + 1)
    } else {
        (start + a + 1, start + b)
    };
    if around {
        let mut ext = to;
        while is_blank_char(doc.char_at(ext)) {
            ext += 1;
        }
        if ext > to {
            to = ext;
        } else {
            while from > start && is_blank_char(doc.char_at(from - 1)) {
                from -= 1;
            }
        }
    }
    span(cursor, from, to)
}

fn bracket_object(ctx: &Context<'_>, open: char, close: char, around: bool) -> TextObject {
    let doc = ctx.doc();
    let cursor = doc.cursor();
    match doc.enclosing_brackets(cursor, open, close) {
        Some((a, b)) => {
            if around {
                span(cursor, a, b + 1)
            } else {
                span(cursor, a + 1, b)
            }
        }
        None => TextObject::exclusive(0),
    }
}

fn line_blank(doc: &dyn Document, line: usize) -> bool {
    doc.first_non_blank(line) == doc.line_end(line)
}

fn paragraph_object(ctx: &Context<'_>, around: bool) -> TextObject {
    let doc = ctx.doc();
    let cursor = doc.cursor();
    let (mut first, mut last) = doc.paragraph_bounds_at(cursor);
    if around {
        let mut ext = last;
        while ext + 1 < doc.line_count() && line_blank(doc, ext + 1) {
            ext += 1;
        }
        if ext > last {
            last = ext;
        } else {
            while first > 0 && line_blank(doc, first - 1) {
                first -= 1;
            }
        }
    }
    TextObject::new(
        TextObjectKind::Linewise,
        doc.line_start(first) as isize - cursor as isize,
        doc.line_end(last) as isize - cursor as isize,
    )
}

/// Dispatch over the character following `i`.
fn object_inner(ctx: &mut Context<'_>, _count: Option<u32>) -> Option<TextObject> {
    match ctx.last_char()? {
        'w' => Some(word_object(ctx, false, false)),
        'W' => Some(word_object(ctx, true, false)),
        q @ ('"' | '\'' | '`') => Some(quote_object(ctx, q, false)),
        '(' | ')' | 'b' => Some(bracket_object(ctx, '(', ')', false)),
        '{' | '}' | 'B' => Some(bracket_object(ctx, '{', '}', false)),
        '[' | ']' => Some(bracket_object(ctx, '[', ']', false)),
        '<' | '>' => Some(bracket_object(ctx, '<', '>', false)),
        'p' => Some(paragraph_object(ctx, false)),
        _ => None,
    }
}

/// Dispatch over the character following `a`.
fn object_around(ctx: &mut Context<'_>, _count: Option<u32>) -> Option<TextObject> {
    match ctx.last_char()? {
        'w' => Some(word_object(ctx, false, true)),
        'W' => Some(word_object(ctx, true, true)),
        q @ ('"' | '\'' | '`') => Some(quote_object(ctx, q, true)),
        '(' | ')' | 'b' => Some(bracket_object(ctx, '(', ')', true)),
        '{' | '}' | 'B' => Some(bracket_object(ctx, '{', '}', true)),
        '[' | ']' => Some(bracket_object(ctx, '[', ']', true)),
        '<' | '>' => Some(bracket_object(ctx, '<', '>', true)),
        'p' => Some(paragraph_object(ctx, true)),
        _ => None,
    }
}

/// Install the `i`/`a` structural object families.
pub fn install(registry: &mut Registry) {
    let prefixed = |c| vec![Pattern::Key(Key::Char(c)), Pattern::AnyChar];
    register_text_object(registry, &prefixed('i'), object_inner);
    register_text_object(registry, &prefixed('a'), object_around);
}
