/// Read-only view of the host's document.
///
/// All offsets and lengths are counted in Unicode scalar values. The engine
/// does no text inspection of its own beyond composing these queries; word,
/// paragraph, and bracket boundary rules live in the implementation, which
/// keeps the engine agnostic to the host's storage (rope, gap buffer, ...).
///
/// Relative searches return offsets from the cursor. By convention a forward
/// search that finds no further boundary reports the distance to the document
/// end and a backward one the distance to the start; `None` means the cursor
/// already sits at that edge. Line-local searches (`find_char_in_line`)
/// return `None` whenever the target does not occur on the cursor line.
pub trait Document {
    /// Total document length in characters.
    fn len(&self) -> usize;
    /// Current cursor offset, in `0..=len()`.
    fn cursor(&self) -> usize;

    /// Character at `offset`, if in bounds.
    fn char_at(&self, offset: usize) -> Option<char>;
    /// Text of `[from, to)`.
    fn slice(&self, from: usize, to: usize) -> String;

    /// Number of lines; an empty document still has one.
    fn line_count(&self) -> usize;
    /// Line index containing `offset`; offsets past the end map to the last line.
    fn line_of(&self, offset: usize) -> usize;
    /// Offset of the first character of `line`.
    fn line_start(&self, line: usize) -> usize;
    /// Offset of the newline ending `line`, or `len()` on the last line.
    fn line_end(&self, line: usize) -> usize;
    /// Offset of the first non-blank character of `line`, or its end if blank.
    fn first_non_blank(&self, line: usize) -> usize;

    // Word boundary searches, relative to the cursor. `count` repeats the step.
    fn next_word_start(&self, count: usize) -> Option<isize>;
    fn next_word_end(&self, count: usize) -> Option<isize>;
    fn prev_word_start(&self, count: usize) -> Option<isize>;
    // Whitespace-delimited variants (WORD).
    fn next_big_word_start(&self, count: usize) -> Option<isize>;
    fn next_big_word_end(&self, count: usize) -> Option<isize>;
    fn prev_big_word_start(&self, count: usize) -> Option<isize>;

    /// Bounds `[start, end)` of the word containing `offset`, if it sits on one.
    fn word_bounds_at(&self, offset: usize) -> Option<(usize, usize)>;
    /// Bounds of the whitespace-delimited WORD containing `offset`.
    fn big_word_bounds_at(&self, offset: usize) -> Option<(usize, usize)>;

    // Paragraph boundary searches.
    fn next_paragraph_start(&self, count: usize) -> Option<isize>;
    fn prev_paragraph_start(&self, count: usize) -> Option<isize>;
    /// First and last line of the paragraph containing `offset`.
    fn paragraph_bounds_at(&self, offset: usize) -> (usize, usize);

    /// Partner of the first bracket at or after the cursor on its line.
    fn matching_bracket(&self) -> Option<usize>;
    /// Innermost `open`/`close` pair around `offset` (either bracket offset
    /// may equal `offset`).
    fn enclosing_brackets(&self, offset: usize, open: char, close: char)
    -> Option<(usize, usize)>;

    /// Distance to the `count`-th occurrence of `ch` on the cursor line,
    /// searching the given direction and excluding the cursor position.
    fn find_char_in_line(&self, ch: char, forward: bool, count: usize) -> Option<isize>;

    /// First and last line currently visible in the host's viewport.
    fn visible_lines(&self) -> (usize, usize);

    /// Clamp `offset` onto the last character of its line, the Navigation
    /// column rule. Offsets on an empty line stay at the line start.
    fn clamp_to_line(&self, offset: usize) -> usize {
        let offset = offset.min(self.len());
        let line = self.line_of(offset);
        let start = self.line_start(line);
        let end = self.line_end(line);
        if offset >= end && end > start { end - 1 } else { offset }
    }
}

/// Mutating operations the engine applies to the host's buffer.
///
/// Implementations decide how edits group for undo; the engine never calls
/// `undo`/`redo` except for the explicit keys bound to them.
pub trait Buffer: Document {
    /// Move the cursor. Out-of-range offsets are the implementation's to clamp.
    fn set_cursor(&mut self, offset: usize);
    /// Insert `text` at `offset`. With `overwrite`, existing characters up to
    /// the end of the line are replaced instead of shifted.
    fn insert(&mut self, offset: usize, text: &str, overwrite: bool);
    /// Remove `[from, to)` and return the removed text.
    fn delete(&mut self, from: usize, to: usize) -> String;
    /// Open an empty line below `line`, returning the new line's start offset.
    fn insert_line_below(&mut self, line: usize) -> usize;
    /// Open an empty line above `line`, returning the new line's start offset.
    fn insert_line_above(&mut self, line: usize) -> usize;
    /// Join `count` following lines onto `line`, one `separator` per seam.
    fn join_lines(&mut self, line: usize, count: usize, separator: &str);
    /// Replace `[from, to)` with `f` applied to its text.
    fn transform(&mut self, from: usize, to: usize, f: &dyn Fn(&str) -> String);
    /// Shift `line_count` lines starting at `first_line` right (`levels > 0`)
    /// or left by that many indent steps.
    fn indent(&mut self, first_line: usize, line_count: usize, levels: isize);
    /// Undo the last edit group. Returns false when there is nothing to undo.
    fn undo(&mut self) -> bool;
    /// Redo the last undone edit group.
    fn redo(&mut self) -> bool;
    /// Start a selection anchored at `anchor`.
    fn begin_selection(&mut self, anchor: usize);
    /// Drop any active selection anchor.
    fn clear_selection(&mut self);
    /// The active selection anchor, if any.
    fn selection_anchor(&self) -> Option<usize>;
    /// Mutating commands become silent no-ops while this reports true.
    fn read_only(&self) -> bool {
        false
    }
}

/// External clipboard integration.
pub trait Clipboard {
    fn get(&mut self) -> Option<String>;
    fn set(&mut self, text: String);
}

/// Two-symbol digraph table, queried for Ctrl-K composition in insert-style
/// modes.
pub trait Digraphs {
    /// The character the symbol pair composes to, if the table knows it.
    fn resolve(&self, first: char, second: char) -> Option<char>;
}

/// The empty digraph table; every lookup fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDigraphs;

impl Digraphs for NoDigraphs {
    fn resolve(&self, _first: char, _second: char) -> Option<char> {
        None
    }
}
