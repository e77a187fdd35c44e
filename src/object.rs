use crate::registers::RegisterContents;
use crate::traits::{Buffer, Document};
use crate::types::SelectionKind;

/// How a [`TextObject`]'s endpoints translate into an editable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextObjectKind {
    /// The end offset is excluded from the range.
    Exclusive,
    /// The character at the end offset is included.
    Inclusive,
    /// The range expands to cover whole lines.
    Linewise,
    /// The endpoints are corners of a rectangular column block.
    Block,
}

impl TextObjectKind {
    /// The selection/register shape ranges of this kind produce.
    pub fn selection_kind(self) -> SelectionKind {
        match self {
            TextObjectKind::Exclusive | TextObjectKind::Inclusive => SelectionKind::Characters,
            TextObjectKind::Linewise => SelectionKind::Lines,
            TextObjectKind::Block => SelectionKind::Block,
        }
    }
}

/// A text range described relative to the cursor.
///
/// Motions and structural text objects resolve to one of these; operators
/// consume them. `start` and `end` are signed character offsets from the
/// cursor and carry no ordering guarantee until [`TextObject::sorted`]. A
/// zero-width object is a valid result meaning "nothing to do".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextObject {
    pub start: isize,
    pub end: isize,
    pub kind: TextObjectKind,
}

impl TextObject {
    pub fn new(kind: TextObjectKind, start: isize, end: isize) -> Self {
        Self { start, end, kind }
    }

    /// Exclusive object from the cursor to `start`.
    pub fn exclusive(start: isize) -> Self {
        Self::new(TextObjectKind::Exclusive, start, 0)
    }

    /// Inclusive object from the cursor to (and including) `start`.
    pub fn inclusive(start: isize) -> Self {
        Self::new(TextObjectKind::Inclusive, start, 0)
    }

    /// Linewise object spanning the cursor line and the line at `start`.
    pub fn linewise(start: isize) -> Self {
        Self::new(TextObjectKind::Linewise, start, 0)
    }

    /// Block object with the cursor and `start` as opposite corners.
    pub fn block(start: isize) -> Self {
        Self::new(TextObjectKind::Block, start, 0)
    }

    /// Endpoint offsets as `(low, high)`.
    pub fn sorted(&self) -> (isize, isize) {
        (self.start.min(self.end), self.start.max(self.end))
    }

    /// True when the object covers no characters at all.
    pub fn is_zero(&self) -> bool {
        self.start == 0 && self.end == 0
    }

    /// Exclusive character endpoints, before any line expansion.
    fn char_span(&self, doc: &dyn Document) -> (usize, usize) {
        let cursor = doc.cursor();
        let (lo, hi) = self.sorted();
        let from = offset_from(cursor, lo, doc.len());
        let to = offset_from(cursor, hi, doc.len());
        match self.kind {
            TextObjectKind::Inclusive => (from, (to + 1).min(doc.len())),
            _ => (from, to),
        }
    }

    /// Absolute `[from, to)` character range this object covers, honoring the
    /// range kind and clamped to the document bounds. For Block the pair
    /// carries the corner offsets; see [`TextObject::block_segments`].
    pub fn operator_range(&self, doc: &dyn Document) -> (usize, usize) {
        let (from, to) = self.char_span(doc);
        match self.kind {
            TextObjectKind::Linewise => {
                let (first, last) = self.line_range(doc);
                (doc.line_start(first), (doc.line_end(last) + 1).min(doc.len()))
            }
            _ => (from, to),
        }
    }

    /// First and last line index the object touches.
    pub fn line_range(&self, doc: &dyn Document) -> (usize, usize) {
        if self.kind == TextObjectKind::Linewise {
            // endpoints are positions, each naming a covered line
            let cursor = doc.cursor();
            let (lo, hi) = self.sorted();
            let from = offset_from(cursor, lo, doc.len());
            let to = offset_from(cursor, hi, doc.len());
            return (doc.line_of(from), doc.line_of(to));
        }
        let (from, to) = self.char_span(doc);
        // `to` sits one past the covered text; step back unless empty
        let last = if to > from { to - 1 } else { from };
        (doc.line_of(from), doc.line_of(last))
    }

    /// Per-line `[from, to)` spans of a Block range, top to bottom. The right
    /// column is included; spans clip to each line's length.
    pub fn block_segments(&self, doc: &dyn Document) -> Vec<(usize, usize)> {
        let (from, to) = self.char_span(doc);
        let first = doc.line_of(from);
        let last = doc.line_of(to);
        let col_a = from - doc.line_start(first);
        let col_b = to - doc.line_start(last);
        let (lo, hi) = (col_a.min(col_b), col_a.max(col_b));
        (first..=last)
            .map(|line| {
                let start = doc.line_start(line);
                let len = doc.line_end(line) - start;
                (start + lo.min(len), start + (hi + 1).min(len))
            })
            .collect()
    }

    /// The covered text as register contents, without mutating anything.
    pub fn read(&self, doc: &dyn Document) -> RegisterContents {
        match self.kind {
            TextObjectKind::Block => {
                let parts: Vec<String> = self
                    .block_segments(doc)
                    .iter()
                    .map(|&(from, to)| doc.slice(from, to))
                    .collect();
                RegisterContents::block(parts.join("\n"))
            }
            TextObjectKind::Linewise => {
                let (from, to) = self.operator_range(doc);
                let mut text = doc.slice(from, to);
                if text.ends_with('\n') {
                    text.pop();
                }
                RegisterContents::lines(text)
            }
            _ => {
                let (from, to) = self.operator_range(doc);
                RegisterContents::characters(doc.slice(from, to))
            }
        }
    }

    /// Remove the covered range from `buffer` and return it as register
    /// contents. A zero-width range removes nothing and returns empty
    /// contents.
    pub fn cut(&self, buffer: &mut dyn Buffer) -> RegisterContents {
        match self.kind {
            TextObjectKind::Block => {
                let segments = self.block_segments(&*buffer);
                // delete bottom-up so earlier offsets stay valid
                let mut parts: Vec<String> = segments
                    .iter()
                    .rev()
                    .map(|&(from, to)| buffer.delete(from, to))
                    .collect();
                parts.reverse();
                RegisterContents::block(parts.join("\n"))
            }
            TextObjectKind::Linewise => {
                let (mut from, to) = self.operator_range(&*buffer);
                // removing through the end takes the preceding newline with it
                if to == buffer.len() && from > 0 {
                    from -= 1;
                }
                let mut removed = buffer.delete(from, to);
                if removed.ends_with('\n') {
                    removed.pop();
                } else if removed.starts_with('\n') {
                    removed.remove(0);
                }
                RegisterContents::lines(removed)
            }
            _ => {
                let (from, to) = self.operator_range(&*buffer);
                RegisterContents::characters(buffer.delete(from, to))
            }
        }
    }
}

fn offset_from(cursor: usize, delta: isize, len: usize) -> usize {
    cursor.saturating_add_signed(delta).min(len)
}
