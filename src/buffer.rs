//! A ready-made [`Buffer`] over a plain `String`.
//!
//! Hosts with real text storage (ropes, piece tables) implement the traits
//! themselves; `StringBuffer` exists so the engine is usable out of the box
//! and serves as the reference for what each query is expected to return.
//! Every operation rescans the text, so it is only suitable for small
//! documents.

use unicode_segmentation::UnicodeSegmentation;

use crate::traits::{Buffer, Document};

const INDENT: &str = "    ";

/// String-backed document with cursor, selection anchor, and snapshot undo.
///
/// Word boundaries follow `unicode-segmentation`'s UAX #29 rules; WORD
/// boundaries are maximal non-whitespace runs. Blank lines (empty or
/// whitespace-only) delimit paragraphs.
#[derive(Debug, Clone, Default)]
pub struct StringBuffer {
    text: String,
    len: usize,
    cursor: usize,
    anchor: Option<usize>,
    undo_stack: Vec<(String, usize)>,
    redo_stack: Vec<(String, usize)>,
    viewport: Option<(usize, usize)>,
    read_only: bool,
}

impl StringBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self {
            text,
            len,
            ..Self::default()
        }
    }

    /// The buffer's full text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Restrict `visible_lines` to a window, for the `H`/`M`/`L` keys.
    pub fn set_viewport(&mut self, first: usize, last: usize) {
        self.viewport = Some((first, last));
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    fn byte_of(&self, offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(offset)
            .map_or(self.text.len(), |(byte, _)| byte)
    }

    /// Replace `[from, to)` (char offsets) and return the removed text.
    fn splice(&mut self, from: usize, to: usize, replacement: &str) -> String {
        let from_byte = self.byte_of(from);
        let to_byte = self.byte_of(to);
        let removed = self.text[from_byte..to_byte].to_string();
        self.text.replace_range(from_byte..to_byte, replacement);
        self.len = self.len - (to - from) + replacement.chars().count();
        removed
    }

    fn remember(&mut self) {
        self.undo_stack.push((self.text.clone(), self.cursor));
        self.redo_stack.clear();
    }

    /// UAX #29 word spans as `[start, end)` char offsets, whitespace skipped.
    fn word_spans(&self) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        let mut at = 0;
        for piece in self.text.split_word_bounds() {
            let chars = piece.chars().count();
            if !piece.chars().all(char::is_whitespace) {
                spans.push((at, at + chars));
            }
            at += chars;
        }
        spans
    }

    /// Word spans with adjacent runs merged, so punctuation sticks to its
    /// neighbors the way WORD motions expect.
    fn big_word_spans(&self) -> Vec<(usize, usize)> {
        let mut spans: Vec<(usize, usize)> = Vec::new();
        for span in self.word_spans() {
            match spans.last_mut() {
                Some(last) if last.1 == span.0 => last.1 = span.1,
                _ => spans.push(span),
            }
        }
        spans
    }

    fn forward_to_starts(&self, spans: &[(usize, usize)], count: usize) -> Option<isize> {
        if self.cursor >= self.len {
            return None;
        }
        let mut at = self.cursor;
        let mut target = self.len;
        for _ in 0..count {
            match spans.iter().find(|span| span.0 > at) {
                Some(span) => {
                    at = span.0;
                    target = span.0;
                }
                None => {
                    target = self.len;
                    break;
                }
            }
        }
        Some(target as isize - self.cursor as isize)
    }

    fn forward_to_ends(&self, spans: &[(usize, usize)], count: usize) -> Option<isize> {
        let mut at = self.cursor;
        let mut moved = false;
        for _ in 0..count {
            match spans.iter().find(|span| span.1 - 1 > at) {
                Some(span) => {
                    at = span.1 - 1;
                    moved = true;
                }
                None => break,
            }
        }
        moved.then(|| at as isize - self.cursor as isize)
    }

    fn back_to_starts(&self, spans: &[(usize, usize)], count: usize) -> Option<isize> {
        if self.cursor == 0 {
            return None;
        }
        let mut at = self.cursor;
        let mut target = 0;
        for _ in 0..count {
            match spans.iter().rev().find(|span| span.0 < at) {
                Some(span) => {
                    at = span.0;
                    target = span.0;
                }
                None => {
                    target = 0;
                    break;
                }
            }
        }
        Some(target as isize - self.cursor as isize)
    }

    fn line_is_blank(&self, line: usize) -> bool {
        self.first_non_blank(line) == self.line_end(line)
    }

    /// Line index of the next paragraph boundary below `line`, if any.
    fn paragraph_line_below(&self, line: usize) -> Option<usize> {
        let lines = self.line_count();
        let mut at = line;
        while at < lines && self.line_is_blank(at) {
            at += 1;
        }
        while at < lines && !self.line_is_blank(at) {
            at += 1;
        }
        (at < lines).then_some(at)
    }

    /// Line index of the previous paragraph boundary above `line`, if any.
    fn paragraph_line_above(&self, line: usize) -> Option<usize> {
        let mut at = line;
        while at > 0 && self.line_is_blank(at) {
            at -= 1;
        }
        while at > 0 && !self.line_is_blank(at) {
            at -= 1;
        }
        (self.line_is_blank(at) && at < line).then_some(at)
    }
}

const BRACKET_PAIRS: [(char, char); 3] = [('(', ')'), ('[', ']'), ('{', '}')];

impl Document for StringBuffer {
    fn len(&self) -> usize {
        self.len
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        if offset >= self.len {
            return None;
        }
        self.text[self.byte_of(offset)..].chars().next()
    }

    fn slice(&self, from: usize, to: usize) -> String {
        let to = to.min(self.len);
        let from = from.min(to);
        self.text[self.byte_of(from)..self.byte_of(to)].to_string()
    }

    fn line_count(&self) -> usize {
        self.text.chars().filter(|&c| c == '\n').count() + 1
    }

    fn line_of(&self, offset: usize) -> usize {
        let offset = offset.min(self.len);
        self.text[..self.byte_of(offset)]
            .chars()
            .filter(|&c| c == '\n')
            .count()
    }

    fn line_start(&self, line: usize) -> usize {
        if line == 0 {
            return 0;
        }
        let mut seen = 0;
        for (at, c) in self.text.chars().enumerate() {
            if c == '\n' {
                seen += 1;
                if seen == line {
                    return at + 1;
                }
            }
        }
        self.len
    }

    fn line_end(&self, line: usize) -> usize {
        let start = self.line_start(line);
        let mut at = start;
        for c in self.text[self.byte_of(start)..].chars() {
            if c == '\n' {
                return at;
            }
            at += 1;
        }
        at
    }

    fn first_non_blank(&self, line: usize) -> usize {
        let end = self.line_end(line);
        let mut at = self.line_start(line);
        while at < end {
            match self.char_at(at) {
                Some(' ') | Some('\t') => at += 1,
                _ => break,
            }
        }
        at
    }

    fn next_word_start(&self, count: usize) -> Option<isize> {
        self.forward_to_starts(&self.word_spans(), count)
    }

    fn next_word_end(&self, count: usize) -> Option<isize> {
        self.forward_to_ends(&self.word_spans(), count)
    }

    fn prev_word_start(&self, count: usize) -> Option<isize> {
        self.back_to_starts(&self.word_spans(), count)
    }

    fn next_big_word_start(&self, count: usize) -> Option<isize> {
        self.forward_to_starts(&self.big_word_spans(), count)
    }

    fn next_big_word_end(&self, count: usize) -> Option<isize> {
        self.forward_to_ends(&self.big_word_spans(), count)
    }

    fn prev_big_word_start(&self, count: usize) -> Option<isize> {
        self.back_to_starts(&self.big_word_spans(), count)
    }

    fn word_bounds_at(&self, offset: usize) -> Option<(usize, usize)> {
        self.word_spans()
            .into_iter()
            .find(|&(start, end)| start <= offset && offset < end)
    }

    fn big_word_bounds_at(&self, offset: usize) -> Option<(usize, usize)> {
        self.big_word_spans()
            .into_iter()
            .find(|&(start, end)| start <= offset && offset < end)
    }

    fn next_paragraph_start(&self, count: usize) -> Option<isize> {
        if self.cursor >= self.len {
            return None;
        }
        let mut line = self.line_of(self.cursor);
        let mut target = self.len;
        for _ in 0..count {
            match self.paragraph_line_below(line) {
                Some(below) => {
                    line = below;
                    target = self.line_start(below);
                }
                None => {
                    target = self.len;
                    break;
                }
            }
        }
        Some(target as isize - self.cursor as isize)
    }

    fn prev_paragraph_start(&self, count: usize) -> Option<isize> {
        if self.cursor == 0 {
            return None;
        }
        let mut line = self.line_of(self.cursor);
        let mut target = 0;
        for _ in 0..count {
            match self.paragraph_line_above(line) {
                Some(above) => {
                    line = above;
                    target = self.line_start(above);
                }
                None => {
                    target = 0;
                    break;
                }
            }
        }
        Some(target as isize - self.cursor as isize)
    }

    fn paragraph_bounds_at(&self, offset: usize) -> (usize, usize) {
        let line = self.line_of(offset);
        let blank = self.line_is_blank(line);
        let mut first = line;
        while first > 0 && self.line_is_blank(first - 1) == blank {
            first -= 1;
        }
        let mut last = line;
        while last + 1 < self.line_count() && self.line_is_blank(last + 1) == blank {
            last += 1;
        }
        (first, last)
    }

    fn matching_bracket(&self) -> Option<usize> {
        let end = self.line_end(self.line_of(self.cursor));
        let mut at = self.cursor;
        let (open, close, seed, forward) = loop {
            if at >= end {
                return None;
            }
            let c = self.char_at(at)?;
            if let Some(&(open, close)) = BRACKET_PAIRS.iter().find(|&&(o, _)| o == c) {
                break (open, close, at, true);
            }
            if let Some(&(open, close)) = BRACKET_PAIRS.iter().find(|&&(_, cl)| cl == c) {
                break (open, close, at, false);
            }
            at += 1;
        };
        let mut depth = 0usize;
        if forward {
            for offset in seed..self.len {
                match self.char_at(offset) {
                    Some(c) if c == open => depth += 1,
                    Some(c) if c == close => {
                        depth -= 1;
                        if depth == 0 {
                            return Some(offset);
                        }
                    }
                    _ => {}
                }
            }
        } else {
            for offset in (0..=seed).rev() {
                match self.char_at(offset) {
                    Some(c) if c == close => depth += 1,
                    Some(c) if c == open => {
                        depth -= 1;
                        if depth == 0 {
                            return Some(offset);
                        }
                    }
                    _ => {}
                }
            }
        }
        None
    }

    fn enclosing_brackets(&self, offset: usize, open: char, close: char) -> Option<(usize, usize)> {
        if self.len == 0 {
            return None;
        }
        let at = offset.min(self.len - 1);
        let mut depth = 0usize;
        let mut start = None;
        for scan in (0..=at).rev() {
            match self.char_at(scan) {
                // A closer under the cursor belongs to the pair we want, so
                // it does not count as nesting.
                Some(c) if c == close && scan != at => depth += 1,
                Some(c) if c == open => {
                    if depth == 0 {
                        start = Some(scan);
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
        let start = start?;
        let mut depth = 0usize;
        for scan in start..self.len {
            match self.char_at(scan) {
                Some(c) if c == open => depth += 1,
                Some(c) if c == close => {
                    depth -= 1;
                    if depth == 0 {
                        return Some((start, scan));
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn find_char_in_line(&self, ch: char, forward: bool, count: usize) -> Option<isize> {
        let line = self.line_of(self.cursor);
        let start = self.line_start(line);
        let end = self.line_end(line);
        let mut remaining = count;
        if forward {
            for at in self.cursor + 1..end {
                if self.char_at(at) == Some(ch) {
                    remaining -= 1;
                    if remaining == 0 {
                        return Some(at as isize - self.cursor as isize);
                    }
                }
            }
        } else {
            for at in (start..self.cursor.min(end)).rev() {
                if self.char_at(at) == Some(ch) {
                    remaining -= 1;
                    if remaining == 0 {
                        return Some(at as isize - self.cursor as isize);
                    }
                }
            }
        }
        None
    }

    fn visible_lines(&self) -> (usize, usize) {
        let last_line = self.line_count() - 1;
        match self.viewport {
            Some((first, last)) => (first.min(last_line), last.min(last_line)),
            None => (0, last_line),
        }
    }
}

impl Buffer for StringBuffer {
    fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.len);
    }

    fn insert(&mut self, offset: usize, text: &str, overwrite: bool) {
        self.remember();
        let offset = offset.min(self.len);
        let replaced = if overwrite {
            let end = self.line_end(self.line_of(offset));
            offset + text.chars().count().min(end - offset)
        } else {
            offset
        };
        self.splice(offset, replaced, text);
    }

    fn delete(&mut self, from: usize, to: usize) -> String {
        let to = to.min(self.len);
        let from = from.min(to);
        if from == to {
            return String::new();
        }
        self.remember();
        self.splice(from, to, "")
    }

    fn insert_line_below(&mut self, line: usize) -> usize {
        self.remember();
        let end = self.line_end(line);
        let at = if end == self.len { end } else { end + 1 };
        self.splice(at, at, "\n");
        end + 1
    }

    fn insert_line_above(&mut self, line: usize) -> usize {
        self.remember();
        let start = self.line_start(line);
        self.splice(start, start, "\n");
        start
    }

    fn join_lines(&mut self, line: usize, count: usize, separator: &str) {
        self.remember();
        for _ in 0..count {
            let seam = self.line_end(line);
            if seam >= self.len {
                break;
            }
            // Swallow the newline plus the next line's leading blanks.
            let mut stop = seam + 1;
            while let Some(' ') | Some('\t') = self.char_at(stop) {
                stop += 1;
            }
            self.splice(seam, stop, separator);
        }
    }

    fn transform(&mut self, from: usize, to: usize, f: &dyn Fn(&str) -> String) {
        let to = to.min(self.len);
        let from = from.min(to);
        if from == to {
            return;
        }
        self.remember();
        let replacement = f(&self.slice(from, to));
        self.splice(from, to, &replacement);
    }

    fn indent(&mut self, first_line: usize, line_count: usize, levels: isize) {
        if levels == 0 || line_count == 0 {
            return;
        }
        self.remember();
        for line in first_line..first_line + line_count {
            if line >= self.line_count() {
                break;
            }
            if levels > 0 {
                let start = self.line_start(line);
                if self.line_end(line) > start {
                    let pad = INDENT.repeat(levels as usize);
                    self.splice(start, start, &pad);
                }
            } else {
                for _ in 0..-levels {
                    let start = self.line_start(line);
                    let end = self.line_end(line);
                    if self.char_at(start) == Some('\t') {
                        self.splice(start, start + 1, "");
                        continue;
                    }
                    let mut stop = start;
                    while stop < end && stop - start < INDENT.len() && self.char_at(stop) == Some(' ')
                    {
                        stop += 1;
                    }
                    if stop == start {
                        break;
                    }
                    self.splice(start, stop, "");
                }
            }
        }
    }

    fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some((text, cursor)) => {
                self.redo_stack.push((std::mem::take(&mut self.text), self.cursor));
                self.len = text.chars().count();
                self.text = text;
                self.cursor = cursor;
                true
            }
            None => false,
        }
    }

    fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some((text, cursor)) => {
                self.undo_stack.push((std::mem::take(&mut self.text), self.cursor));
                self.len = text.chars().count();
                self.text = text;
                self.cursor = cursor;
                true
            }
            None => false,
        }
    }

    fn begin_selection(&mut self, anchor: usize) {
        self.anchor = Some(anchor.min(self.len));
    }

    fn clear_selection(&mut self) {
        self.anchor = None;
    }

    fn selection_anchor(&self) -> Option<usize> {
        self.anchor
    }

    fn read_only(&self) -> bool {
        self.read_only
    }
}
