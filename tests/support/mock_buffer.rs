use ropey::Rope;

use vi_mode::traits::{Buffer, Document};

const INDENT: &str = "    ";

/// Character classes for word motions: a word is a run of alphanumerics and
/// underscores or a run of other printable characters, with blanks between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Blank,
    Word,
    Punct,
}

fn class_of(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Blank
    } else if c.is_alphanumeric() || c == '_' {
        CharClass::Word
    } else {
        CharClass::Punct
    }
}

fn big_class_of(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Blank
    } else {
        CharClass::Word
    }
}

const BRACKET_PAIRS: [(char, char); 3] = [('(', ')'), ('[', ']'), ('{', '}')];

/// Rope-backed in-memory buffer for driving the engine in tests.
#[derive(Debug, Clone, Default)]
pub struct MockBuffer {
    rope: Rope,
    cursor: usize,
    anchor: Option<usize>,
    undo_stack: Vec<(Rope, usize)>,
    redo_stack: Vec<(Rope, usize)>,
    viewport: Option<(usize, usize)>,
    read_only: bool,
}

impl MockBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            ..Self::default()
        }
    }

    pub fn with_cursor(text: &str, cursor: usize) -> Self {
        let mut buffer = Self::new(text);
        buffer.cursor = cursor.min(buffer.rope.len_chars());
        buffer
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn set_viewport(&mut self, first: usize, last: usize) {
        self.viewport = Some((first, last));
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    fn remember(&mut self) {
        self.undo_stack.push((self.rope.clone(), self.cursor));
        self.redo_stack.clear();
    }

    fn class(&self, at: usize, big: bool) -> CharClass {
        let c = self.rope.char(at);
        if big { big_class_of(c) } else { class_of(c) }
    }

    /// One `w`/`W` step: leave the current run, then skip blanks.
    fn step_word_start(&self, mut at: usize, big: bool) -> usize {
        let len = self.rope.len_chars();
        if at < len {
            let here = self.class(at, big);
            if here != CharClass::Blank {
                while at < len && self.class(at, big) == here {
                    at += 1;
                }
            }
        }
        while at < len && self.class(at, big) == CharClass::Blank {
            at += 1;
        }
        at
    }

    fn word_start_search(&self, count: usize, big: bool) -> Option<isize> {
        let len = self.rope.len_chars();
        if self.cursor >= len {
            return None;
        }
        let mut at = self.cursor;
        for _ in 0..count {
            at = self.step_word_start(at, big);
            if at >= len {
                break;
            }
        }
        Some(at as isize - self.cursor as isize)
    }

    fn word_back_search(&self, count: usize, big: bool) -> Option<isize> {
        if self.cursor == 0 {
            return None;
        }
        let mut at = self.cursor;
        for _ in 0..count {
            if at == 0 {
                break;
            }
            at -= 1;
            while at > 0 && self.class(at, big) == CharClass::Blank {
                at -= 1;
            }
            let here = self.class(at, big);
            if here != CharClass::Blank {
                while at > 0 && self.class(at - 1, big) == here {
                    at -= 1;
                }
            }
        }
        Some(at as isize - self.cursor as isize)
    }

    fn word_end_search(&self, count: usize, big: bool) -> Option<isize> {
        let len = self.rope.len_chars();
        let mut at = self.cursor;
        let mut moved = false;
        for _ in 0..count {
            let mut next = at + 1;
            while next < len && self.class(next, big) == CharClass::Blank {
                next += 1;
            }
            if next >= len {
                break;
            }
            let here = self.class(next, big);
            while next + 1 < len && self.class(next + 1, big) == here {
                next += 1;
            }
            at = next;
            moved = true;
        }
        moved.then(|| at as isize - self.cursor as isize)
    }

    fn bounds(&self, offset: usize, big: bool) -> Option<(usize, usize)> {
        let len = self.rope.len_chars();
        if offset >= len {
            return None;
        }
        let here = self.class(offset, big);
        if here == CharClass::Blank {
            return None;
        }
        let mut from = offset;
        while from > 0 && self.class(from - 1, big) == here {
            from -= 1;
        }
        let mut to = offset + 1;
        while to < len && self.class(to, big) == here {
            to += 1;
        }
        Some((from, to))
    }

    fn line_is_blank(&self, line: usize) -> bool {
        self.first_non_blank(line) == self.line_end(line)
    }

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

impl Document for MockBuffer {
    fn len(&self) -> usize {
        self.rope.len_chars()
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        (offset < self.rope.len_chars()).then(|| self.rope.char(offset))
    }

    fn slice(&self, from: usize, to: usize) -> String {
        let to = to.min(self.rope.len_chars());
        let from = from.min(to);
        self.rope.slice(from..to).to_string()
    }

    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_of(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset.min(self.rope.len_chars()))
    }

    fn line_start(&self, line: usize) -> usize {
        self.rope.line_to_char(line.min(self.rope.len_lines() - 1))
    }

    fn line_end(&self, line: usize) -> usize {
        let line = line.min(self.rope.len_lines() - 1);
        if line + 1 < self.rope.len_lines() {
            self.rope.line_to_char(line + 1) - 1
        } else {
            self.rope.len_chars()
        }
    }

    fn first_non_blank(&self, line: usize) -> usize {
        let end = self.line_end(line);
        let mut at = self.line_start(line);
        while at < end {
            match self.rope.char(at) {
                ' ' | '\t' => at += 1,
                _ => break,
            }
        }
        at
    }

    fn next_word_start(&self, count: usize) -> Option<isize> {
        self.word_start_search(count, false)
    }

    fn next_word_end(&self, count: usize) -> Option<isize> {
        self.word_end_search(count, false)
    }

    fn prev_word_start(&self, count: usize) -> Option<isize> {
        self.word_back_search(count, false)
    }

    fn next_big_word_start(&self, count: usize) -> Option<isize> {
        self.word_start_search(count, true)
    }

    fn next_big_word_end(&self, count: usize) -> Option<isize> {
        self.word_end_search(count, true)
    }

    fn prev_big_word_start(&self, count: usize) -> Option<isize> {
        self.word_back_search(count, true)
    }

    fn word_bounds_at(&self, offset: usize) -> Option<(usize, usize)> {
        self.bounds(offset, false)
    }

    fn big_word_bounds_at(&self, offset: usize) -> Option<(usize, usize)> {
        self.bounds(offset, true)
    }

    fn next_paragraph_start(&self, count: usize) -> Option<isize> {
        if self.cursor >= self.rope.len_chars() {
            return None;
        }
        let mut line = self.line_of(self.cursor);
        let mut target = self.rope.len_chars();
        for _ in 0..count {
            match self.paragraph_line_below(line) {
                Some(below) => {
                    line = below;
                    target = self.line_start(below);
                }
                None => {
                    target = self.rope.len_chars();
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
            let c = self.rope.char(at);
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
            for offset in seed..self.rope.len_chars() {
                let c = self.rope.char(offset);
                if c == open {
                    depth += 1;
                } else if c == close {
                    depth -= 1;
                    if depth == 0 {
                        return Some(offset);
                    }
                }
            }
        } else {
            for offset in (0..=seed).rev() {
                let c = self.rope.char(offset);
                if c == close {
                    depth += 1;
                } else if c == open {
                    depth -= 1;
                    if depth == 0 {
                        return Some(offset);
                    }
                }
            }
        }
        None
    }

    fn enclosing_brackets(&self, offset: usize, open: char, close: char) -> Option<(usize, usize)> {
        let len = self.rope.len_chars();
        if len == 0 {
            return None;
        }
        let at = offset.min(len - 1);
        let mut depth = 0usize;
        let mut start = None;
        for scan in (0..=at).rev() {
            let c = self.rope.char(scan);
            if c == close && scan != at {
                depth += 1;
            } else if c == open {
                if depth == 0 {
                    start = Some(scan);
                    break;
                }
                depth -= 1;
            }
        }
        let start = start?;
        let mut depth = 0usize;
        for scan in start..len {
            let c = self.rope.char(scan);
            if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    return Some((start, scan));
                }
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
                if self.rope.char(at) == ch {
                    remaining -= 1;
                    if remaining == 0 {
                        return Some(at as isize - self.cursor as isize);
                    }
                }
            }
        } else {
            for at in (start..self.cursor.min(end)).rev() {
                if self.rope.char(at) == ch {
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
        let last_line = self.rope.len_lines() - 1;
        match self.viewport {
            Some((first, last)) => (first.min(last_line), last.min(last_line)),
            None => (0, last_line),
        }
    }
}

impl Buffer for MockBuffer {
    fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.rope.len_chars());
    }

    fn insert(&mut self, offset: usize, text: &str, overwrite: bool) {
        self.remember();
        let offset = offset.min(self.rope.len_chars());
        if overwrite {
            let end = self.line_end(self.line_of(offset));
            let take = text.chars().count().min(end - offset);
            self.rope.remove(offset..offset + take);
        }
        self.rope.insert(offset, text);
    }

    fn delete(&mut self, from: usize, to: usize) -> String {
        let to = to.min(self.rope.len_chars());
        let from = from.min(to);
        if from == to {
            return String::new();
        }
        self.remember();
        let removed = self.rope.slice(from..to).to_string();
        self.rope.remove(from..to);
        removed
    }

    fn insert_line_below(&mut self, line: usize) -> usize {
        self.remember();
        let end = self.line_end(line);
        let at = if end == self.rope.len_chars() { end } else { end + 1 };
        self.rope.insert(at, "\n");
        end + 1
    }

    fn insert_line_above(&mut self, line: usize) -> usize {
        self.remember();
        let start = self.line_start(line);
        self.rope.insert(start, "\n");
        start
    }

    fn join_lines(&mut self, line: usize, count: usize, separator: &str) {
        self.remember();
        for _ in 0..count {
            let seam = self.line_end(line);
            if seam >= self.rope.len_chars() {
                break;
            }
            let mut stop = seam + 1;
            while stop < self.rope.len_chars() {
                match self.rope.char(stop) {
                    ' ' | '\t' => stop += 1,
                    _ => break,
                }
            }
            self.rope.remove(seam..stop);
            self.rope.insert(seam, separator);
        }
    }

    fn transform(&mut self, from: usize, to: usize, f: &dyn Fn(&str) -> String) {
        let to = to.min(self.rope.len_chars());
        let from = from.min(to);
        if from == to {
            return;
        }
        self.remember();
        let replacement = f(&self.rope.slice(from..to).to_string());
        self.rope.remove(from..to);
        self.rope.insert(from, &replacement);
    }

    fn indent(&mut self, first_line: usize, line_count: usize, levels: isize) {
        if levels == 0 || line_count == 0 {
            return;
        }
        self.remember();
        for line in first_line..first_line + line_count {
            if line >= self.rope.len_lines() {
                break;
            }
            if levels > 0 {
                let start = self.line_start(line);
                if self.line_end(line) > start {
                    self.rope.insert(start, &INDENT.repeat(levels as usize));
                }
            } else {
                for _ in 0..-levels {
                    let start = self.line_start(line);
                    let end = self.line_end(line);
                    if start < end && self.rope.char(start) == '\t' {
                        self.rope.remove(start..start + 1);
                        continue;
                    }
                    let mut stop = start;
                    while stop < end && stop - start < INDENT.len() && self.rope.char(stop) == ' ' {
                        stop += 1;
                    }
                    if stop == start {
                        break;
                    }
                    self.rope.remove(start..stop);
                }
            }
        }
    }

    fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some((rope, cursor)) => {
                self.redo_stack.push((self.rope.clone(), self.cursor));
                self.rope = rope;
                self.cursor = cursor;
                true
            }
            None => false,
        }
    }

    fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some((rope, cursor)) => {
                self.undo_stack.push((self.rope.clone(), self.cursor));
                self.rope = rope;
                self.cursor = cursor;
                true
            }
            None => false,
        }
    }

    fn begin_selection(&mut self, anchor: usize) {
        self.anchor = Some(anchor.min(self.rope.len_chars()));
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
