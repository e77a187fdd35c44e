//! Operators over motions, the doubled-key line shortcuts, direct editing
//! commands, and operators applied to active selections.

mod support;

use support::mock_buffer::MockBuffer;
use support::{ctrl, esc, feed, key};
use vi_mode::{Buffer, DispatchResult, Document, Engine, Mode, SelectionKind};

#[test]
fn dw_deletes_to_the_next_word() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("hello world");

    feed(&mut engine, &mut buf, "dw");
    assert_eq!(buf.text(), "world");
    assert_eq!(buf.cursor(), 0);

    let reg = engine.registers().get(None).unwrap();
    assert_eq!(reg.text, "hello ");
    assert_eq!(reg.kind, SelectionKind::Characters);
}

#[test]
fn arming_an_operator_waits_for_a_motion() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("hello world");

    let result = engine.handle_event(&mut buf, key('d'));
    assert_eq!(result, DispatchResult::Pending);
    assert_eq!(buf.text(), "hello world");

    feed(&mut engine, &mut buf, "w");
    assert_eq!(buf.text(), "world");
}

#[test]
fn escape_cancels_an_armed_operator() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("abc def");

    engine.handle_event(&mut buf, key('d'));
    engine.handle_event(&mut buf, esc());
    assert!(!engine.snapshot().operator_pending);

    // the next motion only moves
    feed(&mut engine, &mut buf, "w");
    assert_eq!(buf.text(), "abc def");
    assert_eq!(buf.cursor(), 4);
}

#[test]
fn unbound_key_after_an_operator_rings_the_bell() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("abc");

    feed(&mut engine, &mut buf, "d");
    let result = engine.handle_event(&mut buf, key('!'));
    assert_eq!(result, DispatchResult::Bell);
    assert_eq!(buf.text(), "abc");
    // the operator stays armed until Esc
    assert!(engine.snapshot().operator_pending);
    engine.handle_event(&mut buf, esc());
    assert!(!engine.snapshot().operator_pending);
}

#[test]
fn counts_on_operator_and_motion_multiply() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("a b c d e f g h i");

    feed(&mut engine, &mut buf, "2d2w");
    assert_eq!(buf.text(), "e f g h i"); // four words gone
    assert_eq!(buf.cursor(), 0);
}

#[test]
fn count_only_on_the_motion() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("a b c d");

    feed(&mut engine, &mut buf, "d3w");
    assert_eq!(buf.text(), "d");
}

#[test]
fn multiplied_count_runs_off_the_last_word() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("one two three four");

    // six words wanted, four available: the range runs to the document end
    feed(&mut engine, &mut buf, "2d3w");
    assert_eq!(buf.text(), "");
    assert_eq!(buf.cursor(), 0);
    assert_eq!(engine.registers().get(None).unwrap().text, "one two three four");
}

#[test]
fn dd_removes_the_cursor_line() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::with_cursor("one\ntwo\nthree", 5);

    feed(&mut engine, &mut buf, "dd");
    assert_eq!(buf.text(), "one\nthree");
    assert_eq!(buf.cursor(), 4); // first char of the line that moved up

    let reg = engine.registers().get(None).unwrap();
    assert_eq!(reg.text, "two");
    assert_eq!(reg.kind, SelectionKind::Lines);
}

#[test]
fn count_dd_removes_following_lines() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("one\ntwo\nthree");

    feed(&mut engine, &mut buf, "2dd");
    assert_eq!(buf.text(), "three");
    assert_eq!(buf.cursor(), 0);
    assert_eq!(engine.registers().get(None).unwrap().text, "one\ntwo");
}

#[test]
fn dd_on_the_last_line_eats_the_preceding_newline() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::with_cursor("one\ntwo", 5);

    feed(&mut engine, &mut buf, "dd");
    assert_eq!(buf.text(), "one");
    assert_eq!(buf.cursor(), 0);
    assert_eq!(engine.registers().get(None).unwrap().text, "two");
}

#[test]
fn dd_on_the_only_line_leaves_an_empty_buffer() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::with_cursor("only", 2);

    feed(&mut engine, &mut buf, "dd");
    assert_eq!(buf.text(), "");
    assert_eq!(buf.cursor(), 0);
    assert_eq!(engine.registers().get(None).unwrap().text, "only");
}

#[test]
fn dd_on_an_empty_buffer_is_silent() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("");

    feed(&mut engine, &mut buf, "dd");
    assert_eq!(buf.text(), "");
    assert!(engine.registers().get(None).is_none()); // nothing was written
}

#[test]
fn dj_covers_both_lines() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::with_cursor("one\ntwo\nthree", 1);

    feed(&mut engine, &mut buf, "dj");
    assert_eq!(buf.text(), "three");
    assert_eq!(engine.registers().get(None).unwrap().text, "one\ntwo");
}

#[test]
fn dk_covers_both_lines() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::with_cursor("one\ntwo\nthree", 5);

    feed(&mut engine, &mut buf, "dk");
    assert_eq!(buf.text(), "three");
    assert_eq!(buf.cursor(), 0);
}

#[test]
fn d_goto_last_line_clears_to_the_end() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("a\nb\nc");

    feed(&mut engine, &mut buf, "dG");
    assert_eq!(buf.text(), "");
    assert_eq!(engine.registers().get(None).unwrap().text, "a\nb\nc");
}

#[test]
fn big_d_deletes_to_line_end() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::with_cursor("hello world\nnext", 6);

    feed(&mut engine, &mut buf, "D");
    assert_eq!(buf.text(), "hello \nnext");
    assert_eq!(buf.cursor(), 5); // clamped off the newline
    assert_eq!(engine.registers().get(None).unwrap().text, "world");
}

#[test]
fn x_deletes_under_the_cursor() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("abc");

    feed(&mut engine, &mut buf, "x");
    assert_eq!(buf.text(), "bc");
    assert_eq!(buf.cursor(), 0);
    assert_eq!(engine.registers().get(None).unwrap().text, "a");
}

#[test]
fn count_x_stops_at_line_end() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::with_cursor("abcde\nfgh", 3);

    feed(&mut engine, &mut buf, "9x");
    assert_eq!(buf.text(), "abc\nfgh"); // never crosses the newline
    assert_eq!(buf.cursor(), 2);
}

#[test]
fn x_on_an_empty_line_is_silent() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::with_cursor("a\n\nb", 2);

    feed(&mut engine, &mut buf, "x");
    assert_eq!(buf.text(), "a\n\nb");
    assert_eq!(buf.cursor(), 2);
    assert!(engine.registers().get(None).is_none());
}

#[test]
fn big_x_deletes_before_the_cursor() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::with_cursor("abc", 2);

    feed(&mut engine, &mut buf, "X");
    assert_eq!(buf.text(), "ac");
    assert_eq!(buf.cursor(), 1);
}

#[test]
fn cw_changes_a_word() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("hello world");

    feed(&mut engine, &mut buf, "cw");
    assert_eq!(engine.snapshot().mode, Mode::Insert);
    assert_eq!(buf.text(), "world");
    feed(&mut engine, &mut buf, "hi");
    engine.handle_event(&mut buf, esc());
    assert_eq!(buf.text(), "hiworld");
    assert_eq!(buf.cursor(), 1);
    assert_eq!(engine.snapshot().mode, Mode::Navigation);
}

#[test]
fn cc_keeps_an_empty_line_to_type_into() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::with_cursor("one\ntwo\nthree", 5);

    feed(&mut engine, &mut buf, "cc");
    assert_eq!(buf.text(), "one\n\nthree");
    assert_eq!(buf.cursor(), 4);
    assert_eq!(engine.snapshot().mode, Mode::Insert);
    assert_eq!(engine.registers().get(None).unwrap().text, "two");

    feed(&mut engine, &mut buf, "X");
    assert_eq!(buf.text(), "one\nX\nthree");
}

#[test]
fn big_s_changes_the_whole_line() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::with_cursor("ab\ncd", 1);

    feed(&mut engine, &mut buf, "S");
    assert_eq!(buf.text(), "\ncd");
    assert_eq!(buf.cursor(), 0);
    assert_eq!(engine.snapshot().mode, Mode::Insert);
}

#[test]
fn big_c_changes_to_line_end() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::with_cursor("hello world", 6);

    feed(&mut engine, &mut buf, "C");
    assert_eq!(buf.text(), "hello ");
    assert_eq!(buf.cursor(), 6);
    assert_eq!(engine.snapshot().mode, Mode::Insert);
}

#[test]
fn s_substitutes_characters() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::with_cursor("abc", 1);

    feed(&mut engine, &mut buf, "s");
    assert_eq!(buf.text(), "ac");
    assert_eq!(engine.snapshot().mode, Mode::Insert);
    feed(&mut engine, &mut buf, "X");
    engine.handle_event(&mut buf, esc());
    assert_eq!(buf.text(), "aXc");
    assert_eq!(buf.cursor(), 1);
}

#[test]
fn s_on_an_empty_line_still_enters_insert() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::with_cursor("a\n\nb", 2);

    feed(&mut engine, &mut buf, "s");
    assert_eq!(buf.text(), "a\n\nb");
    assert_eq!(engine.snapshot().mode, Mode::Insert);
}

#[test]
fn tilde_toggles_case_and_advances() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("aBc");

    feed(&mut engine, &mut buf, "~");
    assert_eq!(buf.text(), "ABc");
    assert_eq!(buf.cursor(), 1);
    feed(&mut engine, &mut buf, "~");
    assert_eq!(buf.text(), "Abc");
    assert_eq!(buf.cursor(), 2);
}

#[test]
fn tilde_count_clamps_to_the_line() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("abc\ndef");

    feed(&mut engine, &mut buf, "9~");
    assert_eq!(buf.text(), "ABC\ndef");
    assert_eq!(buf.cursor(), 2); // stays on the last char
}

#[test]
fn case_operators_take_motions() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("HeLLo World");

    feed(&mut engine, &mut buf, "guw");
    assert_eq!(buf.text(), "hello World");
    assert_eq!(buf.cursor(), 0);
    feed(&mut engine, &mut buf, "gUw");
    assert_eq!(buf.text(), "HELLO World");
    feed(&mut engine, &mut buf, "g~w");
    assert_eq!(buf.text(), "hello World");
}

#[test]
fn doubled_case_operators_cover_lines() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::with_cursor("ABC\nDEF", 1);

    feed(&mut engine, &mut buf, "guu");
    assert_eq!(buf.text(), "abc\nDEF");
    assert_eq!(buf.cursor(), 1); // linewise case change leaves the cursor

    feed(&mut engine, &mut buf, "2gUU");
    assert_eq!(buf.text(), "ABC\nDEF");
    feed(&mut engine, &mut buf, "g~~");
    assert_eq!(buf.text(), "abc\nDEF");
}

#[test]
fn join_lines_with_a_space() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::with_cursor("one\ntwo\nthree", 1);

    feed(&mut engine, &mut buf, "J");
    assert_eq!(buf.text(), "one two\nthree");
    assert_eq!(buf.cursor(), 3); // on the seam
}

#[test]
fn join_swallows_leading_blanks() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("one\n   two");

    feed(&mut engine, &mut buf, "J");
    assert_eq!(buf.text(), "one two");
    assert_eq!(buf.cursor(), 3);
}

#[test]
fn count_join_folds_several_lines() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("a\nb\nc\nd");

    feed(&mut engine, &mut buf, "3J");
    assert_eq!(buf.text(), "a b c\nd");
    assert_eq!(buf.cursor(), 1);
}

#[test]
fn join_on_the_last_line_is_silent() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::with_cursor("one\ntwo", 5);

    let before = buf.text();
    feed(&mut engine, &mut buf, "J");
    assert_eq!(buf.text(), before);
}

#[test]
fn gj_joins_without_a_separator() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("one\ntwo");

    feed(&mut engine, &mut buf, "gJ");
    assert_eq!(buf.text(), "onetwo");
    assert_eq!(buf.cursor(), 3);
}

#[test]
fn shift_right_and_back() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("one\ntwo");

    feed(&mut engine, &mut buf, ">>");
    assert_eq!(buf.text(), "    one\ntwo");
    assert_eq!(buf.cursor(), 4);
    feed(&mut engine, &mut buf, "<<");
    assert_eq!(buf.text(), "one\ntwo");
    assert_eq!(buf.cursor(), 0);
}

#[test]
fn count_shift_covers_following_lines() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("a\nb\nc\nd");

    feed(&mut engine, &mut buf, "3>>");
    assert_eq!(buf.text(), "    a\n    b\n    c\nd");
    assert_eq!(buf.cursor(), 4);
}

#[test]
fn shift_takes_a_motion() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("a\nb\nc");

    feed(&mut engine, &mut buf, ">j");
    assert_eq!(buf.text(), "    a\n    b\nc");
}

#[test]
fn unindent_removes_partial_indents() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("  one");

    feed(&mut engine, &mut buf, "<<");
    assert_eq!(buf.text(), "one");
}

#[test]
fn undo_and_redo() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("abc");

    feed(&mut engine, &mut buf, "x");
    assert_eq!(buf.text(), "bc");
    feed(&mut engine, &mut buf, "u");
    assert_eq!(buf.text(), "abc");
    assert_eq!(buf.cursor(), 0);
    engine.handle_event(&mut buf, ctrl('r'));
    assert_eq!(buf.text(), "bc");
}

#[test]
fn undo_past_the_stack_rings_the_bell() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("abc");

    feed(&mut engine, &mut buf, "x");
    feed(&mut engine, &mut buf, "u");
    let result = engine.handle_event(&mut buf, key('u'));
    assert_eq!(result, DispatchResult::Bell);
    assert_eq!(buf.text(), "abc");
}

#[test]
fn redo_without_history_rings_the_bell() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("abc");

    let result = engine.handle_event(&mut buf, ctrl('r'));
    assert_eq!(result, DispatchResult::Bell);
}

#[test]
fn count_undo_steps_back_repeatedly() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("abc");

    feed(&mut engine, &mut buf, "xx");
    assert_eq!(buf.text(), "c");
    feed(&mut engine, &mut buf, "2u");
    assert_eq!(buf.text(), "abc");
}

#[test]
fn character_selection_delete() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("hello");

    feed(&mut engine, &mut buf, "v");
    assert_eq!(engine.snapshot().selection, Some(SelectionKind::Characters));
    feed(&mut engine, &mut buf, "ll");
    feed(&mut engine, &mut buf, "d");
    assert_eq!(buf.text(), "lo"); // both endpoints covered
    assert_eq!(buf.cursor(), 0);
    assert_eq!(engine.snapshot().selection, None);
    assert_eq!(engine.registers().get(None).unwrap().text, "hel");
}

#[test]
fn selection_delete_works_backwards() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::with_cursor("hello", 3);

    feed(&mut engine, &mut buf, "vhh");
    feed(&mut engine, &mut buf, "x");
    assert_eq!(buf.text(), "ho");
    assert_eq!(buf.cursor(), 1);
}

#[test]
fn line_selection_delete() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::with_cursor("one\ntwo\nthree", 1);

    feed(&mut engine, &mut buf, "Vjd");
    assert_eq!(buf.text(), "three");
    assert_eq!(buf.cursor(), 0);

    let reg = engine.registers().get(None).unwrap();
    assert_eq!(reg.text, "one\ntwo");
    assert_eq!(reg.kind, SelectionKind::Lines);
}

#[test]
fn block_selection_delete() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::with_cursor("abcd\nefgh\nijkl", 1);

    engine.handle_event(&mut buf, ctrl('v'));
    assert_eq!(engine.snapshot().selection, Some(SelectionKind::Block));
    feed(&mut engine, &mut buf, "jld");
    assert_eq!(buf.text(), "ad\neh\nijkl");
    assert_eq!(buf.cursor(), 1);

    let reg = engine.registers().get(None).unwrap();
    assert_eq!(reg.text, "bc\nfg");
    assert_eq!(reg.kind, SelectionKind::Block);
}

#[test]
fn selection_case_toggle() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("abc");

    feed(&mut engine, &mut buf, "vl~");
    assert_eq!(buf.text(), "ABc");
    assert_eq!(buf.cursor(), 0);
    assert_eq!(engine.snapshot().selection, None);
}

#[test]
fn selection_join() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("a\nb\nc");

    feed(&mut engine, &mut buf, "VjJ");
    assert_eq!(buf.text(), "a b\nc");
    assert_eq!(buf.cursor(), 1);
    assert_eq!(engine.snapshot().selection, None);
}

#[test]
fn selection_change_enters_insert() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("hello");

    feed(&mut engine, &mut buf, "vllc");
    assert_eq!(buf.text(), "lo");
    assert_eq!(engine.snapshot().mode, Mode::Insert);
    assert_eq!(engine.snapshot().selection, None);
}

#[test]
fn toggling_the_same_selection_kind_turns_it_off() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("abc");

    feed(&mut engine, &mut buf, "v");
    assert_eq!(engine.snapshot().selection, Some(SelectionKind::Characters));
    feed(&mut engine, &mut buf, "v");
    assert_eq!(engine.snapshot().selection, None);
}

#[test]
fn switching_selection_kind_keeps_the_anchor() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("one\ntwo\nthree");

    feed(&mut engine, &mut buf, "vj");
    feed(&mut engine, &mut buf, "V");
    assert_eq!(engine.snapshot().selection, Some(SelectionKind::Lines));
    feed(&mut engine, &mut buf, "d");
    assert_eq!(buf.text(), "three"); // anchor on line 0 survived the switch
}

#[test]
fn escape_drops_the_selection() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("abc");

    feed(&mut engine, &mut buf, "vl");
    engine.handle_event(&mut buf, esc());
    assert_eq!(engine.snapshot().selection, None);
    feed(&mut engine, &mut buf, "x");
    assert_eq!(buf.text(), "bc"); // plain x again, not a selection delete
}

#[test]
fn read_only_buffers_ignore_edits() {
    let mut engine = Engine::new();
    let mut buf = MockBuffer::new("abc");
    buf.set_read_only(true);

    feed(&mut engine, &mut buf, "x");
    feed(&mut engine, &mut buf, "dd");
    feed(&mut engine, &mut buf, "J");
    feed(&mut engine, &mut buf, "~");
    assert_eq!(buf.text(), "abc");
    assert!(engine.registers().get(None).is_none());
}
