//! Terminal UI demo using crossterm and ratatui.
//!
//! Shows vi_mode driving the built-in [`StringBuffer`] host: keys go in, the
//! engine edits the buffer, and the status line mirrors the engine snapshot.
//! Run with: cargo run --example tui_crossterm (Ctrl-C quits).

use crossterm::{
    event::{self, Event, KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::io;
use vi_mode::{
    Buffer, DispatchResult, Document, Engine, InputEvent, Key, KeyCode, KeyEvent, Mode, Modifiers,
    SelectionKind, StringBuffer,
};

const WELCOME: &str = "\
Welcome to vi_mode!

Press i to insert, Esc to get back out, Ctrl-C to quit.

Try:
  hjkl  w b e  f<char>  %        movement
  dd  yy  p  ciw  da(  3J        edits
  v  V  Ctrl-V                   selections
  qa ... q   then   @a           macros

The status line below mirrors the engine snapshot.
";

struct App {
    engine: Engine,
    buffer: StringBuffer,
    bell: bool,
}

impl App {
    fn new() -> Self {
        Self {
            engine: Engine::new(),
            buffer: StringBuffer::new(WELCOME),
            bell: false,
        }
    }

    fn handle_crossterm_event(&mut self, event: CKeyEvent) {
        let input = convert_crossterm_event(event);
        let result = self.engine.handle_event(&mut self.buffer, input);
        self.bell = result == DispatchResult::Bell;
    }

    fn cursor_line_col(&self) -> (usize, usize) {
        let at = self.buffer.cursor();
        let line = self.buffer.line_of(at);
        (line, at - self.buffer.line_start(line))
    }

    /// Lines covered by the active selection, for highlighting.
    fn selected_lines(&self) -> Option<(usize, usize)> {
        let anchor = self.buffer.selection_anchor()?;
        let cursor = self.buffer.cursor();
        let (from, to) = (anchor.min(cursor), anchor.max(cursor));
        Some((self.buffer.line_of(from), self.buffer.line_of(to)))
    }

    fn status_line(&self) -> String {
        let snap = self.engine.snapshot();
        let mut status = match (snap.mode, snap.selection) {
            (Mode::Navigation, Some(SelectionKind::Characters)) => "-- VISUAL --".to_string(),
            (Mode::Navigation, Some(SelectionKind::Lines)) => "-- VISUAL LINE --".to_string(),
            (Mode::Navigation, Some(SelectionKind::Block)) => "-- VISUAL BLOCK --".to_string(),
            (Mode::Navigation, None) => String::new(),
            (Mode::Insert | Mode::InsertMultiple, _) => "-- INSERT --".to_string(),
            (Mode::Replace | Mode::ReplaceSingle, _) => "-- REPLACE --".to_string(),
        };
        if let Some(register) = snap.recording {
            status.push_str(&format!(" recording @{register}"));
        }

        let mut pending = String::new();
        if let Some(count) = snap.pending_count {
            pending.push_str(&count.to_string());
        }
        for key in &snap.pending_keys {
            render_key(*key, &mut pending);
        }
        if !pending.is_empty() {
            status.push_str(&format!("  {pending}"));
        }
        if self.bell {
            status.push_str("  [bell]");
        }
        status
    }
}

fn render_key(key: Key, out: &mut String) {
    match key {
        Key::Char(c) => out.push(c),
        Key::Ctrl(c) => {
            out.push('^');
            out.push(c.to_ascii_uppercase());
        }
        Key::Esc => out.push_str("<Esc>"),
        Key::Enter => out.push_str("<CR>"),
        Key::Backspace => out.push_str("<BS>"),
    }
}

fn convert_crossterm_event(event: CKeyEvent) -> InputEvent {
    let code = match event.code {
        CKeyCode::Char(c) => KeyCode::Char(c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Backspace => KeyCode::Backspace,
        _ => KeyCode::Esc,
    };
    let mods = if event.modifiers.contains(KeyModifiers::CONTROL) {
        Modifiers::CTRL
    } else {
        Modifiers::empty()
    };
    InputEvent::Key(KeyEvent { code, mods })
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(3), Constraint::Length(3)].as_ref())
        .split(f.size());

    // Tell the buffer what is on screen so H/M/L have an answer.
    let visible = chunks[0].height.saturating_sub(2) as usize;
    let last_line = app.buffer.line_count().saturating_sub(1);
    app.buffer
        .set_viewport(0, last_line.min(visible.saturating_sub(1)));

    let highlight = app.selected_lines();
    let mut lines = Vec::new();
    for (i, text) in app.buffer.text().lines().enumerate() {
        let selected = highlight.is_some_and(|(from, to)| i >= from && i <= to);
        if selected {
            lines.push(Line::from(Span::styled(
                text.to_string(),
                Style::default().bg(Color::Blue),
            )));
        } else {
            lines.push(Line::from(text.to_string()));
        }
    }

    let text = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("vi_mode demo"));
    f.render_widget(text, chunks[0]);

    let status = Paragraph::new(app.status_line())
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[1]);

    let (line, col) = app.cursor_line_col();
    f.set_cursor(chunks[0].x + 1 + col as u16, chunks[0].y + 1 + line as u16);
}

fn main() -> Result<(), io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();

    loop {
        terminal.draw(|f| ui(f, &mut app))?;

        if let Event::Key(key) = event::read()? {
            if key.code == CKeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }
            app.handle_crossterm_event(key);
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
