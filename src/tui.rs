use crate::display::{DisplayAdapter, Emphasis, Key, ScreenLine};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Paragraph,
    Frame, Terminal,
};
use std::io::{self, Stdout};

/// Full-screen display on the controlling terminal.
///
/// Raw mode and the alternate screen are entered on construction and left
/// again when the value is dropped.
pub struct TerminalDisplay {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    screen: Vec<ScreenLine>,
}

impl TerminalDisplay {
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err);
        }

        let backend = CrosstermBackend::new(stdout);
        let terminal = match Terminal::new(backend) {
            Ok(terminal) => terminal,
            Err(err) => {
                let _ = restore_terminal();
                return Err(err);
            }
        };

        Ok(Self {
            terminal,
            screen: Vec::new(),
        })
    }

    fn draw(&mut self, input: Option<&str>) -> io::Result<()> {
        let screen = &self.screen;
        self.terminal.draw(|f| render(f, screen, input))?;
        Ok(())
    }

    /// Next key press, redrawing on resize
    fn next_key_event(&mut self) -> io::Result<KeyEvent> {
        loop {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(key),
                Event::Resize(_, _) => self.draw(None)?,
                _ => {}
            }
        }
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = restore_terminal();
        let _ = self.terminal.show_cursor();
    }
}

impl DisplayAdapter for TerminalDisplay {
    fn render_screen(&mut self, lines: &[ScreenLine]) -> io::Result<()> {
        self.screen = lines.to_vec();
        self.draw(None)
    }

    fn read_key(&mut self) -> io::Result<Key> {
        let key = self.next_key_event()?;
        Ok(map_key(key))
    }

    fn read_line(&mut self, max_len: usize) -> io::Result<Option<String>> {
        let mut buf = String::new();
        self.draw(Some(&buf))?;

        loop {
            let key = self.next_key_event()?;
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

            match key.code {
                KeyCode::Enter => return Ok(Some(buf)),
                KeyCode::Char('c') if ctrl => return Ok(None),
                KeyCode::Char('d') if ctrl && buf.is_empty() => return Ok(None),
                KeyCode::Backspace => {
                    buf.pop();
                }
                KeyCode::Char(c) if !ctrl => {
                    if buf.len() + c.len_utf8() <= max_len {
                        buf.push(c);
                    }
                }
                _ => continue,
            }

            self.draw(Some(&buf))?;
        }
    }
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

fn map_key(key: KeyEvent) -> Key {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => Key::Closed,
        KeyCode::Char(c) => Key::Char(c),
        _ => Key::Other,
    }
}

fn style_for(emphasis: Emphasis) -> Style {
    match emphasis {
        Emphasis::Title => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        Emphasis::Normal => Style::default().fg(Color::Cyan),
        Emphasis::Prompt => Style::default().fg(Color::Yellow),
        Emphasis::Warning => Style::default().fg(Color::Red),
    }
}

pub(crate) fn render(f: &mut Frame, lines: &[ScreenLine], input: Option<&str>) {
    let area = f.size();

    for line in lines {
        if line.row >= area.height || line.col >= area.width {
            continue;
        }
        let rect = Rect::new(line.col, line.row, area.width - line.col, 1);
        let text = Span::styled(line.text.as_str(), style_for(line.emphasis));
        f.render_widget(Paragraph::new(text), rect);
    }

    // Echo pending input right after the last line drawn, like a prompt cursor
    if let Some(input) = input {
        let (row, col) = lines
            .last()
            .map(|l| (l.row, l.col.saturating_add(text_width(&l.text))))
            .unwrap_or((0, 0));
        if row >= area.height || col >= area.width {
            return;
        }

        let rect = Rect::new(col, row, area.width - col, 1);
        f.render_widget(Paragraph::new(Span::raw(input)), rect);

        let cursor_col = col.saturating_add(text_width(input)).min(area.width - 1);
        f.set_cursor(cursor_col, row);
    }
}

fn text_width(s: &str) -> u16 {
    u16::try_from(s.chars().count()).unwrap_or(u16::MAX)
}
