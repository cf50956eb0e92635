//! Display adapter contract.
//!
//! The session describes each screen as positioned lines tagged with a
//! logical [`Emphasis`]; colors and terminal handling belong to the
//! implementation. [`PlainDisplay`] is a line-oriented implementation over
//! any reader/writer pair, used for piped input. The full-screen terminal
//! implementation lives in `tui`.

use crate::validate::truncate_to_boundary;
use std::io::{self, BufRead, Write};

/// Logical emphasis level of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Title,
    Normal,
    Prompt,
    Warning,
}

/// A piece of text at a screen position (zero-based row/column)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenLine {
    pub row: u16,
    pub col: u16,
    pub text: String,
    pub emphasis: Emphasis,
}

impl ScreenLine {
    pub fn new(row: u16, col: u16, text: impl Into<String>, emphasis: Emphasis) -> Self {
        Self {
            row,
            col,
            text: text.into(),
            emphasis,
        }
    }
}

/// A single key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    /// Enter, arrows and anything else without a character
    Other,
    /// Input is exhausted or the user asked to quit
    Closed,
}

pub trait DisplayAdapter {
    /// Replace the whole screen with `lines`
    fn render_screen(&mut self, lines: &[ScreenLine]) -> io::Result<()>;

    /// Block until one key is pressed
    fn read_key(&mut self) -> io::Result<Key>;

    /// Block until a line is entered, echoing it. At most `max_len` bytes
    /// are kept. `None` once input is exhausted.
    fn read_line(&mut self, max_len: usize) -> io::Result<Option<String>>;
}

// ============================================================================
// PLAIN (LINE-ORIENTED) DISPLAY
// ============================================================================

/// Renders screens as plain text lines and reads whole input lines.
///
/// A key press is the first character of an input line; an empty line is
/// [`Key::Other`].
pub struct PlainDisplay<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PlainDisplay<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }

    /// Next input line without its line ending. Bytes that are not UTF-8
    /// become U+FFFD instead of failing the read.
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}

impl<R: BufRead, W: Write> DisplayAdapter for PlainDisplay<R, W> {
    fn render_screen(&mut self, lines: &[ScreenLine]) -> io::Result<()> {
        let mut sorted: Vec<&ScreenLine> = lines.iter().collect();
        sorted.sort_by_key(|l| (l.row, l.col));

        writeln!(self.output)?;
        let mut row = 0;
        let mut current = String::new();
        for line in sorted {
            while row < line.row {
                writeln!(self.output, "{}", current.trim_end())?;
                current.clear();
                row += 1;
            }
            let col = usize::from(line.col);
            let width = current.chars().count();
            if width < col {
                current.push_str(&" ".repeat(col - width));
            }
            current.push_str(&line.text);
        }
        writeln!(self.output, "{}", current.trim_end())?;
        self.output.flush()
    }

    fn read_key(&mut self) -> io::Result<Key> {
        let key = match self.next_line()? {
            None => Key::Closed,
            Some(line) => line.chars().next().map(Key::Char).unwrap_or(Key::Other),
        };
        Ok(key)
    }

    fn read_line(&mut self, max_len: usize) -> io::Result<Option<String>> {
        Ok(self
            .next_line()?
            .map(|line| truncate_to_boundary(&line, max_len).to_string()))
    }
}
