// Session State Machine
// Menu loop routing between data entry and history view

use crate::classify::classify;
use crate::display::{DisplayAdapter, Emphasis, Key, ScreenLine};
use crate::store::{Record, RecordStore};
use crate::validate::{RawInput, FIELD_MAX_BYTES, NAME_MAX_BYTES};
use std::io;

/// Records shown by the history view unless configured otherwise
pub const DEFAULT_HISTORY_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    MainMenu,
    EnteringData,
    ViewingHistory,
    Exited,
}

impl State {
    /// Transition out of `MainMenu` for a key press
    pub fn from_menu_key(key: Key) -> State {
        match key {
            Key::Char('1') => State::EnteringData,
            Key::Char('2') => State::ViewingHistory,
            Key::Char('3') | Key::Closed => State::Exited,
            _ => State::MainMenu,
        }
    }
}

/// One interactive run from the first menu to exit.
///
/// The store and display are borrowed; the caller owns both and releases
/// them once `run` returns, whichever way it returns.
pub struct Session<'a, S: RecordStore, D: DisplayAdapter> {
    store: &'a mut S,
    display: &'a mut D,
    history_limit: u32,
    notice: Option<String>,
}

impl<'a, S: RecordStore, D: DisplayAdapter> Session<'a, S, D> {
    pub fn new(store: &'a mut S, display: &'a mut D, history_limit: u32) -> Self {
        Self {
            store,
            display,
            history_limit,
            notice: None,
        }
    }

    /// Initialize the schema and drive the menu loop until `Exited`.
    ///
    /// Store errors are shown and the loop continues; only display I/O
    /// errors end the session early.
    pub fn run(&mut self) -> io::Result<()> {
        if let Err(err) = self.store.ensure_schema() {
            tracing::warn!(error = %err, "schema initialization failed");
            self.notice = Some(err.to_string());
        }

        let mut state = State::MainMenu;
        while state != State::Exited {
            let next = self.step(state)?;
            tracing::debug!(from = ?state, to = ?next, "state transition");
            state = next;
        }

        tracing::info!("session ended");
        Ok(())
    }

    pub fn step(&mut self, state: State) -> io::Result<State> {
        match state {
            State::MainMenu => self.main_menu(),
            State::EnteringData => self.enter_data(),
            State::ViewingHistory => self.view_history(),
            State::Exited => Ok(State::Exited),
        }
    }

    fn main_menu(&mut self) -> io::Result<State> {
        let mut lines = title_box("BMI & Nutrition Tracker");
        lines.push(ScreenLine::new(4, 2, "1. Enter new user data", Emphasis::Normal));
        lines.push(ScreenLine::new(
            5,
            2,
            format!("2. View last {} BMI records", self.history_limit),
            Emphasis::Normal,
        ));
        lines.push(ScreenLine::new(6, 2, "3. Exit", Emphasis::Normal));
        if let Some(notice) = self.notice.take() {
            lines.push(ScreenLine::new(10, 0, notice, Emphasis::Warning));
        }
        lines.push(ScreenLine::new(8, 0, "Select an option: ", Emphasis::Prompt));

        self.display.render_screen(&lines)?;
        let key = self.display.read_key()?;
        Ok(State::from_menu_key(key))
    }

    /// Prompt for one field, keeping the answer on screen. `None` on end of
    /// input.
    fn prompt(
        &mut self,
        lines: &mut Vec<ScreenLine>,
        row: u16,
        label: &str,
        max_len: usize,
    ) -> io::Result<Option<String>> {
        lines.push(ScreenLine::new(row, 2, label, Emphasis::Prompt));
        self.display.render_screen(lines)?;

        let answer = self.display.read_line(max_len)?;
        if let Some(text) = &answer {
            let col = 2 + u16::try_from(label.chars().count()).unwrap_or(0);
            lines.push(ScreenLine::new(row, col, text.as_str(), Emphasis::Normal));
        }
        Ok(answer)
    }

    fn enter_data(&mut self) -> io::Result<State> {
        let mut lines = Vec::new();

        let Some(name) = self.prompt(&mut lines, 2, "Enter name: ", NAME_MAX_BYTES)? else {
            return Ok(State::Exited);
        };
        let Some(height) = self.prompt(&mut lines, 4, "Enter height (cm): ", FIELD_MAX_BYTES)? else {
            return Ok(State::Exited);
        };
        let Some(weight) = self.prompt(&mut lines, 6, "Enter weight (kg): ", FIELD_MAX_BYTES)? else {
            return Ok(State::Exited);
        };

        let raw = RawInput::new(name, height, weight);
        let measured = raw.normalize().and_then(|m| m.bmi().map(|bmi| (m, bmi)));
        let (measurements, bmi) = match measured {
            Ok(ok) => ok,
            Err(err) => {
                tracing::info!(error = %err, "entry rejected");
                lines.push(ScreenLine::new(8, 2, format!("Error: {err}"), Emphasis::Warning));
                lines.push(ScreenLine::new(10, 2, "Press any key to try again...", Emphasis::Normal));
                return self.acknowledge(&lines);
            }
        };

        let classification = classify(bmi);

        lines.push(ScreenLine::new(
            8,
            2,
            format!("Results for {}:", measurements.name),
            Emphasis::Title,
        ));
        lines.push(ScreenLine::new(10, 2, format!("BMI: {bmi:.2}"), Emphasis::Normal));
        lines.push(ScreenLine::new(
            11,
            2,
            format!("Category: {classification}"),
            Emphasis::Warning,
        ));

        let mut row = 13;
        if let Err(err) = self.store.append(&measurements.name, bmi) {
            tracing::error!(error = %err, "record not saved");
            lines.push(ScreenLine::new(row, 2, err.to_string(), Emphasis::Warning));
            row += 2;
        }
        lines.push(ScreenLine::new(row, 2, "Press any key to continue...", Emphasis::Prompt));

        self.acknowledge(&lines)
    }

    fn view_history(&mut self) -> io::Result<State> {
        let mut lines = title_box(&format!("Last {} BMI Records", self.history_limit));
        let mut row = 4;

        match self.store.recent(self.history_limit) {
            Ok(records) if records.is_empty() => {
                lines.push(ScreenLine::new(row, 2, "No records yet.", Emphasis::Normal));
                row += 1;
            }
            Ok(records) => {
                for record in &records {
                    lines.push(record_line(record, row));
                    row += 1;
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "history query failed");
                lines.push(ScreenLine::new(row, 2, err.to_string(), Emphasis::Warning));
                row += 1;
            }
        }

        lines.push(ScreenLine::new(row + 1, 2, "Press any key to return...", Emphasis::Prompt));
        self.acknowledge(&lines)
    }

    /// Show `lines`, wait for any key, then go back to the menu
    fn acknowledge(&mut self, lines: &[ScreenLine]) -> io::Result<State> {
        self.display.render_screen(lines)?;
        match self.display.read_key()? {
            Key::Closed => Ok(State::Exited),
            _ => Ok(State::MainMenu),
        }
    }
}

fn title_box(title: &str) -> Vec<ScreenLine> {
    vec![
        ScreenLine::new(0, 0, "╔═══════════════════════════════╗", Emphasis::Title),
        ScreenLine::new(1, 0, format!("║{title:^31}║"), Emphasis::Title),
        ScreenLine::new(2, 0, "╚═══════════════════════════════╝", Emphasis::Title),
    ]
}

/// One record per row so a full page fits a standard 80x24 terminal
fn record_line(record: &Record, row: u16) -> ScreenLine {
    let name = format!("Name: {}", record.name);
    ScreenLine::new(
        row,
        2,
        format!("{name:<26} BMI: {:.2}  Date: {}", record.bmi, record.date_string()),
        Emphasis::Normal,
    )
}
