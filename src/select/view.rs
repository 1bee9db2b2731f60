//! Drawing the selection list.
//!
//! Rendering is a pure function of the session state plus an explicit
//! [`Theme`]; it writes crossterm commands to any `Write`, which keeps it
//! testable against an in-memory buffer.

use super::keys::{Action, KeyMap};
use super::state::{Phase, SelectionState};
use crate::config::ThemeConfig;
use crossterm::{
    cursor, queue,
    style::{Attribute, Color, Print, PrintStyledContent, StyledContent, Stylize},
    terminal::{self, ClearType},
};
use std::io::{self, Write};

/// Colours used by the list and the confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Row under the cursor.
    pub cursor: Color,
    /// Rows that are not linked.
    pub unlinked: Color,
    /// Highlighted answer in the confirmation prompt.
    pub prompt: Color,
}

impl Theme {
    /// Builds a theme from ANSI colour indices in the config.
    #[must_use]
    pub const fn from_config(config: &ThemeConfig) -> Self {
        Self {
            cursor: Color::AnsiValue(config.cursor),
            unlinked: Color::AnsiValue(config.unlinked),
            prompt: Color::AnsiValue(config.prompt),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

/// One list line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a> {
    /// File name.
    pub name: &'a str,
    /// Whether the file is selected.
    pub is_linked: bool,
    /// Whether the cursor is on this line.
    pub is_under_cursor: bool,
}

/// Styles a single row.
#[must_use]
pub fn render_row(row: &Row<'_>, theme: &Theme) -> StyledContent<String> {
    if row.is_under_cursor {
        let text = format!("> {}", row.name).with(theme.cursor);
        if row.is_linked { text.bold() } else { text }
    } else {
        let text = format!("  {}", row.name);
        if row.is_linked {
            text.attribute(Attribute::Bold)
        } else {
            text.with(theme.unlinked)
        }
    }
}

/// The rows of the visible sequence between `start` and `start + height`.
#[must_use]
pub fn rows(state: &SelectionState, start: usize, height: usize) -> Vec<Row<'_>> {
    state
        .visible()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(index, name)| Row {
            name,
            is_linked: state.is_selected(name),
            is_under_cursor: index == state.cursor(),
        })
        .collect()
}

/// Scroll position of the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// First visible row.
    pub offset: usize,
    /// Number of list lines available.
    pub height: usize,
}

impl Viewport {
    /// Creates a viewport with room for `height` rows.
    #[must_use]
    pub const fn new(height: usize) -> Self {
        Self { offset: 0, height }
    }

    /// Scrolls the minimum amount needed to show `cursor`.
    pub fn follow(&mut self, cursor: usize, len: usize) {
        let height = self.height.max(1);
        if cursor < self.offset {
            self.offset = cursor;
        } else if cursor >= self.offset + height {
            self.offset = cursor + 1 - height;
        }
        self.offset = self.offset.min(len.saturating_sub(height));
    }
}

/// Everything needed to draw one frame.
pub struct Frame<'a> {
    /// Title line; hidden when empty.
    pub title: &'a str,
    /// Session state.
    pub state: &'a SelectionState,
    /// Bindings shown in the help bar.
    pub keys: &'a KeyMap,
    /// Colours.
    pub theme: &'a Theme,
    /// Scroll position.
    pub viewport: Viewport,
    /// Whether the full help is expanded.
    pub full_help: bool,
}

/// Lines taken by everything except the list rows.
#[must_use]
pub fn chrome_lines(title: &str, state: &SelectionState, full_help: bool) -> usize {
    let title_lines = if title.is_empty() { 0 } else { 2 };
    let filter_lines = usize::from(shows_filter_line(state));
    let help_lines = if full_help { 4 } else { 2 };
    title_lines + filter_lines + help_lines
}

/// Whether the filter line is drawn.
fn shows_filter_line(state: &SelectionState) -> bool {
    state.phase() == Phase::Filtering || !state.filter_text().is_empty()
}

/// Help text, one entry per line group.
#[must_use]
pub fn help_lines(keys: &KeyMap, full: bool) -> Vec<String> {
    let entry = |action: Action| format!("{} {}", keys.label(action), action.description());
    let join = |actions: &[Action]| {
        actions
            .iter()
            .map(|a| entry(*a))
            .collect::<Vec<_>>()
            .join(" • ")
    };

    if full {
        vec![
            join(&[Action::Select, Action::SelectAll, Action::DeselectAll]),
            join(&[Action::Up, Action::Down, Action::Top, Action::Bottom]),
            join(&[Action::PageUp, Action::PageDown]),
            join(&[Action::HideToggle, Action::Filter, Action::Confirm, Action::Quit]),
        ]
    } else {
        vec![join(&[
            Action::Select,
            Action::HideToggle,
            Action::Filter,
            Action::Confirm,
            Action::Help,
        ])]
    }
}

/// Draws the loading screen shown while the directories are read.
///
/// # Errors
///
/// Returns an error if writing to the terminal fails.
pub fn draw_loading(out: &mut impl Write) -> io::Result<()> {
    queue!(
        out,
        cursor::MoveTo(0, 0),
        terminal::Clear(ClearType::All),
        Print("Loading files...")
    )?;
    out.flush()
}

/// Draws a full frame.
///
/// # Errors
///
/// Returns an error if writing to the terminal fails.
pub fn draw(out: &mut impl Write, frame: &Frame<'_>) -> io::Result<()> {
    let state = frame.state;
    queue!(out, cursor::MoveTo(0, 0), terminal::Clear(ClearType::All))?;

    if !frame.title.is_empty() {
        queue!(
            out,
            PrintStyledContent(frame.title.to_string().bold()),
            Print("\r\n\r\n")
        )?;
    }

    if shows_filter_line(state) {
        let caret = if state.phase() == Phase::Filtering { "_" } else { "" };
        queue!(
            out,
            Print(format!("/ {}{caret}", state.filter_text())),
            Print("\r\n")
        )?;
    }

    let rows = rows(state, frame.viewport.offset, frame.viewport.height);
    if rows.is_empty() {
        let message = if state.hide_unlinked() {
            "  No linked items."
        } else {
            "  No items."
        };
        queue!(out, PrintStyledContent(message.with(frame.theme.unlinked)), Print("\r\n"))?;
    }
    for row in &rows {
        queue!(out, PrintStyledContent(render_row(row, frame.theme)), Print("\r\n"))?;
    }

    queue!(out, Print("\r\n"))?;
    for line in help_lines(frame.keys, frame.full_help) {
        queue!(out, PrintStyledContent(line.dim()), Print("\r\n"))?;
    }

    out.flush()
}
