//! Raw-mode terminal handling shared by the selection list and the prompt.

use crossterm::{
    cursor, execute,
    event::{self, Event, KeyEvent, KeyEventKind},
    terminal,
};
use std::io::{self, Write};
use tracing::debug;

/// Puts the terminal into raw mode and restores it when dropped.
///
/// With `alternate` set, drawing happens on the alternate screen, so nothing
/// is left behind in the scrollback once the guard is gone.
pub struct TerminalGuard {
    /// Whether the alternate screen was entered.
    alternate: bool,
}

impl TerminalGuard {
    /// Enters raw mode, optionally on the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be switched to raw mode.
    pub fn enter(alternate: bool) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self { alternate };

        let mut stdout = io::stdout();
        if alternate {
            execute!(stdout, terminal::EnterAlternateScreen)?;
        }
        execute!(stdout, cursor::Hide)?;
        debug!(alternate, "Terminal entered raw mode");
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        if self.alternate {
            let _ = execute!(stdout, terminal::LeaveAlternateScreen);
        }
        let _ = execute!(stdout, cursor::Show);
        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
        debug!("Terminal restored");
    }
}

/// Input relevant to the interactive screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized to `(width, height)`.
    Resize(u16, u16),
}

/// Blocks until the next key press or resize.
///
/// Key releases and repeats reported by some terminals are skipped.
///
/// # Errors
///
/// Returns an error if reading from the terminal fails.
pub fn next_input() -> io::Result<Input> {
    loop {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(Input::Key(key)),
            Event::Resize(width, height) => return Ok(Input::Resize(width, height)),
            _ => {}
        }
    }
}

/// Current terminal size, falling back to 80x24.
#[must_use]
pub fn size() -> (u16, u16) {
    terminal::size().unwrap_or((80, 24))
}
