//! Inline yes/no confirmation prompt.
//!
//! The prompt draws below whatever is already on screen (the orphan report,
//! typically) instead of switching to the alternate screen.

use crate::error::SelectError;
use crate::select::view::Theme;
use crate::terminal::{self, Input, TerminalGuard};
use crossterm::{
    cursor, queue,
    event::{KeyCode, KeyEvent, KeyModifiers},
    style::{Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};
use tracing::debug;

/// Help bar shown under the answers.
pub const HELP: &str = "arrows: move | enter/y/n: select | ctrl+c: abort";

/// How a prompt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Still waiting for input.
    Pending,
    /// The user picked an answer.
    Answered(bool),
    /// The user pressed ctrl+c.
    Aborted,
}

/// State of a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmState {
    /// Highlighted answer.
    answer: bool,
    /// Result so far.
    outcome: Outcome,
}

impl Default for ConfirmState {
    fn default() -> Self {
        Self {
            answer: true,
            outcome: Outcome::Pending,
        }
    }
}

impl ConfirmState {
    /// Highlighted answer.
    #[must_use]
    pub const fn answer(&self) -> bool {
        self.answer
    }

    /// Result so far.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Applies one key press.
    pub fn handle_key(&mut self, key: &KeyEvent) {
        if self.outcome != Outcome::Pending {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => self.outcome = Outcome::Aborted,
            KeyCode::Enter => self.outcome = Outcome::Answered(self.answer),
            KeyCode::Left => self.answer = true,
            KeyCode::Right => self.answer = false,
            KeyCode::Char('y' | 'Y') if !ctrl => {
                self.answer = true;
                self.outcome = Outcome::Answered(true);
            }
            KeyCode::Char('n' | 'N') if !ctrl => {
                self.answer = false;
                self.outcome = Outcome::Answered(false);
            }
            _ => {}
        }
    }

    /// Converts a finished prompt into its result.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::UserAborted`] if the prompt was aborted or never
    /// answered.
    pub fn result(&self) -> Result<bool, SelectError> {
        match self.outcome {
            Outcome::Answered(answer) => Ok(answer),
            Outcome::Pending | Outcome::Aborted => Err(SelectError::UserAborted),
        }
    }
}

/// Number of lines [`draw`] writes for `message`.
#[must_use]
pub fn line_count(message: &str) -> usize {
    message.lines().count().max(1) + 4
}

/// Draws the prompt starting at the current cursor line.
///
/// # Errors
///
/// Returns an error if writing to the terminal fails.
pub fn draw(
    out: &mut impl Write,
    message: &str,
    state: &ConfirmState,
    theme: &Theme,
    width: u16,
) -> io::Result<()> {
    for line in message.lines() {
        queue!(out, Print(line), Print("\r\n"))?;
    }

    let answer = |label: &str, active: bool| {
        let text = format!("[ {label} ]");
        if active {
            text.with(theme.prompt).bold()
        } else {
            text.with(theme.unlinked)
        }
    };
    queue!(
        out,
        Print("\r\n"),
        PrintStyledContent(answer("Yes", state.answer)),
        Print("  "),
        PrintStyledContent(answer("No", !state.answer)),
        Print("\r\n\r\n")
    )?;

    queue!(out, PrintStyledContent(help_bar(width).reverse()))?;
    out.flush()
}

/// The help text padded or cut to exactly `width` columns, so it never wraps.
fn help_bar(width: u16) -> String {
    let width = usize::from(width);
    format!("{HELP:<width$.width$}")
}

/// Moves back to the first prompt line and clears everything below it.
fn rewind(out: &mut impl Write, lines: usize) -> io::Result<()> {
    queue!(out, cursor::MoveToColumn(0))?;
    let up = u16::try_from(lines.saturating_sub(1)).unwrap_or(u16::MAX);
    if up > 0 {
        queue!(out, cursor::MoveUp(up))?;
    }
    queue!(out, Clear(ClearType::FromCursorDown))
}

/// Asks a yes/no question; `Yes` is preselected.
///
/// # Errors
///
/// - [`SelectError::UserAborted`] if the user pressed ctrl+c
/// - [`SelectError::Terminal`] if the terminal could not be driven
pub fn show_confirmation(message: &str, theme: &Theme) -> Result<bool, SelectError> {
    let _guard = TerminalGuard::enter(false)?;
    let mut stdout = io::stdout();
    let lines = line_count(message);
    let mut state = ConfirmState::default();

    loop {
        let (width, _) = terminal::size();
        draw(&mut stdout, message, &state, theme, width)?;
        if let Input::Key(key) = terminal::next_input()? {
            state.handle_key(&key);
        }
        rewind(&mut stdout, lines)?;
        if state.outcome() != Outcome::Pending {
            break;
        }
    }

    // Echo the answer where the prompt was.
    if let Outcome::Answered(answer) = state.outcome() {
        let text = if answer { "Yes" } else { "No" };
        queue!(
            stdout,
            Print(message.lines().last().unwrap_or_default()),
            Print(" "),
            PrintStyledContent(text.with(theme.prompt)),
            Print("\r\n")
        )?;
        stdout.flush()?;
    }
    debug!(outcome = ?state.outcome(), "Confirmation finished");
    state.result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn run(keys: &[KeyEvent]) -> ConfirmState {
        let mut state = ConfirmState::default();
        for key in keys {
            state.handle_key(key);
        }
        state
    }

    #[test]
    fn test_defaults_to_yes() {
        let state = run(&[press(KeyCode::Enter)]);
        assert!(state.result().unwrap());
    }

    #[rstest]
    #[case(&[press(KeyCode::Right), press(KeyCode::Enter)], false)]
    #[case(&[press(KeyCode::Right), press(KeyCode::Left), press(KeyCode::Enter)], true)]
    #[case(&[press(KeyCode::Char('n'))], false)]
    #[case(&[press(KeyCode::Char('N'))], false)]
    #[case(&[press(KeyCode::Right), press(KeyCode::Char('Y'))], true)]
    fn test_answers(#[case] keys: &[KeyEvent], #[case] expected: bool) {
        assert_eq!(run(keys).result().unwrap(), expected);
    }

    #[test]
    fn test_ctrl_c_aborts() {
        let state = run(&[KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)]);
        assert_eq!(state.outcome(), Outcome::Aborted);
        assert!(state.result().unwrap_err().is_abort());
    }

    #[test]
    fn test_keys_after_answer_are_ignored() {
        let state = run(&[press(KeyCode::Char('n')), press(KeyCode::Char('y'))]);
        assert_eq!(state.outcome(), Outcome::Answered(false));
    }

    #[test]
    fn test_unanswered_is_abort() {
        let state = run(&[press(KeyCode::Char('x')), press(KeyCode::Left)]);
        assert_eq!(state.outcome(), Outcome::Pending);
        assert!(state.result().is_err());
    }

    #[test]
    fn test_draw_layout() {
        let mut out = Vec::new();
        let message = "Found orphans\nClean them?";
        draw(&mut out, message, &ConfirmState::default(), &Theme::default(), 60).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.starts_with("Found orphans\r\nClean them?\r\n"));
        assert!(text.contains("[ Yes ]"));
        assert!(text.contains("[ No ]"));
        assert!(text.contains(HELP));
        assert_eq!(line_count(message), 6);
    }

    #[rstest]
    #[case(80)]
    #[case(20)]
    #[case(1)]
    fn test_help_bar_fits_terminal_width(#[case] width: u16) {
        let bar = help_bar(width);
        assert_eq!(bar.chars().count(), usize::from(width));
        assert!(HELP.starts_with(bar.trim_end()));
    }
}
