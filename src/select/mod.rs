//! Interactive multi-select list for choosing which source files to link.
//!
//! A session has three layers:
//!
//! - [`state`]: the selection state machine, free of any terminal concerns
//! - [`keys`]: configurable bindings from key presses to actions
//! - [`view`]: rendering of the list, filter line and help bar
//!
//! [`Session`] ties them together and is driven one key at a time, either by
//! [`show_file_select`] on a real terminal or directly from tests.

/// Key bindings and key string parsing.
pub mod keys;
/// Selection state machine.
pub mod state;
/// Rendering of the list.
pub mod view;

use crate::config::Config;
use crate::error::SelectError;
use crate::links;
use crate::terminal::{self, Input, TerminalGuard};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use keys::{Action, KeyMap};
use state::{Direction, Phase, SelectionState};
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::Path;
use tracing::{Level, debug, info, span, warn};
use view::{Frame, Theme, Viewport};

/// What the caller should do after an input was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Keep reading input.
    Continue,
    /// The session reached a terminal phase.
    Finish,
}

/// A running selection session.
pub struct Session {
    /// Selection state.
    state: SelectionState,
    /// Active key bindings.
    keys: KeyMap,
    /// Fixed page size from config; derived from the viewport when `None`.
    page_size: Option<usize>,
    /// Whether the full help is expanded.
    full_help: bool,
    /// Terminal height in lines.
    height: usize,
    /// Scroll position of the list.
    viewport: Viewport,
}

impl Session {
    /// Creates a session for a terminal `height` lines tall.
    #[must_use]
    pub fn new(state: SelectionState, keys: KeyMap, config: &Config, height: usize) -> Self {
        let mut session = Self {
            state,
            keys,
            page_size: (config.ui.page_size > 0).then_some(config.ui.page_size),
            full_help: config.ui.show_help,
            height,
            viewport: Viewport::default(),
        };
        session.relayout("");
        session
    }

    /// Read access to the selection state.
    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Consumes the session and returns its result.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::UserAborted`] unless the selection was confirmed.
    pub fn finish(self) -> Result<Vec<String>, SelectError> {
        self.state.finish()
    }

    /// Lines moved by a page up/down.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(self.viewport.height).max(1)
    }

    /// Updates the terminal height.
    pub fn resize(&mut self, height: usize, title: &str) {
        self.height = height;
        self.relayout(title);
    }

    /// Recomputes the list height and keeps the cursor in view.
    fn relayout(&mut self, title: &str) {
        let chrome = view::chrome_lines(title, &self.state, self.full_help);
        self.viewport.height = self.height.saturating_sub(chrome).max(1);
        self.viewport
            .follow(self.state.cursor(), self.state.visible_len());
    }

    /// Applies one key press.
    pub fn handle_key(&mut self, key: &KeyEvent, title: &str) -> Control {
        match self.state.phase() {
            Phase::Filtering => self.handle_filter_key(key),
            Phase::Browsing => self.handle_browse_key(key),
            Phase::Confirmed | Phase::Aborted => {}
        }
        self.relayout(title);

        if self.state.phase().is_terminal() {
            Control::Finish
        } else {
            Control::Continue
        }
    }

    /// Dispatches a bound action while browsing.
    fn handle_browse_key(&mut self, key: &KeyEvent) {
        let Some(action) = self.keys.action_for(key) else {
            if key.code == KeyCode::Esc {
                self.state.clear_filter();
            }
            return;
        };

        match action {
            Action::Quit => self.state.abort(),
            Action::Confirm => {
                self.state.confirm();
            }
            Action::Filter => self.state.enter_filter(),
            Action::HideToggle => self.state.toggle_hide_unlinked(),
            Action::Select => self.state.toggle_selection(),
            Action::Up => self.state.move_cursor(Direction::Up),
            Action::Down => self.state.move_cursor(Direction::Down),
            Action::Top => self.state.jump_top(),
            Action::Bottom => self.state.jump_bottom(),
            Action::SelectAll => self.state.select_all_visible(),
            Action::DeselectAll => self.state.deselect_all(),
            Action::PageUp => self.state.page_up(self.page_size()),
            Action::PageDown => self.state.page_down(self.page_size()),
            Action::Help => self.full_help = !self.full_help,
        }
    }

    /// Edits the filter; only abort, confirm and paging keep their binding.
    fn handle_filter_key(&mut self, key: &KeyEvent) {
        if self.keys.is(Action::Quit, key) {
            self.state.abort();
        } else if self.keys.is(Action::Confirm, key) {
            self.state.exit_filter();
        } else if key.code == KeyCode::Esc {
            self.state.clear_filter();
        } else if key.code == KeyCode::Backspace {
            self.state.pop_filter_char();
        } else if let KeyCode::Char(c) = key.code
            && !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            self.state.push_filter_char(c);
        } else if self.keys.is(Action::PageUp, key) {
            self.state.page_up(self.page_size());
        } else if self.keys.is(Action::PageDown, key) {
            self.state.page_down(self.page_size());
        }
    }

    /// Draws the current frame.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn draw(&self, out: &mut impl Write, title: &str, theme: &Theme) -> io::Result<()> {
        view::draw(
            out,
            &Frame {
                title,
                state: &self.state,
                keys: &self.keys,
                theme,
                viewport: self.viewport,
                full_help: self.full_help,
            },
        )
    }
}

/// Reads the source listing and the enabled set in parallel.
///
/// # Errors
///
/// Returns [`SelectError::Load`] if either read fails.
pub fn load(
    source_dir: &Path,
    target_dir: &Path,
) -> Result<(Vec<String>, BTreeSet<String>), SelectError> {
    let (files, enabled) = rayon::join(
        || links::list_source_files(source_dir),
        || links::enabled_set(source_dir, target_dir),
    );
    let files = files?;
    let enabled = enabled?;
    debug!(
        files = files.len(),
        enabled = enabled.len(),
        "Loaded source and target directories"
    );
    Ok((files, enabled))
}

/// Builds the initial state, refusing an empty source directory.
///
/// # Errors
///
/// Returns [`SelectError::EmptySource`] when there is nothing to choose from.
pub fn initial_state(
    source_dir: &Path,
    files: Vec<String>,
    enabled: &BTreeSet<String>,
) -> Result<SelectionState, SelectError> {
    if files.is_empty() {
        return Err(SelectError::EmptySource {
            dir: source_dir.to_path_buf(),
        });
    }
    Ok(SelectionState::new(files, enabled))
}

/// Shows the interactive list and returns the chosen names in selection order.
///
/// # Errors
///
/// - [`SelectError::UserAborted`] if the user aborted
/// - [`SelectError::EmptySource`] if the source directory has no files
/// - [`SelectError::Load`] if the directories could not be read
/// - [`SelectError::Terminal`] if the terminal could not be driven
pub fn show_file_select(
    source_dir: &Path,
    target_dir: &Path,
    title: &str,
    config: &Config,
) -> Result<Vec<String>, SelectError> {
    let span = span!(Level::DEBUG, "file_select", source = %source_dir.display(), target = %target_dir.display());
    let _enter = span.enter();

    let keys = config.key_map().unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring invalid key bindings");
        KeyMap::default()
    });
    let theme = Theme::from_config(&config.theme);

    let _guard = TerminalGuard::enter(true)?;
    let mut stdout = io::stdout();
    view::draw_loading(&mut stdout)?;

    let (files, enabled) = load(source_dir, target_dir)?;
    let state = initial_state(source_dir, files, &enabled)?;
    info!(
        choices = state.choice_count(),
        selected = state.selected_count(),
        "Starting selection"
    );

    let (_, height) = terminal::size();
    let mut session = Session::new(state, keys, config, usize::from(height));
    session.resize(usize::from(height), title);

    loop {
        session.draw(&mut stdout, title, &theme)?;
        match terminal::next_input()? {
            Input::Key(key) => {
                if session.handle_key(&key, title) == Control::Finish {
                    break;
                }
            }
            Input::Resize(_, height) => session.resize(usize::from(height), title),
        }
    }

    session.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn session(choices: &[&str], enabled: &[&str]) -> Session {
        let state = SelectionState::new(
            choices.iter().map(|s| (*s).to_string()).collect(),
            &enabled.iter().map(|s| (*s).to_string()).collect(),
        );
        Session::new(state, KeyMap::default(), &Config::default(), 24)
    }

    fn run(session: &mut Session, keys: &[KeyEvent]) -> Control {
        let mut control = Control::Continue;
        for key in keys {
            control = session.handle_key(key, "");
        }
        control
    }

    #[test]
    fn test_select_and_confirm() {
        let mut s = session(&["a.conf", "b.conf", "c.conf"], &[]);
        let control = run(
            &mut s,
            &[
                press(KeyCode::Char(' ')),
                press(KeyCode::Char('j')),
                press(KeyCode::Char('j')),
                press(KeyCode::Char(' ')),
                press(KeyCode::Enter),
            ],
        );
        assert_eq!(control, Control::Finish);
        assert_eq!(s.finish().unwrap(), vec!["a.conf", "c.conf"]);
    }

    #[test]
    fn test_filter_keys_are_typed_not_bound() {
        let mut s = session(&["hosts", "jobs", "kube"], &[]);
        run(
            &mut s,
            &[
                press(KeyCode::Char('/')),
                press(KeyCode::Char('j')),
                press(KeyCode::Char('o')),
            ],
        );
        assert_eq!(s.state().filter_text(), "jo");
        assert_eq!(s.state().visible().collect::<Vec<_>>(), ["jobs"]);

        // Enter leaves filter mode; a second Enter confirms.
        run(&mut s, &[press(KeyCode::Enter)]);
        assert_eq!(s.state().phase(), Phase::Browsing);
        assert_eq!(s.state().filter_text(), "jo");
        assert_eq!(run(&mut s, &[press(KeyCode::Enter)]), Control::Finish);
    }

    #[test]
    fn test_ctrl_c_in_filter_mode_aborts_session() {
        let mut s = session(&["a", "b"], &["a"]);
        let control = run(&mut s, &[press(KeyCode::Char('/')), ctrl('c')]);
        assert_eq!(control, Control::Finish);
        assert!(s.finish().unwrap_err().is_abort());
    }

    #[test]
    fn test_esc_clears_filter() {
        let mut s = session(&["alpha", "beta"], &[]);
        run(
            &mut s,
            &[
                press(KeyCode::Char('/')),
                press(KeyCode::Char('b')),
                press(KeyCode::Enter),
            ],
        );
        assert_eq!(s.state().visible_len(), 1);

        run(&mut s, &[press(KeyCode::Esc)]);
        assert_eq!(s.state().filter_text(), "");
        assert_eq!(s.state().visible_len(), 2);
    }

    #[test]
    fn test_hide_toggle_and_bulk_keys() {
        let mut s = session(&["a", "b", "c"], &["b"]);
        run(&mut s, &[press(KeyCode::Char('h'))]);
        assert_eq!(s.state().visible().collect::<Vec<_>>(), ["b"]);

        run(&mut s, &[ctrl('d')]);
        assert!(!s.state().hide_unlinked());
        assert_eq!(s.state().selected_count(), 0);

        run(&mut s, &[ctrl('a')]);
        assert_eq!(s.state().selection_order(), ["a", "b", "c"]);
    }

    #[test]
    fn test_paging_uses_viewport_height() {
        let names: Vec<String> = (0..100).map(|i| format!("file{i:03}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut s = session(&refs, &[]);
        let page = s.page_size();
        assert_eq!(page, 22);

        run(&mut s, &[press(KeyCode::PageDown)]);
        assert_eq!(s.state().cursor(), page);
        run(&mut s, &[press(KeyCode::Char('G'))]);
        assert_eq!(s.state().cursor(), 99);
        run(&mut s, &[ctrl('b')]);
        assert_eq!(s.state().cursor(), 99 - page);
    }

    #[test]
    fn test_configured_page_size() {
        let mut config = Config::default();
        config.ui.page_size = 5;
        let state = SelectionState::new(
            (0..20).map(|i| i.to_string()).collect(),
            &BTreeSet::new(),
        );
        let mut s = Session::new(state, KeyMap::default(), &config, 24);
        run(&mut s, &[press(KeyCode::PageDown)]);
        assert_eq!(s.state().cursor(), 5);
    }

    #[test]
    fn test_help_toggle_shrinks_list() {
        let mut s = session(&["a"], &[]);
        let before = s.page_size();
        run(&mut s, &[press(KeyCode::Char('?'))]);
        assert_eq!(s.page_size(), before - 2);
    }

    #[test]
    fn test_initial_state_rejects_empty_source() {
        let err = initial_state(Path::new("/srv/empty"), Vec::new(), &BTreeSet::new()).unwrap_err();
        assert!(matches!(err, SelectError::EmptySource { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_load_joins_both_reads() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("available");
        let target = dir.path().join("enabled");
        std::fs::create_dir(&source).unwrap();
        std::fs::create_dir(&target).unwrap();
        std::fs::write(source.join("one"), "1").unwrap();
        std::fs::write(source.join("two"), "2").unwrap();
        std::os::unix::fs::symlink("../available/two", target.join("two")).unwrap();

        let (files, enabled) = load(&source, &target).unwrap();
        assert_eq!(files, ["one", "two"]);
        assert_eq!(enabled.into_iter().collect::<Vec<_>>(), ["two"]);

        let err = load(&source, &dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, SelectError::Load(_)));
    }
}
