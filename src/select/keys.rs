//! Key bindings for the selection list.
//!
//! Bindings are written as short strings such as `"ctrl+a"`, `"pgdown"` or
//! `"G"` and can be overridden per action from the `[keys]` config table.

use anyhow::{Result, anyhow, bail};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::BTreeMap;

/// Something the user can ask the selection list to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    /// Abort the whole session.
    Quit,
    /// Accept the selection, or leave filter mode.
    Confirm,
    /// Start editing the filter.
    Filter,
    /// Show only linked items, or everything.
    HideToggle,
    /// Select or deselect the item under the cursor.
    Select,
    /// Cursor up one line.
    Up,
    /// Cursor down one line.
    Down,
    /// Cursor to the first item.
    Top,
    /// Cursor to the last item.
    Bottom,
    /// Select every visible item.
    SelectAll,
    /// Clear the selection.
    DeselectAll,
    /// Cursor up one page.
    PageUp,
    /// Cursor down one page.
    PageDown,
    /// Expand or collapse the help bar.
    Help,
}

impl Action {
    /// Every action, in help-bar order.
    pub const ALL: [Self; 14] = [
        Self::Select,
        Self::HideToggle,
        Self::Filter,
        Self::Confirm,
        Self::Up,
        Self::Down,
        Self::Top,
        Self::Bottom,
        Self::PageUp,
        Self::PageDown,
        Self::SelectAll,
        Self::DeselectAll,
        Self::Quit,
        Self::Help,
    ];

    /// Name used in the `[keys]` config table.
    #[must_use]
    pub const fn config_name(self) -> &'static str {
        match self {
            Self::Quit => "quit",
            Self::Confirm => "confirm",
            Self::Filter => "filter",
            Self::HideToggle => "hide_toggle",
            Self::Select => "select",
            Self::Up => "up",
            Self::Down => "down",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::SelectAll => "select_all",
            Self::DeselectAll => "deselect_all",
            Self::PageUp => "page_up",
            Self::PageDown => "page_down",
            Self::Help => "help",
        }
    }

    /// Looks an action up by its config name.
    #[must_use]
    pub fn from_config_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.config_name() == name)
    }

    /// Short description shown in the help bar.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Quit => "abort",
            Self::Confirm => "confirm",
            Self::Filter => "filter",
            Self::HideToggle => "toggle",
            Self::Select => "select",
            Self::Up => "up",
            Self::Down => "down",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::SelectAll => "select all",
            Self::DeselectAll => "deselect all",
            Self::PageUp => "page up",
            Self::PageDown => "page down",
            Self::Help => "more",
        }
    }

    /// Default key strings.
    #[must_use]
    pub const fn default_keys(self) -> &'static [&'static str] {
        match self {
            Self::Quit => &["ctrl+c"],
            Self::Confirm => &["enter"],
            Self::Filter => &["/"],
            Self::HideToggle => &["h"],
            Self::Select => &["space"],
            Self::Up => &["up", "k"],
            Self::Down => &["down", "j"],
            Self::Top => &["g"],
            Self::Bottom => &["G"],
            Self::SelectAll => &["ctrl+a"],
            Self::DeselectAll => &["ctrl+d"],
            Self::PageUp => &["pgup", "ctrl+b"],
            Self::PageDown => &["pgdown", "ctrl+f"],
            Self::Help => &["?"],
        }
    }
}

/// A single key chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    /// Key code.
    code: KeyCode,
    /// Control/Alt modifiers. Shift is implied by the character itself.
    modifiers: KeyModifiers,
}

impl KeyChord {
    /// Parses a key string such as `"ctrl+a"`, `"pgdown"`, `"space"` or `"G"`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown key names and modifiers.
    pub fn parse(text: &str) -> Result<Self> {
        if text == " " {
            return Ok(Self::plain(KeyCode::Char(' ')));
        }

        let mut modifiers = KeyModifiers::NONE;
        let mut rest = text;
        loop {
            if let Some(tail) = rest.strip_prefix("ctrl+") {
                modifiers |= KeyModifiers::CONTROL;
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("alt+") {
                modifiers |= KeyModifiers::ALT;
                rest = tail;
            } else {
                break;
            }
        }

        let code = match rest {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pgup" | "pageup" => KeyCode::PageUp,
            "pgdown" | "pagedown" => KeyCode::PageDown,
            "enter" => KeyCode::Enter,
            "esc" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "space" => KeyCode::Char(' '),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => bail!("Unknown key: {text}"),
                }
            }
        };

        Ok(Self { code, modifiers })
    }

    /// A chord without modifiers.
    const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Whether a terminal key event is this chord.
    #[must_use]
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let relevant = event.modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT);
        if relevant != self.modifiers {
            return false;
        }
        match (self.code, event.code) {
            // Some terminals report ctrl+letter in upper case.
            (KeyCode::Char(a), KeyCode::Char(b)) if !self.modifiers.is_empty() => {
                a.eq_ignore_ascii_case(&b)
            }
            (a, b) => a == b,
        }
    }
}

/// Resolved bindings for every [`Action`].
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Chords and the key strings they were parsed from, per action.
    bindings: BTreeMap<Action, Vec<(KeyChord, String)>>,
}

impl KeyMap {
    /// Builds a key map from the defaults with per-action overrides.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown action name or key string.
    pub fn with_overrides(overrides: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut bindings = BTreeMap::new();
        for action in Action::ALL {
            let keys = action
                .default_keys()
                .iter()
                .map(|k| Ok((KeyChord::parse(k)?, (*k).to_string())))
                .collect::<Result<Vec<_>>>()?;
            bindings.insert(action, keys);
        }

        for (name, keys) in overrides {
            let action = Action::from_config_name(name)
                .ok_or_else(|| anyhow!("Unknown key binding action: {name}"))?;
            let parsed = keys
                .iter()
                .map(|k| Ok((KeyChord::parse(k)?, k.clone())))
                .collect::<Result<Vec<_>>>()?;
            bindings.insert(action, parsed);
        }

        Ok(Self { bindings })
    }

    /// The first action bound to `event`, in [`Action::ALL`] order.
    #[must_use]
    pub fn action_for(&self, event: &KeyEvent) -> Option<Action> {
        Action::ALL.into_iter().find(|action| self.is(*action, event))
    }

    /// Whether `event` is bound to `action`.
    #[must_use]
    pub fn is(&self, action: Action, event: &KeyEvent) -> bool {
        self.bindings
            .get(&action)
            .is_some_and(|keys| keys.iter().any(|(chord, _)| chord.matches(event)))
    }

    /// Help-bar label for the keys of `action`, e.g. `"↑/k"`.
    #[must_use]
    pub fn label(&self, action: Action) -> String {
        self.bindings
            .get(&action)
            .map(|keys| {
                keys.iter()
                    .map(|(_, text)| match text.as_str() {
                        " " => "space",
                        "up" => "↑",
                        "down" => "↓",
                        other => other,
                    })
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        let bindings = Action::ALL
            .into_iter()
            .map(|action| {
                let keys = action
                    .default_keys()
                    .iter()
                    .filter_map(|k| KeyChord::parse(k).ok().map(|c| (c, (*k).to_string())))
                    .collect();
                (action, keys)
            })
            .collect();
        Self { bindings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[rstest]
    #[case(key(KeyCode::Char('c'), KeyModifiers::CONTROL), Action::Quit)]
    #[case(key(KeyCode::Enter, KeyModifiers::NONE), Action::Confirm)]
    #[case(key(KeyCode::Char('/'), KeyModifiers::NONE), Action::Filter)]
    #[case(key(KeyCode::Char('h'), KeyModifiers::NONE), Action::HideToggle)]
    #[case(key(KeyCode::Char(' '), KeyModifiers::NONE), Action::Select)]
    #[case(key(KeyCode::Char('k'), KeyModifiers::NONE), Action::Up)]
    #[case(key(KeyCode::Down, KeyModifiers::NONE), Action::Down)]
    #[case(key(KeyCode::Char('g'), KeyModifiers::NONE), Action::Top)]
    #[case(key(KeyCode::Char('G'), KeyModifiers::SHIFT), Action::Bottom)]
    #[case(key(KeyCode::Char('a'), KeyModifiers::CONTROL), Action::SelectAll)]
    #[case(key(KeyCode::Char('d'), KeyModifiers::CONTROL), Action::DeselectAll)]
    #[case(key(KeyCode::PageUp, KeyModifiers::NONE), Action::PageUp)]
    #[case(key(KeyCode::Char('f'), KeyModifiers::CONTROL), Action::PageDown)]
    #[case(key(KeyCode::Char('?'), KeyModifiers::SHIFT), Action::Help)]
    fn test_default_bindings(#[case] event: KeyEvent, #[case] expected: Action) {
        let keys = KeyMap::default();
        assert_eq!(keys.action_for(&event), Some(expected));
    }

    #[test]
    fn test_plain_char_is_not_ctrl_chord() {
        let keys = KeyMap::default();
        let plain_a = key(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(keys.action_for(&plain_a), None);
        let ctrl_h = key(KeyCode::Char('h'), KeyModifiers::CONTROL);
        assert_eq!(keys.action_for(&ctrl_h), None);
    }

    #[test]
    fn test_parse_key_strings() {
        assert_eq!(
            KeyChord::parse("ctrl+x").unwrap(),
            KeyChord {
                code: KeyCode::Char('x'),
                modifiers: KeyModifiers::CONTROL
            }
        );
        assert_eq!(KeyChord::parse(" ").unwrap(), KeyChord::plain(KeyCode::Char(' ')));
        assert_eq!(KeyChord::parse("pgdown").unwrap(), KeyChord::plain(KeyCode::PageDown));
        assert!(KeyChord::parse("hyper+x").is_err());
        assert!(KeyChord::parse("nope").is_err());
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let mut overrides = BTreeMap::new();
        overrides.insert("select".to_string(), vec!["x".to_string()]);
        let keys = KeyMap::with_overrides(&overrides).unwrap();

        assert_eq!(
            keys.action_for(&key(KeyCode::Char('x'), KeyModifiers::NONE)),
            Some(Action::Select)
        );
        assert_eq!(keys.action_for(&key(KeyCode::Char(' '), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_unknown_action_rejected() {
        let mut overrides = BTreeMap::new();
        overrides.insert("explode".to_string(), vec!["x".to_string()]);
        let err = KeyMap::with_overrides(&overrides).unwrap_err();
        assert!(err.to_string().contains("explode"));
    }

    #[test]
    fn test_labels() {
        let keys = KeyMap::default();
        assert_eq!(keys.label(Action::Up), "↑/k");
        assert_eq!(keys.label(Action::Select), "space");
        assert_eq!(keys.label(Action::PageDown), "pgdown/ctrl+f");
    }
}
