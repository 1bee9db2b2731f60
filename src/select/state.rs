//! In-memory state of one interactive selection session.
//!
//! The state is driven one input at a time. Every mutation that can change
//! what is shown (filter text, hide mode, the selected set) rebuilds the
//! visible sequence immediately and re-clamps the cursor, so readers never
//! observe a stale view.

use crate::error::SelectError;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Where the session is in its lifecycle.
///
/// Loading happens before a `SelectionState` exists; the state starts in
/// [`Phase::Browsing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Interactive steady state.
    Browsing,
    /// Typing into the filter; cursor movement is suspended.
    Filtering,
    /// The user accepted the selection.
    Confirmed,
    /// The user aborted the session.
    Aborted,
}

impl Phase {
    /// Returns true once the session has ended.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Aborted)
    }
}

/// Direction of a single-step cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the start of the list.
    Up,
    /// Towards the end of the list.
    Down,
}

/// Selection, cursor, filter and hide-mode state for one session.
#[derive(Debug, Clone)]
pub struct SelectionState {
    /// All candidate names, in directory order. Fixed for the session.
    choices: Vec<String>,
    /// Currently selected names.
    selected: HashSet<String>,
    /// Selected names in the order they were chosen.
    order: Vec<String>,
    /// Index into `visible`.
    cursor: usize,
    /// Case-insensitive substring filter; empty means no filter.
    filter: String,
    /// Restrict the view to selected names.
    hide_unlinked: bool,
    /// Lifecycle phase.
    phase: Phase,
    /// Indices into `choices` that are currently shown.
    visible: Vec<usize>,
}

impl SelectionState {
    /// Creates a session over `choices` with `enabled` preselected.
    ///
    /// Enabled names are recorded in `choices` order; enabled names that are
    /// not among the choices follow in sorted order so they survive a
    /// confirm unchanged.
    #[must_use]
    pub fn new(choices: Vec<String>, enabled: &BTreeSet<String>) -> Self {
        let mut order: Vec<String> = choices
            .iter()
            .filter(|name| enabled.contains(*name))
            .cloned()
            .collect();
        let listed: HashSet<&str> = choices.iter().map(String::as_str).collect();
        order.extend(
            enabled
                .iter()
                .filter(|name| !listed.contains(name.as_str()))
                .cloned(),
        );

        let mut state = Self {
            selected: order.iter().cloned().collect(),
            order,
            choices,
            cursor: 0,
            filter: String::new(),
            hide_unlinked: false,
            phase: Phase::Browsing,
            visible: Vec::new(),
        };
        state.rebuild_visible();
        state
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Cursor position within the visible sequence.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current filter text.
    #[must_use]
    pub fn filter_text(&self) -> &str {
        &self.filter
    }

    /// Whether only selected names are shown.
    #[must_use]
    pub const fn hide_unlinked(&self) -> bool {
        self.hide_unlinked
    }

    /// Number of candidate names.
    #[must_use]
    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }

    /// Number of selected names.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Whether `name` is selected.
    #[must_use]
    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    /// Selected names in the order they were chosen.
    #[must_use]
    pub fn selection_order(&self) -> &[String] {
        &self.order
    }

    /// Number of names currently shown.
    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// The names currently shown, in directory order.
    pub fn visible(&self) -> impl Iterator<Item = &str> + '_ {
        self.visible.iter().map(|&i| self.choices[i].as_str())
    }

    /// The visible name at `index`, if any.
    #[must_use]
    pub fn visible_name(&self, index: usize) -> Option<&str> {
        self.visible.get(index).map(|&i| self.choices[i].as_str())
    }

    /// The name under the cursor, if the visible sequence is not empty.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.visible_name(self.cursor)
    }

    /// Recomputes the visible sequence and clamps the cursor.
    fn rebuild_visible(&mut self) {
        let needle = self.filter.to_lowercase();
        self.visible = self
            .choices
            .iter()
            .enumerate()
            .filter(|(_, name)| needle.is_empty() || name.to_lowercase().contains(&needle))
            .filter(|(_, name)| !self.hide_unlinked || self.selected.contains(name.as_str()))
            .map(|(i, _)| i)
            .collect();
        self.clamp_cursor();
    }

    /// Keeps the cursor inside the visible sequence.
    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.visible.len().saturating_sub(1));
    }

    /// True if at least one listed item is selected.
    ///
    /// Enabled names outside the listing count for the result but never
    /// appear as rows.
    fn any_choice_selected(&self) -> bool {
        self.choices.iter().any(|c| self.selected.contains(c.as_str()))
    }

    /// Moves the cursor onto `name` if it is visible, else keeps it clamped.
    fn focus(&mut self, name: Option<&str>) {
        let Some(name) = name else {
            return;
        };
        let found = self.visible().position(|n| n == name);
        if let Some(index) = found {
            self.cursor = index;
        } else {
            debug!(name = %name, "Item no longer visible, cursor clamped");
        }
    }

    /// Moves the cursor one step, without wrapping. No-op while filtering.
    pub fn move_cursor(&mut self, direction: Direction) {
        if self.phase != Phase::Browsing {
            return;
        }
        match direction {
            Direction::Up => self.cursor = self.cursor.saturating_sub(1),
            Direction::Down => {
                self.cursor = (self.cursor + 1).min(self.visible.len().saturating_sub(1));
            }
        }
    }

    /// Moves the cursor to the first visible item. No-op while filtering.
    pub fn jump_top(&mut self) {
        if self.phase == Phase::Browsing {
            self.cursor = 0;
        }
    }

    /// Moves the cursor to the last visible item. No-op while filtering.
    pub fn jump_bottom(&mut self) {
        if self.phase == Phase::Browsing {
            self.cursor = self.visible.len().saturating_sub(1);
        }
    }

    /// Moves the cursor up by `page_size`, stopping at the first item.
    pub fn page_up(&mut self, page_size: usize) {
        if !self.phase.is_terminal() {
            self.cursor = self.cursor.saturating_sub(page_size);
        }
    }

    /// Moves the cursor down by `page_size`, stopping at the last item.
    pub fn page_down(&mut self, page_size: usize) {
        if !self.phase.is_terminal() {
            self.cursor = self
                .cursor
                .saturating_add(page_size)
                .min(self.visible.len().saturating_sub(1));
        }
    }

    /// Selects or deselects the item under the cursor.
    ///
    /// Deselecting the last selected item while hide mode is on turns hide
    /// mode off, so the list never becomes empty by construction. The cursor
    /// stays on the toggled item when it is still visible.
    pub fn toggle_selection(&mut self) {
        let Some(name) = self.current().map(str::to_owned) else {
            return;
        };

        if self.selected.remove(&name) {
            self.order.retain(|n| n != &name);
            if self.hide_unlinked && !self.any_choice_selected() {
                debug!("Last item deselected, leaving hide mode");
                self.hide_unlinked = false;
            }
        } else {
            self.selected.insert(name.clone());
            self.order.push(name.clone());
        }

        self.rebuild_visible();
        self.focus(Some(&name));
        debug!(name = %name, selected = self.selected.len(), "Toggled selection");
    }

    /// Selects every visible item that is not selected yet, in view order.
    pub fn select_all_visible(&mut self) {
        let current = self.current().map(str::to_owned);
        let before = self.selected.len();

        for &i in &self.visible {
            let name = &self.choices[i];
            if self.selected.insert(name.clone()) {
                self.order.push(name.clone());
            }
        }

        self.rebuild_visible();
        self.focus(current.as_deref());
        debug!(added = self.selected.len() - before, "Selected all visible");
    }

    /// Clears the whole selection and leaves hide mode.
    pub fn deselect_all(&mut self) {
        let current = self.current().map(str::to_owned);

        self.selected.clear();
        self.order.clear();
        self.hide_unlinked = false;

        self.rebuild_visible();
        self.focus(current.as_deref());
        debug!("Deselected all");
    }

    /// Flips hide mode, keeping the cursor on the same item where possible.
    ///
    /// Does nothing while no listed item is selected.
    pub fn toggle_hide_unlinked(&mut self) {
        if !self.any_choice_selected() {
            return;
        }
        let current = self.current().map(str::to_owned);

        self.hide_unlinked = !self.hide_unlinked;

        self.rebuild_visible();
        self.focus(current.as_deref());
        debug!(hide_unlinked = self.hide_unlinked, "Toggled hide mode");
    }

    /// Starts editing the filter. Existing filter text is kept for refining.
    pub fn enter_filter(&mut self) {
        if self.phase == Phase::Browsing {
            self.phase = Phase::Filtering;
            debug!(filter = %self.filter, "Entered filter mode");
        }
    }

    /// Stops editing the filter and keeps it applied.
    pub fn exit_filter(&mut self) {
        if self.phase == Phase::Filtering {
            self.phase = Phase::Browsing;
            debug!(filter = %self.filter, "Exited filter mode");
        }
    }

    /// Removes the filter and, if editing it, leaves filter mode.
    pub fn clear_filter(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        if self.phase == Phase::Filtering {
            self.phase = Phase::Browsing;
        }
        if !self.filter.is_empty() {
            self.filter.clear();
            self.rebuild_visible();
        }
    }

    /// Appends a character to the filter while editing it.
    pub fn push_filter_char(&mut self, c: char) {
        if self.phase == Phase::Filtering {
            self.filter.push(c);
            self.rebuild_visible();
        }
    }

    /// Deletes the last filter character; on an empty filter, leaves filter mode.
    pub fn pop_filter_char(&mut self) {
        if self.phase != Phase::Filtering {
            return;
        }
        if self.filter.pop().is_some() {
            self.rebuild_visible();
        } else {
            self.phase = Phase::Browsing;
        }
    }

    /// Accepts the selection. Only possible outside filter mode.
    ///
    /// Returns whether the session was confirmed.
    pub fn confirm(&mut self) -> bool {
        if self.phase == Phase::Browsing {
            self.phase = Phase::Confirmed;
            debug!(selected = self.order.len(), "Confirmed selection");
            true
        } else {
            false
        }
    }

    /// Aborts the session from any non-terminal phase.
    pub fn abort(&mut self) {
        if !self.phase.is_terminal() {
            self.phase = Phase::Aborted;
            debug!("Session aborted");
        }
    }

    /// Consumes the state and returns the session result.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::UserAborted`] unless the session was confirmed.
    pub fn finish(self) -> Result<Vec<String>, SelectError> {
        match self.phase {
            Phase::Confirmed => Ok(self.order),
            Phase::Browsing | Phase::Filtering | Phase::Aborted => Err(SelectError::UserAborted),
        }
    }
}
