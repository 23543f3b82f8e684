//! Single-select dropdown that works the same with keyboard and mouse.
//!
//! The widget only owns transient view state (open/closed, highlighted row,
//! scroll position). The selected value lives with the screen and is passed in
//! on every query, and commits are returned to the caller rather than applied.

use crossterm::event::KeyCode;
use std::cell::Cell;
use std::collections::HashSet;
use std::ops::Range;
use thiserror::Error;

/// One selectable entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComboBoxError {
    /// Two options share a value, so a commit would be ambiguous
    #[error("Duplicate option value '{0}'")]
    DuplicateValue(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComboState {
    #[default]
    Closed,
    Open {
        highlighted: Option<usize>,
    },
}

/// What an interaction did
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComboOutcome {
    /// Not meant for this widget; the caller may handle it
    Ignored,
    /// View state changed (or the input was swallowed) without a commit
    Handled,
    /// The user committed this option value
    Committed(String),
}

impl ComboOutcome {
    pub fn committed(self) -> Option<String> {
        match self {
            Self::Committed(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupKind {
    Listbox,
}

/// Accessibility state of the trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerSemantics {
    pub popup: PopupKind,
    pub expanded: bool,
}

/// Accessibility state of one option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSemantics {
    pub selected: bool,
}

#[derive(Debug)]
pub struct ComboBox {
    options: Vec<SelectOption>,
    placeholder: String,
    state: ComboState,
    /// First option row shown in the open list
    scroll: Cell<usize>,
}

impl ComboBox {
    pub fn new(
        options: Vec<SelectOption>,
        placeholder: impl Into<String>,
    ) -> Result<Self, ComboBoxError> {
        let mut seen = HashSet::new();
        if let Some(duplicate) = options.iter().find(|o| !seen.insert(o.value.as_str())) {
            return Err(ComboBoxError::DuplicateValue(duplicate.value.clone()));
        }

        Ok(Self {
            options,
            placeholder: placeholder.into(),
            state: ComboState::Closed,
            scroll: Cell::new(0),
        })
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn state(&self) -> ComboState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ComboState::Open { .. })
    }

    pub fn highlighted(&self) -> Option<usize> {
        match self.state {
            ComboState::Open { highlighted } => highlighted,
            ComboState::Closed => None,
        }
    }

    /// Pointer press on the trigger: opens with nothing highlighted, or closes
    /// an open list without committing
    pub fn click_trigger(&mut self) -> ComboOutcome {
        self.state = match self.state {
            ComboState::Closed => {
                self.scroll.set(0);
                ComboState::Open { highlighted: None }
            }
            ComboState::Open { .. } => ComboState::Closed,
        };
        ComboOutcome::Handled
    }

    /// Keyboard input while the trigger has focus
    pub fn handle_key(&mut self, key: KeyCode) -> ComboOutcome {
        match self.state {
            ComboState::Closed => match key {
                KeyCode::Down | KeyCode::Enter | KeyCode::Char(' ') => {
                    self.scroll.set(0);
                    self.state = ComboState::Open {
                        highlighted: Some(0),
                    };
                    ComboOutcome::Handled
                }
                _ => ComboOutcome::Ignored,
            },
            ComboState::Open { highlighted } => match key {
                KeyCode::Down => {
                    self.set_highlight(self.step_down(highlighted));
                    ComboOutcome::Handled
                }
                KeyCode::Up => {
                    self.set_highlight(self.step_up(highlighted));
                    ComboOutcome::Handled
                }
                KeyCode::Enter => self.commit(highlighted.unwrap_or(0)),
                KeyCode::Esc => {
                    self.state = ComboState::Closed;
                    ComboOutcome::Handled
                }
                _ => ComboOutcome::Ignored,
            },
        }
    }

    /// Pointer moved over option `index`
    pub fn hover(&mut self, index: usize) -> ComboOutcome {
        if self.is_open() && index < self.options.len() {
            self.set_highlight(Some(index));
            ComboOutcome::Handled
        } else {
            ComboOutcome::Ignored
        }
    }

    /// Pointer press on option `index`
    pub fn press(&mut self, index: usize) -> ComboOutcome {
        if self.is_open() {
            self.commit(index)
        } else {
            ComboOutcome::Ignored
        }
    }

    /// Close without committing (focus left, click outside)
    pub fn dismiss(&mut self) {
        self.state = ComboState::Closed;
    }

    /// Option rows to draw for a list `visible_rows` tall, scrolled just
    /// enough to keep the highlighted row in view
    pub fn visible_window(&self, visible_rows: usize) -> Range<usize> {
        let len = self.options.len();
        if visible_rows == 0 || len == 0 {
            return 0..0;
        }

        let mut start = self.scroll.get().min(len.saturating_sub(visible_rows));
        if let Some(h) = self.highlighted() {
            if h < start {
                start = h;
            } else if h >= start + visible_rows {
                start = h + 1 - visible_rows;
            }
        }
        self.scroll.set(start);
        start..(start + visible_rows).min(len)
    }

    pub fn selected_index(&self, selected: Option<&str>) -> Option<usize> {
        let selected = selected?;
        self.options.iter().position(|o| o.value == selected)
    }

    /// Label for the trigger: the selected option's label or the placeholder
    pub fn display_label(&self, selected: Option<&str>) -> &str {
        self.selected_index(selected)
            .map(|i| self.options[i].label.as_str())
            .unwrap_or(&self.placeholder)
    }

    pub fn has_selection(&self, selected: Option<&str>) -> bool {
        self.selected_index(selected).is_some()
    }

    pub fn trigger_semantics(&self) -> TriggerSemantics {
        TriggerSemantics {
            popup: PopupKind::Listbox,
            expanded: self.is_open(),
        }
    }

    pub fn option_semantics(&self, index: usize, selected: Option<&str>) -> OptionSemantics {
        OptionSemantics {
            selected: self
                .options
                .get(index)
                .is_some_and(|o| Some(o.value.as_str()) == selected),
        }
    }

    fn step_down(&self, highlighted: Option<usize>) -> Option<usize> {
        let last = self.options.len().checked_sub(1)?;
        Some(highlighted.map_or(0, |h| h + 1).min(last))
    }

    fn step_up(&self, highlighted: Option<usize>) -> Option<usize> {
        if self.options.is_empty() {
            return None;
        }
        Some(highlighted.map_or(0, |h| h.saturating_sub(1)))
    }

    fn set_highlight(&mut self, highlighted: Option<usize>) {
        self.state = ComboState::Open { highlighted };
    }

    /// Close and report the option at `index`; out-of-range commits nothing
    fn commit(&mut self, index: usize) -> ComboOutcome {
        self.state = ComboState::Closed;
        match self.options.get(index) {
            Some(option) => {
                tracing::debug!("Option committed: {}", option.value);
                ComboOutcome::Committed(option.value.clone())
            }
            None => ComboOutcome::Handled,
        }
    }
}
