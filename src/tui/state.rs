use super::combobox::{ComboBox, ComboBoxError, SelectOption};
use crate::app::state::AppState;
use crate::period::{last_months, Period};
use crate::picker::{SelectionState, MONTHLY_REPORT, PDF_FORMAT};
use crate::util::i18n::LocalizationManager;
use chrono::{DateTime, TimeZone};
use ratatui::layout::Rect;
use std::cell::RefCell;
use std::sync::Arc;

/// Focusable element on the picker screen, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    DocumentType,
    Format,
    Period,
    Action,
}

impl FocusTarget {
    /// The three comboboxes (everything except the action button)
    pub fn controls() -> [Self; 3] {
        [Self::DocumentType, Self::Format, Self::Period]
    }

    pub fn next(self) -> Self {
        match self {
            Self::DocumentType => Self::Format,
            Self::Format => Self::Period,
            Self::Period => Self::Action,
            Self::Action => Self::DocumentType,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::DocumentType => Self::Action,
            Self::Format => Self::DocumentType,
            Self::Period => Self::Format,
            Self::Action => Self::Period,
        }
    }

    /// Translation key for the field label
    pub fn label_key(self) -> &'static str {
        match self {
            Self::DocumentType => "field-type",
            Self::Format => "field-format",
            Self::Period => "field-period",
            Self::Action => "action-download",
        }
    }
}

/// Clickable regions for hit detection (updated each render)
#[derive(Debug, Clone, Default)]
pub struct ClickableRegions {
    pub triggers: Vec<(FocusTarget, Rect)>,
    pub button: Option<Rect>,
    /// Open list including its border
    pub listbox: Option<Rect>,
    pub options: Vec<(usize, Rect)>, // (option index, rect) pairs
}

/// TUI application state
pub struct TuiState {
    /// Reference to app state (config, etc.)
    pub app_state: AppState,

    /// Internationalization manager
    pub i18n: Arc<LocalizationManager>,

    /// Durable choices and download-attempt flags
    pub selection: SelectionState,

    /// Month windows generated once when the screen was built
    periods: Vec<Period>,

    document_type: ComboBox,
    format: ComboBox,
    period: ComboBox,

    pub focus: FocusTarget,

    /// Clickable regions for mouse hit detection (updated each render)
    pub click_regions: RefCell<ClickableRegions>,

    /// Dirty flag: true if UI needs to be redrawn
    needs_redraw: bool,
}

impl TuiState {
    /// Build the screen. `now` is read once by the caller and anchors the
    /// period list for the lifetime of the screen.
    pub fn new<Tz: TimeZone>(app_state: AppState, now: &DateTime<Tz>) -> Result<Self, ComboBoxError> {
        let i18n = app_state.i18n.clone();
        let placeholder = i18n.get("combo-placeholder");

        let periods = last_months(now, app_state.config.picker.period_count);

        let document_type = ComboBox::new(
            vec![SelectOption::new(MONTHLY_REPORT, i18n.get("option-type-monthly"))],
            placeholder.clone(),
        )?;
        let format = ComboBox::new(
            vec![SelectOption::new(PDF_FORMAT, i18n.get("option-format-pdf"))],
            placeholder.clone(),
        )?;
        let period = ComboBox::new(
            periods
                .iter()
                .map(|p| SelectOption::new(p.key().to_string(), p.label()))
                .collect(),
            placeholder,
        )?;

        tracing::debug!(
            "Picker screen built with {} periods (newest {:?})",
            periods.len(),
            periods.first().map(|p| p.key().to_string())
        );

        Ok(Self {
            selection: SelectionState::new(MONTHLY_REPORT, PDF_FORMAT, i18n.clone()),
            app_state,
            i18n,
            periods,
            document_type,
            format,
            period,
            focus: FocusTarget::default(),
            click_regions: RefCell::new(ClickableRegions::default()),
            needs_redraw: true, // Initial render needed
        })
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn combo(&self, target: FocusTarget) -> Option<&ComboBox> {
        match target {
            FocusTarget::DocumentType => Some(&self.document_type),
            FocusTarget::Format => Some(&self.format),
            FocusTarget::Period => Some(&self.period),
            FocusTarget::Action => None,
        }
    }

    pub fn combo_mut(&mut self, target: FocusTarget) -> Option<&mut ComboBox> {
        match target {
            FocusTarget::DocumentType => Some(&mut self.document_type),
            FocusTarget::Format => Some(&mut self.format),
            FocusTarget::Period => Some(&mut self.period),
            FocusTarget::Action => None,
        }
    }

    /// The control whose list is open, if any (at most one at a time)
    pub fn open_control(&self) -> Option<FocusTarget> {
        FocusTarget::controls()
            .into_iter()
            .find(|&target| self.combo(target).is_some_and(ComboBox::is_open))
    }

    /// Current value shown by a control
    pub fn selected_value(&self, target: FocusTarget) -> Option<&str> {
        match target {
            FocusTarget::DocumentType => Some(self.selection.document_type()),
            FocusTarget::Format => Some(self.selection.format()),
            FocusTarget::Period => self.selection.period_key(),
            FocusTarget::Action => None,
        }
    }

    /// Forward a committed option value to the selection
    pub fn apply_commit(&mut self, target: FocusTarget, value: String) {
        match target {
            FocusTarget::DocumentType => self.selection.set_document_type(value),
            FocusTarget::Format => self.selection.set_format(value),
            FocusTarget::Period => self.selection.set_period(value),
            FocusTarget::Action => {}
        }
    }

    /// Move focus; any list left open elsewhere is dismissed
    pub fn set_focus(&mut self, target: FocusTarget) {
        for control in FocusTarget::controls() {
            if control != target {
                if let Some(combo) = self.combo_mut(control) {
                    combo.dismiss();
                }
            }
        }
        if self.focus != target {
            tracing::trace!("Focus moved from {:?} to {:?}", self.focus, target);
        }
        self.focus = target;
    }

    pub fn focus_next(&mut self) {
        self.set_focus(self.focus.next());
    }

    pub fn focus_prev(&mut self) {
        self.set_focus(self.focus.prev());
    }

    pub fn dismiss_open_list(&mut self) {
        if let Some(target) = self.open_control() {
            if let Some(combo) = self.combo_mut(target) {
                combo.dismiss();
            }
        }
    }

    /// The generated period matching the selected key
    pub fn selected_period(&self) -> Option<&Period> {
        let key = self.selection.period_key()?;
        self.periods.iter().find(|p| p.key().to_string() == key)
    }

    /// Get translated string
    pub fn t(&self, key: &str) -> String {
        self.i18n.get(key)
    }

    /// Get translated string with arguments
    pub fn t_with_args(&self, key: &str, args: Option<&fluent_bundle::FluentArgs>) -> String {
        self.i18n.get_with_args(key, args)
    }

    /// Mark UI as needing redraw
    pub fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    /// Check if UI needs redraw
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Clear dirty flag after rendering
    pub fn clear_dirty(&mut self) {
        self.needs_redraw = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::Config;
    use chrono::Utc;
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;

    fn state() -> TuiState {
        let app_state = AppState::new(Config::default()).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 1, 10, 9, 30, 0).unwrap();
        TuiState::new(app_state, &now).unwrap()
    }

    #[test]
    fn test_screen_starts_with_defaults() {
        let state = state();

        assert_eq!(state.periods().len(), 24);
        assert_eq!(state.focus, FocusTarget::DocumentType);
        assert_eq!(state.selected_value(FocusTarget::DocumentType), Some(MONTHLY_REPORT));
        assert_eq!(state.selected_value(FocusTarget::Format), Some(PDF_FORMAT));
        assert_eq!(state.selected_value(FocusTarget::Period), None);
        assert_eq!(state.open_control(), None);
        assert!(state.needs_redraw());
    }

    #[test]
    fn test_period_options_follow_generated_periods() {
        let state = state();
        let combo = state.combo(FocusTarget::Period).unwrap();

        assert_eq!(combo.options()[0].value, "2025-01");
        assert_eq!(combo.options()[1].value, "2024-12");
        assert_eq!(combo.options()[0].label, state.periods()[0].label());
    }

    #[test]
    fn test_focus_ring_wraps() {
        let mut state = state();
        for expected in [
            FocusTarget::Format,
            FocusTarget::Period,
            FocusTarget::Action,
            FocusTarget::DocumentType,
        ] {
            state.focus_next();
            assert_eq!(state.focus, expected);
        }
        state.focus_prev();
        assert_eq!(state.focus, FocusTarget::Action);
    }

    #[test]
    fn test_moving_focus_dismisses_open_list() {
        let mut state = state();
        state.set_focus(FocusTarget::Period);
        let _ = state.combo_mut(FocusTarget::Period).unwrap().handle_key(KeyCode::Down);
        assert_eq!(state.open_control(), Some(FocusTarget::Period));

        state.focus_next();

        assert_eq!(state.open_control(), None);
    }

    #[test]
    fn test_commit_updates_selection() {
        let mut state = state();
        state.apply_commit(FocusTarget::Period, "2024-12".to_string());

        assert_eq!(state.selection.period_key(), Some("2024-12"));
        let period = state.selected_period().unwrap();
        assert_eq!(period.key().to_string(), "2024-12");
        let (start, end) = period.key().range_in(&Utc);
        assert_eq!((*period.start(), *period.end()), (start.fixed_offset(), end.fixed_offset()));
        assert!(state.selection.can_download());
    }

    #[test]
    fn test_dirty_flag() {
        let mut state = state();
        state.clear_dirty();
        assert!(!state.needs_redraw());
        state.mark_dirty();
        assert!(state.needs_redraw());
    }
}
