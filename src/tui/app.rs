use super::combobox::ComboOutcome;
use super::events::TuiEvent;
use super::state::{FocusTarget, TuiState};
use crate::app::state::AppState;
use crate::download::DownloadCoordinator;
use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use futures_util::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io;
use tokio::sync::mpsc;

/// Main TUI application
pub struct TuiApp {
    pub state: TuiState,
    pub coordinator: DownloadCoordinator,
    pub should_quit: bool,
}

impl TuiApp {
    pub fn new<Tz: TimeZone>(
        app_state: AppState,
        coordinator: DownloadCoordinator,
        now: &DateTime<Tz>,
    ) -> Result<Self> {
        Ok(Self {
            state: TuiState::new(app_state, now)?,
            coordinator,
            should_quit: false,
        })
    }

    /// Handle a TUI event
    pub fn handle_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Input(input) => self.handle_input(input),
        }
    }

    fn handle_input(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) => {
                // Only process key press events, ignore release and repeat
                if kind != KeyEventKind::Press {
                    return;
                }
                self.handle_key(code, modifiers);
                self.state.mark_dirty();
            }
            Event::Mouse(mouse_event) => {
                if self.handle_mouse_event(mouse_event) {
                    self.state.mark_dirty();
                }
            }
            Event::Resize(width, height) => {
                tracing::debug!("Terminal resized to {}x{}", width, height);
                self.state.mark_dirty();
            }
            _ => {}
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        let focus = self.state.focus;

        // An open list gets first pick of every key
        if let Some(open) = self.state.open_control() {
            let outcome = match self.state.combo_mut(open) {
                Some(combo) => combo.handle_key(code),
                None => ComboOutcome::Ignored,
            };
            match outcome {
                ComboOutcome::Committed(value) => self.state.apply_commit(open, value),
                ComboOutcome::Handled => {}
                ComboOutcome::Ignored => match code {
                    KeyCode::Tab => self.state.focus_next(),
                    KeyCode::BackTab => self.state.focus_prev(),
                    _ => {}
                },
            }
            return;
        }

        match code {
            KeyCode::Tab => self.state.focus_next(),
            KeyCode::BackTab => self.state.focus_prev(),
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Enter | KeyCode::Char(' ') if focus == FocusTarget::Action => {
                self.request_download();
            }
            _ => {
                if let Some(combo) = self.state.combo_mut(focus) {
                    let _ = combo.handle_key(code);
                }
            }
        }
    }

    /// Handle mouse events; returns true when something changed on screen
    fn handle_mouse_event(&mut self, event: MouseEvent) -> bool {
        let MouseEvent {
            kind, column, row, ..
        } = event;

        match kind {
            MouseEventKind::Moved => self.handle_hover(column, row),
            MouseEventKind::Down(MouseButton::Left) => {
                self.handle_left_click(column, row);
                true
            }
            MouseEventKind::ScrollUp => self.handle_scroll(KeyCode::Up),
            MouseEventKind::ScrollDown => self.handle_scroll(KeyCode::Down),
            _ => false,
        }
    }

    fn handle_hover(&mut self, x: u16, y: u16) -> bool {
        let Some(open) = self.state.open_control() else {
            return false;
        };
        let Some(index) = self.hit_test_option(x, y) else {
            return false;
        };
        if self.state.combo(open).and_then(|c| c.highlighted()) == Some(index) {
            return false;
        }
        self.state
            .combo_mut(open)
            .is_some_and(|combo| combo.hover(index) == ComboOutcome::Handled)
    }

    /// Wheel over an open list moves the highlight one row per notch
    fn handle_scroll(&mut self, key: KeyCode) -> bool {
        let Some(open) = self.state.open_control() else {
            return false;
        };
        self.state
            .combo_mut(open)
            .is_some_and(|combo| combo.handle_key(key) == ComboOutcome::Handled)
    }

    /// Handle left click at position
    fn handle_left_click(&mut self, x: u16, y: u16) {
        if let Some(open) = self.state.open_control() {
            if let Some(index) = self.hit_test_option(x, y) {
                let outcome = match self.state.combo_mut(open) {
                    Some(combo) => combo.press(index),
                    None => ComboOutcome::Ignored,
                };
                if let ComboOutcome::Committed(value) = outcome {
                    self.state.apply_commit(open, value);
                }
                return;
            }

            if self.hit_test_listbox(x, y) {
                // Border or padding of the open list
                return;
            }

            if self.hit_test_trigger(x, y) == Some(open) {
                if let Some(combo) = self.state.combo_mut(open) {
                    let _ = combo.click_trigger();
                }
                return;
            }

            // Click outside the list closes it without committing
            self.state.dismiss_open_list();
        }

        if let Some(target) = self.hit_test_trigger(x, y) {
            self.state.set_focus(target);
            if let Some(combo) = self.state.combo_mut(target) {
                let _ = combo.click_trigger();
            }
            return;
        }

        let on_button = {
            let regions = self.state.click_regions.borrow();
            regions
                .button
                .is_some_and(|rect| Self::point_in_rect(x, y, &rect))
        };
        if on_button {
            self.state.set_focus(FocusTarget::Action);
            self.request_download();
        }
    }

    /// Check if a point is inside a rectangle
    fn point_in_rect(x: u16, y: u16, rect: &Rect) -> bool {
        x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
    }

    /// Hit test for option rows of the open list
    fn hit_test_option(&self, x: u16, y: u16) -> Option<usize> {
        let regions = self.state.click_regions.borrow();
        regions
            .options
            .iter()
            .find(|(_, rect)| Self::point_in_rect(x, y, rect))
            .map(|(idx, _)| *idx)
    }

    fn hit_test_listbox(&self, x: u16, y: u16) -> bool {
        let regions = self.state.click_regions.borrow();
        regions
            .listbox
            .is_some_and(|rect| Self::point_in_rect(x, y, &rect))
    }

    fn hit_test_trigger(&self, x: u16, y: u16) -> Option<FocusTarget> {
        let regions = self.state.click_regions.borrow();
        regions
            .triggers
            .iter()
            .find(|(_, rect)| Self::point_in_rect(x, y, rect))
            .map(|(target, _)| *target)
    }

    /// First half of a download: mark the attempt busy so the next frame
    /// shows the busy label. Does nothing while the action is disabled.
    pub fn request_download(&mut self) -> bool {
        let started = self.state.selection.begin_download();
        if started {
            tracing::info!(
                "Download requested for period {:?}",
                self.state.selection.period_key()
            );
            self.state.mark_dirty();
        }
        started
    }

    /// Second half: resolve and trigger the attempt in flight. Busy is
    /// cleared when the guard goes out of scope, whatever the outcome.
    pub async fn perform_pending_download(&mut self) {
        let coordinator = self.coordinator.clone();
        let Some(guard) = self.state.selection.in_flight() else {
            return;
        };

        let key = guard.key().to_string();
        let outcome = coordinator.run(&key).await;
        guard.finish(outcome);

        self.state.mark_dirty();
    }
}

/// Restores the terminal even when the loop exits with an error
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = stdout.execute(DisableMouseCapture);
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}

/// Run the picker screen until the user quits
pub async fn run_tui<Tz: TimeZone>(
    app_state: AppState,
    coordinator: DownloadCoordinator,
    now: &DateTime<Tz>,
) -> Result<()> {
    let mut app = TuiApp::new(app_state, coordinator, now)?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let _restore = TerminalGuard;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Event channel
    let (tx, mut rx) = mpsc::channel(100);

    // Spawn keyboard and mouse event reader
    tokio::spawn(async move {
        let mut reader = crossterm::event::EventStream::new();
        while let Some(Ok(event)) = reader.next().await {
            if tx.send(TuiEvent::Input(event)).await.is_err() {
                break;
            }
        }
    });

    tracing::info!("Picker screen started");

    // Main event loop
    while !app.should_quit {
        // Draw UI only if dirty flag is set
        if app.state.needs_redraw() {
            terminal.draw(|f| super::ui::render(&app, f))?;
            app.state.clear_dirty();
        }

        // The busy frame is on screen; input queued meanwhile waits
        if app.state.selection.is_busy() {
            app.perform_pending_download().await;
            continue;
        }

        match rx.recv().await {
            Some(event) => app.handle_event(event),
            None => break,
        }
    }

    terminal.show_cursor()?;
    tracing::info!("Picker screen closed");

    Ok(())
}
