#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use mesdoc::app::{config::Config, state::AppState};
use mesdoc::download::{DownloadCoordinator, DownloadTrigger, Manifest, TriggerError};
use mesdoc::tui::events::TuiEvent;
use mesdoc::tui::TuiApp;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::sync::{Arc, Mutex};

pub const NOVEMBER_HREF: &str = "/Reporte_complementario_vehiculos_sin_movimiento_2025-11.pdf";

// Initialize logging once for all tests
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Records every href it is asked to open
#[derive(Default)]
pub struct RecordingTrigger {
    calls: Mutex<Vec<String>>,
}

impl RecordingTrigger {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl DownloadTrigger for RecordingTrigger {
    fn trigger(&self, href: &str) -> Result<(), TriggerError> {
        self.calls.lock().unwrap().push(href.to_string());
        Ok(())
    }
}

/// Always refuses, as a sandboxed environment would
pub struct FailingTrigger;

impl DownloadTrigger for FailingTrigger {
    fn trigger(&self, href: &str) -> Result<(), TriggerError> {
        Err(TriggerError::UnsupportedHref(href.to_string()))
    }
}

/// Mid-December 2025: index 0 is 2025-12, index 1 is 2025-11
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 15, 12, 0, 0).unwrap()
}

pub fn create_test_app(trigger: Arc<dyn DownloadTrigger>) -> TuiApp {
    let app_state = AppState::new(Config::default()).unwrap();
    let coordinator = DownloadCoordinator::new(Manifest::builtin(), trigger);
    TuiApp::new(app_state, coordinator, &fixed_now()).unwrap()
}

pub fn press(app: &mut TuiApp, code: KeyCode) {
    app.handle_event(TuiEvent::Input(Event::Key(KeyEvent::new(
        code,
        KeyModifiers::NONE,
    ))));
}

fn mouse(app: &mut TuiApp, kind: MouseEventKind, (column, row): (u16, u16)) {
    app.handle_event(TuiEvent::Input(Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })));
}

pub fn click(app: &mut TuiApp, at: (u16, u16)) {
    mouse(app, MouseEventKind::Down(MouseButton::Left), at);
}

pub fn hover(app: &mut TuiApp, at: (u16, u16)) {
    mouse(app, MouseEventKind::Moved, at);
}

/// Render one frame so click regions are current; returns the screen text
pub fn draw(app: &TuiApp) -> String {
    let mut terminal = Terminal::new(TestBackend::new(90, 40)).unwrap();
    terminal.draw(|f| mesdoc::tui::ui::render(app, f)).unwrap();
    let buffer = terminal.backend().buffer();
    buffer
        .content
        .chunks(buffer.area.width as usize)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn center(rect: Rect) -> (u16, u16) {
    (rect.x + rect.width / 2, rect.y + rect.height / 2)
}
