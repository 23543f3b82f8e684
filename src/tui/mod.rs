pub mod app;
pub mod combobox;
pub mod events;
pub mod state;
pub mod ui;

pub use app::{run_tui, TuiApp};
pub use combobox::{ComboBox, ComboOutcome, ComboState, SelectOption};
pub use state::{FocusTarget, TuiState};
