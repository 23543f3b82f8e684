pub mod selection;

pub use selection::{
    DownloadGuard, SelectionState, Status, StatusKind, MONTHLY_REPORT, PDF_FORMAT,
};
