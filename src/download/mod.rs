pub mod coordinator;
pub mod error;
pub mod manifest;
pub mod trigger;

pub use coordinator::{DownloadCoordinator, DownloadOutcome, TriggeredDownload};
pub use error::{DownloadError, TriggerError};
pub use manifest::Manifest;
pub use trigger::{DownloadTrigger, SaveToDirectory};
