use std::path::PathBuf;
use thiserror::Error;

/// Why a download attempt did not start. Both kinds are recoverable: the
/// screen reports them and the user may pick another period or retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DownloadError {
    /// The manifest has no published document for the period
    #[error("No published document for period {key}")]
    NotReady { key: String },

    /// The document exists but handing it over failed
    #[error("Could not start download: {reason}")]
    TriggerFailure { reason: String },
}

impl DownloadError {
    pub fn trigger_failure(reason: impl Into<String>) -> Self {
        Self::TriggerFailure {
            reason: reason.into(),
        }
    }
}

/// Errors raised by a [`DownloadTrigger`](super::trigger::DownloadTrigger)
#[derive(Error, Debug)]
pub enum TriggerError {
    /// Href is neither root-relative nor a `file://` URL
    #[error("Unsupported document href '{0}'")]
    UnsupportedHref(String),

    /// Remote documents would need a network fetch
    #[error("Remote document '{0}' cannot be saved locally")]
    RemoteHref(String),

    /// Manifest points at a file that is not published
    #[error("Published document not found: {}", .0.display())]
    SourceMissing(PathBuf),

    /// Every numbered copy of the name is already taken
    #[error("No free file name for '{name}' in {}", .dir.display())]
    NoFreeName { dir: PathBuf, name: String },

    /// Copy into the download directory failed
    #[error("Failed to save {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<TriggerError> for DownloadError {
    fn from(error: TriggerError) -> Self {
        Self::trigger_failure(error.to_string())
    }
}
