use crate::download::{DownloadError, DownloadOutcome};
use crate::util::i18n::LocalizationManager;
use fluent::fluent_args;
use std::sync::Arc;

/// The only format the action accepts
pub const PDF_FORMAT: &str = "pdf";

/// Document type offered by the type control
pub const MONTHLY_REPORT: &str = "monthly";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusKind {
    #[default]
    None,
    Error,
    Success,
}

/// Outcome text shown in the live status line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

impl Status {
    pub fn is_empty(&self) -> bool {
        self.kind == StatusKind::None
    }
}

/// Durable choices made on the screen plus the download-attempt flags.
///
/// Only the screen owns and mutates this; widgets report commits and the
/// screen forwards them through the intents below.
#[derive(Debug)]
pub struct SelectionState {
    document_type: String,
    format: String,
    period_key: Option<String>,
    /// Period of the attempt in flight; `Some` exactly while busy
    attempt: Option<String>,
    status: Status,
    i18n: Arc<LocalizationManager>,
}

impl SelectionState {
    pub fn new(
        document_type: impl Into<String>,
        format: impl Into<String>,
        i18n: Arc<LocalizationManager>,
    ) -> Self {
        Self {
            document_type: document_type.into(),
            format: format.into(),
            period_key: None,
            attempt: None,
            status: Status::default(),
            i18n,
        }
    }

    pub fn document_type(&self) -> &str {
        &self.document_type
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn period_key(&self) -> Option<&str> {
        self.period_key.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.attempt.is_some()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn set_document_type(&mut self, value: impl Into<String>) {
        self.document_type = value.into();
        tracing::debug!("Document type set to {}", self.document_type);
    }

    pub fn set_format(&mut self, value: impl Into<String>) {
        self.format = value.into();
        tracing::debug!("Format set to {}", self.format);
    }

    /// An empty key clears the period
    pub fn set_period(&mut self, key: impl Into<String>) {
        let key = key.into();
        self.period_key = if key.is_empty() { None } else { Some(key) };
        tracing::debug!("Period set to {:?}", self.period_key);
    }

    /// Whether the download action may run right now
    pub fn can_download(&self) -> bool {
        self.format == PDF_FORMAT && self.period_key.is_some() && !self.is_busy()
    }

    /// Start an attempt. Returns false (and changes nothing) while the action
    /// is disabled; otherwise marks the state busy and clears the last status.
    pub fn begin_download(&mut self) -> bool {
        if !self.can_download() {
            tracing::debug!("Download request ignored: action disabled");
            return false;
        }
        self.attempt = self.period_key.clone();
        self.status = Status::default();
        true
    }

    /// Finish an attempt: always clears `busy`, then reports the outcome
    pub fn end_download(&mut self, outcome: &DownloadOutcome) {
        self.attempt = None;
        self.status = match outcome {
            Ok(_) => Status {
                kind: StatusKind::Success,
                text: self.i18n.get("status-download-started"),
            },
            Err(DownloadError::NotReady { key }) => {
                let args = fluent_args! { "period" => key.as_str() };
                Status {
                    kind: StatusKind::Error,
                    text: self.i18n.get_with_args("status-not-ready", Some(&args)),
                }
            }
            Err(DownloadError::TriggerFailure { .. }) => Status {
                kind: StatusKind::Error,
                text: self.i18n.get("status-trigger-failed"),
            },
        };
    }

    /// Guard for the attempt in flight, if any.
    ///
    /// Dropping the guard ends the attempt; an attempt dropped without
    /// [`DownloadGuard::finish`] is reported as a trigger failure.
    pub fn in_flight(&mut self) -> Option<DownloadGuard<'_>> {
        let key = self.attempt.clone()?;
        Some(DownloadGuard {
            state: self,
            key,
            outcome: None,
        })
    }
}

/// Ends a download attempt when dropped, whatever happened in between
pub struct DownloadGuard<'a> {
    state: &'a mut SelectionState,
    key: String,
    outcome: Option<DownloadOutcome>,
}

impl DownloadGuard<'_> {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn finish(mut self, outcome: DownloadOutcome) {
        self.outcome = Some(outcome);
    }
}

impl Drop for DownloadGuard<'_> {
    fn drop(&mut self) {
        let outcome = self.outcome.take().unwrap_or_else(|| {
            tracing::warn!("Download attempt for {} ended without an outcome", self.key);
            Err(DownloadError::trigger_failure("attempt interrupted"))
        });
        self.state.end_download(&outcome);
    }
}
