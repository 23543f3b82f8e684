use super::error::DownloadError;
use super::manifest::Manifest;
use super::trigger::DownloadTrigger;
use std::sync::Arc;

/// A download that was handed over to the trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggeredDownload {
    pub key: String,
    pub href: String,
}

/// Result of one resolve-and-trigger attempt
pub type DownloadOutcome = Result<TriggeredDownload, DownloadError>;

/// Resolves a period key through the manifest and starts the download.
///
/// Owns no selection state: the screen guards against overlapping attempts.
#[derive(Clone)]
pub struct DownloadCoordinator {
    manifest: Arc<Manifest>,
    trigger: Arc<dyn DownloadTrigger>,
}

impl DownloadCoordinator {
    pub fn new(manifest: Manifest, trigger: Arc<dyn DownloadTrigger>) -> Self {
        Self {
            manifest: Arc::new(manifest),
            trigger,
        }
    }

    /// Resolve `key` and, when a document is published for it, trigger exactly
    /// one download. Unknown keys never reach the trigger.
    pub async fn run(&self, key: &str) -> DownloadOutcome {
        let Some(href) = self.manifest.resolve(key) else {
            tracing::warn!("No published document for period {}", key);
            return Err(DownloadError::NotReady {
                key: key.to_string(),
            });
        };

        let href = href.to_string();
        tracing::debug!("Period {} resolved to {}", key, href);

        // The trigger touches the filesystem; keep it off the UI task
        let trigger = Arc::clone(&self.trigger);
        let target = href.clone();
        match tokio::task::spawn_blocking(move || trigger.trigger(&target)).await {
            Ok(Ok(())) => {
                tracing::info!("Download started for period {} ({})", key, href);
                Ok(TriggeredDownload {
                    key: key.to_string(),
                    href,
                })
            }
            Ok(Err(e)) => {
                tracing::error!("Download trigger failed for {}: {}", href, e);
                Err(e.into())
            }
            Err(e) => {
                tracing::error!("Download trigger aborted for {}: {}", href, e);
                Err(DownloadError::trigger_failure(e.to_string()))
            }
        }
    }
}
