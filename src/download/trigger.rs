use super::error::TriggerError;
use crate::file::naming::{ensure_unique_filename, sanitize_filename};
use std::path::{Path, PathBuf};
use url::Url;

/// Hands a resolved document over to the user.
///
/// Fire-and-forget: callers only learn whether the hand-over started.
pub trait DownloadTrigger: Send + Sync {
    fn trigger(&self, href: &str) -> Result<(), TriggerError>;
}

/// Saves published documents into the user's download directory.
///
/// Root-relative hrefs (`/Reporte.pdf`) resolve against `published_dir`;
/// `file://` URLs are used as-is. Remote URLs are refused.
#[derive(Debug, Clone)]
pub struct SaveToDirectory {
    published_dir: PathBuf,
    download_dir: PathBuf,
}

impl SaveToDirectory {
    pub fn new(published_dir: impl Into<PathBuf>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            published_dir: published_dir.into(),
            download_dir: download_dir.into(),
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Map an href onto a file inside (or, for `file://`, anywhere on) the local disk
    fn resolve_source(&self, href: &str) -> Result<PathBuf, TriggerError> {
        match Url::parse(href) {
            Ok(url) => match url.scheme() {
                "file" => url
                    .to_file_path()
                    .map_err(|_| TriggerError::UnsupportedHref(href.to_string())),
                "http" | "https" => Err(TriggerError::RemoteHref(href.to_string())),
                _ => Err(TriggerError::UnsupportedHref(href.to_string())),
            },
            Err(url::ParseError::RelativeUrlWithoutBase) => self.resolve_relative(href),
            Err(_) => Err(TriggerError::UnsupportedHref(href.to_string())),
        }
    }

    fn resolve_relative(&self, href: &str) -> Result<PathBuf, TriggerError> {
        let unsupported = || TriggerError::UnsupportedHref(href.to_string());
        let path = href.split(['?', '#']).next().unwrap_or_default();

        let mut resolved = self.published_dir.clone();
        for raw in path.trim_start_matches('/').split('/') {
            // Segments arrive percent-encoded, as a browser would request them
            let segment = urlencoding::decode(raw).map_err(|_| unsupported())?;

            // Never let an href climb out of the published directory
            if segment.is_empty()
                || segment == "."
                || segment == ".."
                || segment.contains(['/', '\\', ':'])
            {
                return Err(unsupported());
            }
            resolved.push(&*segment);
        }
        Ok(resolved)
    }
}

impl DownloadTrigger for SaveToDirectory {
    fn trigger(&self, href: &str) -> Result<(), TriggerError> {
        let source = self.resolve_source(href)?;
        if !source.is_file() {
            return Err(TriggerError::SourceMissing(source));
        }

        let filename = source
            .file_name()
            .and_then(|name| name.to_str())
            .map(sanitize_filename)
            .ok_or_else(|| TriggerError::UnsupportedHref(href.to_string()))?;

        std::fs::create_dir_all(&self.download_dir).map_err(|source| TriggerError::Io {
            path: self.download_dir.clone(),
            source,
        })?;

        let unique = ensure_unique_filename(&self.download_dir, &filename).ok_or_else(|| {
            TriggerError::NoFreeName {
                dir: self.download_dir.clone(),
                name: filename.clone(),
            }
        })?;
        let destination = self.download_dir.join(unique);
        std::fs::copy(&source, &destination).map_err(|source| TriggerError::Io {
            path: destination.clone(),
            source,
        })?;

        tracing::info!("Saved {:?} to {:?}", source, destination);
        Ok(())
    }
}
