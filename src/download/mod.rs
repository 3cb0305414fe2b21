//! File downloads from the search backend.
//!
//! Only file results can be downloaded. The payload is fetched with
//! `GET /download?q=<path>` and handed to a [`SaveHost`].

pub mod host;

pub use host::{safe_file_name, save_with, DirectorySaveHost, SaveHost, Staged};

use crate::backend::{Backend, DOWNLOAD_PATH};
use crate::search::adapter::{file_label, DisplayResult};
use crate::{Result, SeekError};

/// A fetched file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Plain file name to save under, see [`safe_file_name`]
    pub name: String,
    /// Backend path the payload was requested with
    pub path: String,
    pub bytes: Vec<u8>,
}

/// Client for the backend download endpoint.
#[derive(Clone, Debug)]
pub struct DownloadClient {
    backend: Backend,
}

impl DownloadClient {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// Fetch the file at `path` exactly as the backend reported it.
    ///
    /// # Errors
    /// Returns `Network` if the request fails or the status isn't 2xx.
    pub async fn fetch(&self, path: &str) -> Result<Download> {
        tracing::info!("Downloading {:?}", path);
        let bytes = self.backend.get_bytes(DOWNLOAD_PATH, Some(path)).await?;
        tracing::debug!("Received {} bytes for {:?}", bytes.len(), path);

        Ok(Download {
            name: safe_file_name(path),
            path: path.to_string(),
            bytes,
        })
    }

    /// Download a file by the backend path it was reported with.
    ///
    /// # Errors
    /// Returns `InvalidOperation` without sending a request if `path` is a
    /// URL, since webpages cannot be downloaded.
    pub async fn download_path<H: SaveHost>(&self, path: &str, host: &mut H) -> Result<H::Saved> {
        if path.contains("://") {
            return Err(SeekError::InvalidOperation(format!(
                "{} is not a file and cannot be downloaded",
                path
            )));
        }

        let row = DisplayResult::File {
            path: path.to_string(),
            label: file_label(path).to_string(),
            score: 0.0,
        };
        self.download(&row, host).await
    }

    /// Download a result row and save it through `host`.
    ///
    /// The staged resource is released whether or not the save succeeds.
    ///
    /// # Errors
    /// Returns `InvalidOperation` without sending a request if the row is not
    /// a file; otherwise any fetch or save error.
    pub async fn download<H: SaveHost>(
        &self,
        result: &DisplayResult,
        host: &mut H,
    ) -> Result<H::Saved> {
        if !result.download_available() {
            return Err(SeekError::InvalidOperation(format!(
                "{} is not a file and cannot be downloaded",
                result.label()
            )));
        }

        let download = self.fetch(result.path()).await?;
        save_with(host, &download).map_err(|e| {
            tracing::error!("Failed to save {}: {}", download.name, e);
            e
        })
    }
}
