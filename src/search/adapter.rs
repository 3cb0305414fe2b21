//! Maps raw backend matches to display rows.

use crate::backend::{RawResult, SourceKind};
use crate::Result;

/// A search match ready for display.
///
/// Each variant carries only what that kind of result needs: files keep
/// their backend path for downloading, webpages keep their URL.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayResult {
    File {
        /// Path as reported by the backend, used for downloads
        path: String,
        /// Final path segment
        label: String,
        score: f64,
    },
    Webpage {
        url: String,
        score: f64,
    },
}

impl DisplayResult {
    /// Text shown for the row.
    pub fn label(&self) -> &str {
        match self {
            DisplayResult::File { label, .. } => label,
            DisplayResult::Webpage { url, .. } => url,
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            DisplayResult::File { .. } => SourceKind::File,
            DisplayResult::Webpage { .. } => SourceKind::Webpage,
        }
    }

    /// Only files can be fetched through the download endpoint.
    pub fn download_available(&self) -> bool {
        matches!(self, DisplayResult::File { .. })
    }

    /// The backend path or URL this row was built from.
    pub fn path(&self) -> &str {
        match self {
            DisplayResult::File { path, .. } => path,
            DisplayResult::Webpage { url, .. } => url,
        }
    }

    pub fn score(&self) -> f64 {
        match self {
            DisplayResult::File { score, .. } | DisplayResult::Webpage { score, .. } => *score,
        }
    }
}

/// Build the display row for a raw match.
///
/// # Errors
/// Returns `UnknownSourceKind` if the backend sent an unrecognised source
/// code.
pub fn adapt(raw: &RawResult) -> Result<DisplayResult> {
    let row = match raw.kind()? {
        SourceKind::File => DisplayResult::File {
            path: raw.path.clone(),
            label: file_label(&raw.path).to_string(),
            score: raw.score,
        },
        SourceKind::Webpage => DisplayResult::Webpage {
            url: raw.path.clone(),
            score: raw.score,
        },
    };
    Ok(row)
}

/// Last segment of a path, split on either `/` or `\`.
///
/// A path ending in a separator keeps its full text so the label is never
/// blank.
pub fn file_label(path: &str) -> &str {
    match path.rsplit(['/', '\\']).next() {
        Some(name) if !name.is_empty() => name,
        _ => path,
    }
}
