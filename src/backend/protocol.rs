//! Wire types for the search backend HTTP API.
//!
//! Field names follow the backend's JSON exactly (`Query`, `Results`,
//! `Path`, `Score`, `Source`).

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::{Result, SeekError};

/// Search endpoint: `GET /search?q=<query text>`
pub const SEARCH_PATH: &str = "/search";

/// Download endpoint: `GET /download?q=<result path>`
pub const DOWNLOAD_PATH: &str = "/download";

/// Indexer listing endpoint: `GET /all/indexers`
pub const ALL_INDEXERS_PATH: &str = "/all/indexers";

/// Query parameter carrying the search text or download path.
pub const QUERY_KEY: &str = "q";

/// Wire code for a web page result.
pub const SOURCE_WEBPAGE: i64 = 1;

/// Wire code for a local file result.
pub const SOURCE_FILE: i64 = 2;

/// Search response from backend.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchResponse {
    /// Echo of the requested query
    #[serde(rename = "Query")]
    pub query: String,
    /// Matches in backend order (descending score). `null` reads as empty.
    #[serde(rename = "Results", default)]
    #[serde_as(as = "DefaultOnNull")]
    pub results: Vec<RawResult>,
}

/// A single match returned from search.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RawResult {
    /// File path or web address
    #[serde(rename = "Path")]
    pub path: String,
    /// Relevance in 0.0..=1.0, higher is better
    #[serde(rename = "Score")]
    pub score: f64,
    /// Origin kind code, see [`SourceKind`]
    #[serde(rename = "Source")]
    pub source: i64,
}

impl RawResult {
    /// Decode the origin kind.
    ///
    /// # Errors
    /// Returns `UnknownSourceKind` for codes other than webpage or file.
    pub fn kind(&self) -> Result<SourceKind> {
        SourceKind::try_from(self.source)
    }
}

/// Where a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Local file, downloadable through the backend
    File,
    /// Web page, addressed by its URL
    Webpage,
}

impl TryFrom<i64> for SourceKind {
    type Error = SeekError;

    fn try_from(code: i64) -> Result<Self> {
        match code {
            SOURCE_FILE => Ok(SourceKind::File),
            SOURCE_WEBPAGE => Ok(SourceKind::Webpage),
            other => Err(SeekError::UnknownSourceKind(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "Query": "test",
            "Results": [
                {"Path": "local/path/to/file.txt", "Score": 0.9, "Source": 2},
                {"Path": "http://website.com/webpage", "Score": 0.79, "Source": 1}
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.query, "test");
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].kind().unwrap(), SourceKind::File);
        assert_eq!(response.results[1].kind().unwrap(), SourceKind::Webpage);
        assert!(response.results[0].score > response.results[1].score);
    }

    #[test]
    fn test_null_and_missing_results_are_empty() {
        let null: SearchResponse =
            serde_json::from_str(r#"{"Query":"x","Results":null}"#).unwrap();
        assert!(null.results.is_empty());

        let missing: SearchResponse = serde_json::from_str(r#"{"Query":"x"}"#).unwrap();
        assert!(missing.results.is_empty());
    }

    #[test]
    fn test_unknown_source_code() {
        let raw = RawResult {
            path: "somewhere".to_string(),
            score: 0.5,
            source: 0,
        };
        assert!(matches!(raw.kind(), Err(SeekError::UnknownSourceKind(0))));
        assert!(matches!(
            SourceKind::try_from(7),
            Err(SeekError::UnknownSourceKind(7))
        ));
    }
}
