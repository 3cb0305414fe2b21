//! User-adjustable search facets and client configuration.
//!
//! [`Settings`] is the in-memory configuration store read by the search
//! client when a response is processed. It is passed explicitly into each
//! call rather than living in a process-wide global.
//! [`ClientConfig`] is the on-disk connection config (endpoint, timeouts,
//! download and log directories).

pub mod file;

pub use file::ClientConfig;

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use sysinfo::System;

/// Used when the core count cannot be detected.
const FALLBACK_MAX_CORES: usize = 8;

/// Default cap on displayed results when `show_all_results` is off.
const DEFAULT_MAX_RESULTS: usize = 100;

/// A known indexer backend.
///
/// The backend reports ids as strings (`"ID": "1"`); settings files may use
/// plain integers.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Indexer {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Id", alias = "ID")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub id: u64,
    #[serde(rename = "Port")]
    pub port: u16,
}

/// Search facets and resource hints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    show_files: bool,
    show_webpages: bool,
    show_all_results: bool,
    max_results: NonZeroUsize,
    cpu_default: bool,
    max_cores: usize,
    cpu_cores: usize,
    indexers: Vec<Indexer>,
}

impl Default for Settings {
    fn default() -> Self {
        let max_cores = detected_cores();
        Self {
            show_files: true,
            show_webpages: true,
            show_all_results: true,
            max_results: NonZeroUsize::new(DEFAULT_MAX_RESULTS).unwrap_or(NonZeroUsize::MIN),
            cpu_default: true,
            max_cores,
            cpu_cores: (max_cores / 2).max(1),
            indexers: Vec::new(),
        }
    }
}

impl Settings {
    pub fn show_files(&self) -> bool {
        self.show_files
    }

    pub fn set_show_files(&mut self, show: bool) {
        self.show_files = show;
    }

    pub fn show_webpages(&self) -> bool {
        self.show_webpages
    }

    pub fn set_show_webpages(&mut self, show: bool) {
        self.show_webpages = show;
    }

    /// When true, `max_results` is ignored.
    pub fn show_all_results(&self) -> bool {
        self.show_all_results
    }

    pub fn set_show_all_results(&mut self, show: bool) {
        self.show_all_results = show;
    }

    pub fn max_results(&self) -> NonZeroUsize {
        self.max_results
    }

    pub fn set_max_results(&mut self, max: NonZeroUsize) {
        self.max_results = max;
    }

    /// Whether the backend should pick its own core allocation.
    pub fn cpu_default(&self) -> bool {
        self.cpu_default
    }

    pub fn set_cpu_default(&mut self, use_default: bool) {
        self.cpu_default = use_default;
    }

    pub fn max_cores(&self) -> usize {
        self.max_cores
    }

    pub fn set_max_cores(&mut self, cores: usize) {
        self.max_cores = cores;
    }

    pub fn cpu_cores(&self) -> usize {
        self.cpu_cores
    }

    pub fn set_cpu_cores(&mut self, cores: usize) {
        self.cpu_cores = cores;
    }

    pub fn indexers(&self) -> &[Indexer] {
        &self.indexers
    }

    /// Replace the known indexer list, dropping duplicate entries.
    pub fn set_indexers(&mut self, indexers: Vec<Indexer>) {
        let mut unique: Vec<Indexer> = Vec::with_capacity(indexers.len());
        for indexer in indexers {
            if !unique.contains(&indexer) {
                unique.push(indexer);
            }
        }
        self.indexers = unique;
    }
}

/// Logical core count of this machine.
fn detected_cores() -> usize {
    let mut sys = System::new();
    sys.refresh_cpu_all();
    match sys.cpus().len() {
        0 => FALLBACK_MAX_CORES,
        n => n,
    }
}
