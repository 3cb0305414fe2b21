//! Search client: sends queries to the backend and turns the responses
//! into filtered display rows.
//!
//! Every issued request is stamped with a [`Ticket`] from a shared
//! [`Sequencer`]. Interactive callers use [`SearchClient::fetch`] and hand the
//! reply to a [`ResultsView`](crate::search::ResultsView), which ignores
//! anything but the most recently issued ticket. One-shot callers use
//! [`SearchClient::search`].

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::backend::{Backend, SearchResponse, SEARCH_PATH};
use crate::search::adapter::{adapt, DisplayResult};
use crate::search::filters::apply_filters;
use crate::settings::Settings;
use crate::{Result, SeekError};

/// Query text typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Empty or whitespace-only queries are never sent.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Sequence number of an issued search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Hands out increasing tickets and remembers the latest one.
#[derive(Debug, Default)]
pub struct Sequencer {
    latest: AtomicU64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket. The first ticket is 1.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Make every ticket issued so far stale, e.g. when the query was
    /// cleared while a request was in flight.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    /// Most recently issued ticket, if any. After [`invalidate`](Self::invalidate)
    /// this is a ticket no request holds.
    pub fn latest(&self) -> Option<Ticket> {
        match self.latest.load(Ordering::SeqCst) {
            0 => None,
            n => Some(Ticket(n)),
        }
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest() == Some(ticket)
    }
}

/// A finished request: its ticket, what was asked, and what came back.
///
/// Transport failures are kept inside the reply so that a stale failure can
/// be discarded just like a stale success.
#[derive(Debug)]
pub struct SearchReply {
    pub ticket: Ticket,
    pub query: SearchQuery,
    pub response: Result<SearchResponse>,
}

/// Processed search result, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// At least one row survived filtering
    Results(Vec<DisplayResult>),
    /// Nothing to show for this query
    NoResults { query: String },
}

impl SearchOutcome {
    pub fn rows(&self) -> &[DisplayResult] {
        match self {
            SearchOutcome::Results(rows) => rows,
            SearchOutcome::NoResults { .. } => &[],
        }
    }

    /// Sentinel text for an empty outcome, e.g. `no results for: test`.
    pub fn message(&self) -> Option<String> {
        match self {
            SearchOutcome::Results(_) => None,
            SearchOutcome::NoResults { query } => Some(no_results_message(query)),
        }
    }
}

pub fn no_results_message(query: &str) -> String {
    format!("no results for: {}", query)
}

/// Adapt and filter a backend response under the given settings.
///
/// # Errors
/// Returns `UnknownSourceKind` if any match has an unrecognised source code.
pub fn process(
    query: &SearchQuery,
    response: SearchResponse,
    settings: &Settings,
) -> Result<SearchOutcome> {
    let rows = response
        .results
        .iter()
        .map(adapt)
        .collect::<Result<Vec<_>>>()?;

    let rows = apply_filters(rows, settings);
    if rows.is_empty() {
        Ok(SearchOutcome::NoResults {
            query: query.text().to_string(),
        })
    } else {
        Ok(SearchOutcome::Results(rows))
    }
}

/// Client for the backend search endpoint.
///
/// Clones share the ticket sequence, so requests spawned from clones are
/// ordered against each other.
#[derive(Clone, Debug)]
pub struct SearchClient {
    backend: Backend,
    sequencer: Arc<Sequencer>,
}

impl SearchClient {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            sequencer: Arc::new(Sequencer::new()),
        }
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Start one search request; the returned future yields the
    /// unprocessed reply.
    ///
    /// The ticket is issued here, before the request goes out, so a later
    /// call always carries a later ticket regardless of when either future
    /// is polled or which response arrives first.
    ///
    /// # Errors
    /// Returns `EmptyQuery` without sending anything (and without issuing a
    /// ticket) if the query is blank.
    pub fn fetch(
        &self,
        query: &SearchQuery,
    ) -> Result<impl Future<Output = SearchReply> + Send + 'static> {
        if query.is_blank() {
            tracing::debug!("Skipping blank query");
            return Err(SeekError::EmptyQuery);
        }

        let ticket = self.sequencer.issue();
        let backend = self.backend.clone();
        let query = query.clone();

        Ok(async move {
            tracing::info!("Searching for {:?} (request {})", query.text(), ticket.0);
            let response = backend
                .get_json::<SearchResponse>(SEARCH_PATH, Some(query.text()))
                .await;

            match &response {
                Ok(r) => {
                    tracing::debug!("Request {} returned {} results", ticket.0, r.results.len())
                }
                Err(e) => tracing::warn!("Request {} failed: {}", ticket.0, e),
            }

            SearchReply {
                ticket,
                query,
                response,
            }
        })
    }

    /// Search and process in one step.
    ///
    /// # Errors
    /// Returns `EmptyQuery` for blank queries, `Network` if the backend is
    /// unreachable or replies with garbage, `UnknownSourceKind` for
    /// unrecognised result kinds.
    pub async fn search(&self, query: &SearchQuery, settings: &Settings) -> Result<SearchOutcome> {
        let reply = self.fetch(query)?.await;
        process(&reply.query, reply.response?, settings)
    }
}
