//! Display state for the results list.
//!
//! Replies are applied only if they carry the latest issued ticket. Filters
//! are read from the settings passed at apply time, so a facet change made
//! while a request is in flight shapes that request's rows.

use crate::search::adapter::DisplayResult;
use crate::search::client::{
    no_results_message, process, SearchOutcome, SearchQuery, SearchReply, Sequencer, Ticket,
};
use crate::settings::Settings;

/// What the results area currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState {
    /// No query yet, or the query was cleared
    Idle,
    /// A request is in flight
    Searching { query: String },
    Results(Vec<DisplayResult>),
    NoResults { query: String },
    /// The latest request failed; holds the error text
    Failed(String),
}

/// Result of handing a reply to [`ResultsView::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The reply replaced the displayed state
    Updated,
    /// A newer request was issued after this one; the reply was dropped
    Stale,
}

/// Results list state, replaced wholesale by each applied reply.
#[derive(Debug)]
pub struct ResultsView {
    state: DisplayState,
    applied: Option<Ticket>,
}

impl Default for ResultsView {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsView {
    pub fn new() -> Self {
        Self {
            state: DisplayState::Idle,
            applied: None,
        }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// Ticket of the reply currently on display.
    pub fn applied_ticket(&self) -> Option<Ticket> {
        self.applied
    }

    /// Rows to render; empty unless results are showing.
    pub fn rows(&self) -> &[DisplayResult] {
        match &self.state {
            DisplayState::Results(rows) => rows,
            _ => &[],
        }
    }

    /// Status line for the current state.
    pub fn status(&self) -> String {
        match &self.state {
            DisplayState::Idle => "Ready".to_string(),
            DisplayState::Searching { .. } => "Searching...".to_string(),
            DisplayState::Results(rows) => format!("{} results", rows.len()),
            DisplayState::NoResults { query } => no_results_message(query),
            DisplayState::Failed(msg) => format!("Search failed: {}", msg),
        }
    }

    /// Show that a request for `query` is in flight.
    pub fn mark_searching(&mut self, query: &SearchQuery) {
        self.state = DisplayState::Searching {
            query: query.text().to_string(),
        };
    }

    /// Clear results, e.g. after the query box was emptied.
    pub fn clear(&mut self) {
        self.state = DisplayState::Idle;
    }

    /// Apply a finished request if it is still the latest one.
    pub fn apply(
        &mut self,
        reply: SearchReply,
        sequencer: &Sequencer,
        settings: &Settings,
    ) -> Applied {
        if !sequencer.is_latest(reply.ticket) {
            tracing::debug!(
                "Discarding stale reply {:?} for {:?} (latest {:?})",
                reply.ticket,
                reply.query.text(),
                sequencer.latest()
            );
            return Applied::Stale;
        }

        let outcome = reply
            .response
            .and_then(|response| process(&reply.query, response, settings));

        self.state = match outcome {
            Ok(SearchOutcome::Results(rows)) => DisplayState::Results(rows),
            Ok(SearchOutcome::NoResults { query }) => DisplayState::NoResults { query },
            Err(e) => {
                tracing::error!("Search failed: {}", e);
                DisplayState::Failed(e.to_string())
            }
        };
        self.applied = Some(reply.ticket);
        Applied::Updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{RawResult, SearchResponse, SOURCE_FILE, SOURCE_WEBPAGE};
    use crate::SeekError;

    fn response(query: &str, paths: &[(&str, i64)]) -> SearchResponse {
        SearchResponse {
            query: query.to_string(),
            results: paths
                .iter()
                .map(|(path, source)| RawResult {
                    path: path.to_string(),
                    score: 0.5,
                    source: *source,
                })
                .collect(),
        }
    }

    fn reply(ticket: Ticket, query: &str, response: crate::Result<SearchResponse>) -> SearchReply {
        SearchReply {
            ticket,
            query: SearchQuery::new(query),
            response,
        }
    }

    #[test]
    fn test_initial_state() {
        let view = ResultsView::new();
        assert_eq!(view.state(), &DisplayState::Idle);
        assert_eq!(view.status(), "Ready");
        assert!(view.rows().is_empty());
    }

    #[test]
    fn test_stale_reply_discarded() {
        let sequencer = Sequencer::new();
        let settings = Settings::default();
        let mut view = ResultsView::new();

        let older = sequencer.issue();
        let newer = sequencer.issue();

        // Newer reply arrives first
        let applied = view.apply(
            reply(newer, "test", Ok(response("test", &[("local/new.txt", SOURCE_FILE)]))),
            &sequencer,
            &settings,
        );
        assert_eq!(applied, Applied::Updated);

        // Older reply arrives late and must not overwrite it
        let applied = view.apply(
            reply(older, "te", Ok(response("te", &[("local/old.txt", SOURCE_FILE)]))),
            &sequencer,
            &settings,
        );
        assert_eq!(applied, Applied::Stale);
        assert_eq!(view.rows()[0].label(), "new.txt");
        assert_eq!(view.applied_ticket(), Some(newer));
    }

    #[test]
    fn test_stale_failure_discarded() {
        let sequencer = Sequencer::new();
        let settings = Settings::default();
        let mut view = ResultsView::new();

        let older = sequencer.issue();
        let newer = sequencer.issue();
        view.apply(
            reply(newer, "x", Ok(response("x", &[("http://x.com", SOURCE_WEBPAGE)]))),
            &sequencer,
            &settings,
        );

        let applied = view.apply(
            reply(older, "y", Err(SeekError::Network("timeout".to_string()))),
            &sequencer,
            &settings,
        );
        assert_eq!(applied, Applied::Stale);
        assert_eq!(view.rows().len(), 1);
    }

    #[test]
    fn test_results_fully_replaced() {
        let sequencer = Sequencer::new();
        let settings = Settings::default();
        let mut view = ResultsView::new();

        let first = sequencer.issue();
        let rows = [("a/1.txt", SOURCE_FILE), ("a/2.txt", SOURCE_FILE)];
        view.apply(
            reply(first, "a", Ok(response("a", &rows))),
            &sequencer,
            &settings,
        );
        assert_eq!(view.rows().len(), 2);

        let second = sequencer.issue();
        view.apply(
            reply(second, "b", Ok(response("b", &[("b/3.txt", SOURCE_FILE)]))),
            &sequencer,
            &settings,
        );
        let labels: Vec<_> = view.rows().iter().map(|r| r.label()).collect();
        assert_eq!(labels, vec!["3.txt"]);
    }

    #[test]
    fn test_settings_read_at_apply_time() {
        let sequencer = Sequencer::new();
        let mut settings = Settings::default();
        let mut view = ResultsView::new();

        let ticket = sequencer.issue();
        view.mark_searching(&SearchQuery::new("test"));
        assert_eq!(view.status(), "Searching...");

        // User hides webpages while the request is in flight
        settings.set_show_webpages(false);

        view.apply(
            reply(
                ticket,
                "test",
                Ok(response(
                    "test",
                    &[
                        ("local/path/to/file.txt", SOURCE_FILE),
                        ("http://website.com/webpage", SOURCE_WEBPAGE),
                    ],
                )),
            ),
            &sequencer,
            &settings,
        );
        assert_eq!(view.rows().len(), 1);
        assert_eq!(view.rows()[0].label(), "file.txt");
    }

    #[test]
    fn test_no_results_and_failure_states() {
        let sequencer = Sequencer::new();
        let settings = Settings::default();
        let mut view = ResultsView::new();

        let ticket = sequencer.issue();
        view.apply(reply(ticket, "test", Ok(response("test", &[]))), &sequencer, &settings);
        assert_eq!(
            view.state(),
            &DisplayState::NoResults {
                query: "test".to_string()
            }
        );
        assert_eq!(view.status(), "no results for: test");
        assert!(view.rows().is_empty());

        let ticket = sequencer.issue();
        view.apply(
            reply(ticket, "test", Err(SeekError::Network("connection refused".to_string()))),
            &sequencer,
            &settings,
        );
        assert!(matches!(
            view.state(),
            DisplayState::Failed(msg) if msg.contains("connection refused")
        ));

        view.clear();
        assert_eq!(view.state(), &DisplayState::Idle);
    }

    #[test]
    fn test_cleared_query_drops_in_flight_reply() {
        let sequencer = Sequencer::new();
        let settings = Settings::default();
        let mut view = ResultsView::new();

        let ticket = sequencer.issue();
        view.mark_searching(&SearchQuery::new("test"));

        // Query box emptied before the reply arrives
        sequencer.invalidate();
        view.clear();

        let applied = view.apply(
            reply(ticket, "test", Ok(response("test", &[("local/a.txt", SOURCE_FILE)]))),
            &sequencer,
            &settings,
        );
        assert_eq!(applied, Applied::Stale);
        assert_eq!(view.state(), &DisplayState::Idle);
        assert!(view.rows().is_empty());
    }

    #[test]
    fn test_unknown_source_becomes_failure() {
        let sequencer = Sequencer::new();
        let mut view = ResultsView::new();
        let ticket = sequencer.issue();

        view.apply(
            reply(ticket, "test", Ok(response("test", &[("document", 5)]))),
            &sequencer,
            &Settings::default(),
        );
        assert!(matches!(view.state(), DisplayState::Failed(_)));
    }
}
