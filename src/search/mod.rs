//! Search module - query dispatch, result adaptation, filtering and
//! display state.

pub mod adapter;
pub mod client;
pub mod debounce;
pub mod filters;
pub mod view;

pub use adapter::{adapt, DisplayResult};
pub use client::{SearchClient, SearchOutcome, SearchQuery, SearchReply, Sequencer, Ticket};
pub use debounce::Debouncer;
pub use filters::apply_filters;
pub use view::{Applied, DisplayState, ResultsView};
