use std::fmt::Display;

use crate::api::types::{Movie, TrendingEntry};
use crate::api::{CatalogError, TmdbClient};
use crate::store::SearchCountStore;

/// The only error text the result view ever shows.
pub const GENERIC_ERROR: &str = "Error fetching movies. Please try again later.";

// ---------------------------------------------------------------------------
// Search state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Loading,
    Empty,
    Results,
    Error,
}

/// Identifies one issued fetch. Only the latest ticket may commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub term: String,
}

/// Top result of a keyword search, to be counted by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct TopResult {
    pub term: String,
    pub movie: Movie,
}

#[derive(Debug, PartialEq)]
pub enum Commit {
    Applied { report: Option<TopResult> },
    Stale,
}

#[derive(Debug)]
pub struct SearchState {
    pub input: String,
    pub settled: Option<String>,
    pub phase: SearchPhase,
    pub error: Option<String>,
    pub movies: Vec<Movie>,
    pub selected: usize,
    latest_seq: u64,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            settled: None,
            phase: SearchPhase::Loading,
            error: None,
            movies: Vec::new(),
            selected: 0,
            latest_seq: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SearchPhase::Loading
    }

    /// Accept a settled input value. Returns the fetch to issue, or `None`
    /// when the exact text equals the one already shown. The text is used
    /// as typed; only `""` means discover.
    pub fn settle(&mut self, text: &str) -> Option<FetchTicket> {
        if self.settled.as_deref() == Some(text) {
            return None;
        }
        self.settled = Some(text.to_string());
        Some(self.begin_fetch(text))
    }

    /// Enter loading for `term` and hand out the next sequence number.
    pub fn begin_fetch(&mut self, term: &str) -> FetchTicket {
        self.latest_seq += 1;
        self.phase = SearchPhase::Loading;
        self.error = None;
        self.movies.clear();
        self.selected = 0;
        FetchTicket {
            seq: self.latest_seq,
            term: term.to_string(),
        }
    }

    /// Apply a fetch completion. Completions for superseded tickets are
    /// dropped and leave the newer fetch's loading state untouched.
    pub fn commit(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<Movie>, CatalogError>,
    ) -> Commit {
        if ticket.seq != self.latest_seq {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.latest_seq,
                term = %ticket.term,
                "discarding stale response"
            );
            return Commit::Stale;
        }

        match result {
            Err(e) => {
                tracing::warn!(term = %ticket.term, error = %e, "Error fetching movies");
                self.phase = SearchPhase::Error;
                self.error = Some(GENERIC_ERROR.to_string());
                self.movies.clear();
                Commit::Applied { report: None }
            }
            Ok(movies) if movies.is_empty() => {
                self.phase = SearchPhase::Empty;
                self.movies = movies;
                Commit::Applied { report: None }
            }
            Ok(movies) => {
                self.phase = SearchPhase::Results;
                let report = (!ticket.term.is_empty()).then(|| TopResult {
                    term: ticket.term.clone(),
                    movie: movies[0].clone(),
                });
                self.movies = movies;
                Commit::Applied { report }
            }
        }
    }

    // -- Selection ----------------------------------------------------------

    pub fn selected_movie(&self) -> Option<&Movie> {
        self.movies.get(self.selected)
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.movies.is_empty() {
            self.selected = 0;
            return;
        }
        let last = self.movies.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }
}

// ---------------------------------------------------------------------------
// Best-effort side flows
// ---------------------------------------------------------------------------

/// Outcome of a secondary flow (trending load, count report). Never shown to
/// the user; callers log it and move on.
#[derive(Debug)]
pub enum BestEffort<T> {
    Done(T),
    Skipped(&'static str),
    Failed(String),
}

impl<T> BestEffort<T> {
    pub fn from_result<E: Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => Self::Done(v),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    /// Write the outcome to the log channel.
    pub fn log(&self, flow: &str) {
        match self {
            Self::Done(_) => tracing::debug!(flow, "side flow finished"),
            Self::Skipped(reason) => tracing::debug!(flow, reason, "side flow skipped"),
            Self::Failed(error) => tracing::warn!(flow, %error, "side flow failed"),
        }
    }

    pub fn into_done(self) -> Option<T> {
        match self {
            Self::Done(v) => Some(v),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// The external collaborators a search session talks to.
pub struct SearchServices<S> {
    pub catalog: Option<TmdbClient>,
    pub store: Option<S>,
    pub trending_limit: usize,
}

impl<S: SearchCountStore> SearchServices<S> {
    pub async fn fetch(&self, ticket: &FetchTicket) -> Result<Vec<Movie>, CatalogError> {
        match self.catalog {
            Some(ref catalog) => catalog.fetch_movies(&ticket.term).await,
            None => Err(CatalogError::Config("no TMDB_API_KEY configured".to_string())),
        }
    }

    pub async fn report(&self, top: &TopResult) -> BestEffort<()> {
        let Some(ref store) = self.store else {
            return BestEffort::Skipped("no search-count store configured");
        };
        BestEffort::from_result(store.record_search(&top.term, &top.movie).await)
    }

    pub async fn trending(&self) -> BestEffort<Vec<TrendingEntry>> {
        let Some(ref store) = self.store else {
            return BestEffort::Skipped("no search-count store configured");
        };
        BestEffort::from_result(store.trending(self.trending_limit).await)
    }
}
