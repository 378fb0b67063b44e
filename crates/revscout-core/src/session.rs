//! Mutable state of one crawl.

use tracing::{debug, error};

use revscout_protocols::types::{CrawlOutcome, ReviewRecord, TerminationReason};

/// Stage of a crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Start,
    SchemaPending,
    PageLoaded,
    ElementsExtracted,
    NextPageCheck,
    Done,
    Failed,
}

impl CrawlState {
    /// Whether `self -> next` is a legal step.
    pub fn can_advance_to(self, next: CrawlState) -> bool {
        use CrawlState::*;
        matches!(
            (self, next),
            (Start, SchemaPending)
                | (SchemaPending, PageLoaded)
                | (PageLoaded, ElementsExtracted)
                | (ElementsExtracted, NextPageCheck)
                | (NextPageCheck, PageLoaded)
                | (PageLoaded | ElementsExtracted | NextPageCheck, Done)
                | (Start | SchemaPending, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, CrawlState::Done | CrawlState::Failed)
    }
}

/// Accumulates the records of one crawl. Owned exclusively by the engine.
#[derive(Debug)]
pub struct CrawlSession {
    url: String,
    page: u32,
    records: Vec<ReviewRecord>,
    state: CrawlState,
}

impl CrawlSession {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            page: 1,
            records: Vec::new(),
            state: CrawlState::Start,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current page, starting at 1.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn records(&self) -> &[ReviewRecord] {
        &self.records
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn advance(&mut self, next: CrawlState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal crawl transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!(page = self.page, from = ?self.state, to = ?next, "Crawl state change");
        self.state = next;
    }

    /// Append extracted records, dropping those without a body.
    pub fn add_records(&mut self, records: impl IntoIterator<Item = ReviewRecord>) -> usize {
        let before = self.records.len();
        self.records
            .extend(records.into_iter().filter(ReviewRecord::is_retainable));
        self.records.len() - before
    }

    /// Record a successful page transition.
    pub fn next_page(&mut self) {
        self.page += 1;
    }

    pub fn finish(mut self, termination: TerminationReason) -> CrawlOutcome {
        self.advance(CrawlState::Done);
        CrawlOutcome {
            records: self.records,
            pages_visited: self.page,
            termination,
        }
    }

    pub fn fail(&mut self) {
        error!(url = %self.url, page = self.page, state = ?self.state, "Crawl failed");
        self.advance(CrawlState::Failed);
    }
}
