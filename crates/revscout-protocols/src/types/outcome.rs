//! Crawl results returned to the caller.

use serde::Serialize;

use super::ReviewRecord;

/// Why a crawl stopped walking pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerminationReason {
    /// No container matched on this page.
    NoContainers { page: u32 },
    /// No next-page control on this page.
    NoNextPage { page: u32 },
    /// A next-page control exists but is not visible.
    NextPageHidden { page: u32 },
    /// Clicking next or waiting for the following page failed.
    TransitionFailed { page: u32, reason: String },
    /// The configured page cap was reached.
    PageLimit { page: u32 },
    /// The caller cancelled the crawl.
    Cancelled { page: u32 },
}

impl TerminationReason {
    /// Page on which the crawl stopped.
    pub fn page(&self) -> u32 {
        match self {
            TerminationReason::NoContainers { page }
            | TerminationReason::NoNextPage { page }
            | TerminationReason::NextPageHidden { page }
            | TerminationReason::TransitionFailed { page, .. }
            | TerminationReason::PageLimit { page }
            | TerminationReason::Cancelled { page } => *page,
        }
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::NoContainers { page } => {
                write!(f, "no review containers on page {}", page)
            }
            TerminationReason::NoNextPage { page } => write!(f, "last page reached ({})", page),
            TerminationReason::NextPageHidden { page } => {
                write!(f, "next-page control hidden on page {}", page)
            }
            TerminationReason::TransitionFailed { page, reason } => {
                write!(f, "could not leave page {}: {}", page, reason)
            }
            TerminationReason::PageLimit { page } => write!(f, "page limit reached at {}", page),
            TerminationReason::Cancelled { page } => write!(f, "cancelled on page {}", page),
        }
    }
}

/// Records gathered by a finished crawl.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlOutcome {
    pub records: Vec<ReviewRecord>,
    pub pages_visited: u32,
    pub termination: TerminationReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_termination_page() {
        let reason = TerminationReason::TransitionFailed {
            page: 2,
            reason: "click timed out".to_string(),
        };
        assert_eq!(reason.page(), 2);
        assert!(reason.to_string().contains("click timed out"));
    }

    #[test]
    fn test_termination_serialization() {
        let json = serde_json::to_value(TerminationReason::NoNextPage { page: 3 }).unwrap();
        assert_eq!(json["kind"], "no_next_page");
        assert_eq!(json["page"], 3);
    }
}
