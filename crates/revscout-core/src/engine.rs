//! Pagination engine.
//!
//! Drives one crawl through its states: open the page, infer the locator
//! schema once, then extract and follow "next page" controls until one of
//! the stop conditions in [`TerminationReason`] holds.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, warn};
use url::Url;

use revscout_protocols::browser::{BrowserLauncher, BrowserSession, ElementHandle, PageHandle};
use revscout_protocols::error::{BrowserError, CrawlError};
use revscout_protocols::types::{CrawlOutcome, LocatorSchema, TerminationReason};

use crate::error::PageTransitionError;
use crate::extractor::FieldExtractor;
use crate::inference::SchemaInferrer;
use crate::session::{CrawlSession, CrawlState};

/// Progress callback, invoked with `"Processing page N"` once per page.
pub type ProgressFn<'a> = &'a (dyn Fn(&str) + Send + Sync);

/// Per-crawl limits.
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Bound for every browser step.
    pub timeout: Duration,
    /// Stop after this many pages.
    pub max_pages: Option<u32>,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_pages: None,
        }
    }
}

/// Crawls every page of reviews reachable from a product URL.
pub struct ReviewCrawler {
    launcher: Arc<dyn BrowserLauncher>,
    inferrer: SchemaInferrer,
    extractor: FieldExtractor,
    settings: CrawlSettings,
}

impl ReviewCrawler {
    pub fn new(
        launcher: Arc<dyn BrowserLauncher>,
        inferrer: SchemaInferrer,
        settings: CrawlSettings,
    ) -> Self {
        Self {
            launcher,
            inferrer,
            extractor: FieldExtractor::new(settings.timeout),
            settings,
        }
    }

    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    /// Crawl `url` to completion.
    pub async fn crawl(
        &self,
        url: &str,
        progress: Option<ProgressFn<'_>>,
    ) -> Result<CrawlOutcome, CrawlError> {
        self.crawl_with_cancel(url, progress, CancellationToken::new())
            .await
    }

    /// Crawl `url` until done or until `cancel` fires.
    ///
    /// Cancellation before the schema is known fails the crawl. Later it
    /// ends the crawl with the records gathered so far.
    pub async fn crawl_with_cancel(
        &self,
        url: &str,
        progress: Option<ProgressFn<'_>>,
        cancel: CancellationToken,
    ) -> Result<CrawlOutcome, CrawlError> {
        let span = tracing::info_span!("crawl", url = %url);
        self.crawl_inner(url, progress, &cancel).instrument(span).await
    }

    async fn crawl_inner(
        &self,
        url: &str,
        progress: Option<ProgressFn<'_>>,
        cancel: &CancellationToken,
    ) -> Result<CrawlOutcome, CrawlError> {
        let target = validate_url(url).inspect_err(|e| error!(error = %e, "Rejected crawl target"))?;
        let mut session = CrawlSession::new(target.as_str());
        info!("Starting crawl");

        let launched = step(cancel, self.settings.timeout, "browser launch", self.launcher.launch())
            .await
            .and_then(|result| result.map_err(CrawlError::Launch));
        let browser = match launched {
            Ok(browser) => browser,
            Err(e) => {
                session.fail();
                error!(error = %e, "Could not start browser");
                return Err(e);
            }
        };

        let result = self
            .run(browser.as_ref(), &mut session, progress, cancel)
            .await;
        self.release(browser.as_ref()).await;

        match result {
            Ok(termination) => {
                let outcome = session.finish(termination);
                info!(
                    records = outcome.records.len(),
                    pages = outcome.pages_visited,
                    termination = %outcome.termination,
                    "Crawl finished"
                );
                Ok(outcome)
            }
            Err(e) => {
                session.fail();
                error!(error = %e, "Crawl aborted");
                Err(e)
            }
        }
    }

    /// Everything between launch and release. Errors only before the schema exists.
    async fn run(
        &self,
        browser: &dyn BrowserSession,
        session: &mut CrawlSession,
        progress: Option<ProgressFn<'_>>,
        cancel: &CancellationToken,
    ) -> Result<TerminationReason, CrawlError> {
        let timeout = self.settings.timeout;

        let page = step(cancel, timeout, "opening a page", browser.new_page())
            .await?
            .map_err(CrawlError::Launch)?;

        self.open(page.as_ref(), session.url(), cancel).await?;
        session.advance(CrawlState::SchemaPending);

        let markup = step(cancel, timeout, "markup capture", page.content())
            .await?
            .map_err(CrawlError::MarkupCapture)?;
        debug!(chars = markup.len(), "Captured page markup");

        let schema = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(CrawlError::Cancelled),
            schema = self.inferrer.infer_schema(&markup) => schema?,
        };
        info!(
            container = schema.review_container(),
            next_page = schema.next_page(),
            "Locator schema inferred"
        );
        session.advance(CrawlState::PageLoaded);

        Ok(self
            .walk(page.as_ref(), &schema, session, progress, cancel)
            .await)
    }

    /// Initial navigation followed by network settle.
    async fn open(
        &self,
        page: &dyn PageHandle,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<(), CrawlError> {
        let timeout = self.settings.timeout;
        let navigation_error = |source: BrowserError| {
            if source.is_timeout() {
                CrawlError::NavigationTimeout {
                    url: url.to_string(),
                    timeout_secs: timeout.as_secs(),
                }
            } else {
                CrawlError::Navigation {
                    url: url.to_string(),
                    source,
                }
            }
        };

        step(cancel, timeout, "navigation", page.goto(url, timeout))
            .await?
            .map_err(&navigation_error)?;
        step(
            cancel,
            timeout,
            "network settle",
            page.wait_for_network_idle(timeout),
        )
        .await?
        .map_err(navigation_error)?;

        debug!("Initial page loaded");
        Ok(())
    }

    /// The page loop. Never fails; every stop is a [`TerminationReason`].
    async fn walk(
        &self,
        page: &dyn PageHandle,
        schema: &LocatorSchema,
        session: &mut CrawlSession,
        progress: Option<ProgressFn<'_>>,
        cancel: &CancellationToken,
    ) -> TerminationReason {
        let timeout = self.settings.timeout;

        loop {
            let page_no = session.page();
            let cancelled = TerminationReason::Cancelled { page: page_no };

            let message = format!("Processing page {}", page_no);
            debug!(page = page_no, "{}", message);
            if let Some(progress) = progress {
                progress(&message);
            }

            let containers =
                match bounded(cancel, timeout, page.query_all(schema.review_container())).await {
                    Ok(Ok(containers)) => containers,
                    Ok(Err(e)) => {
                        warn!(page = page_no, locator = schema.review_container(), error = %e, "Container query failed");
                        Vec::new()
                    }
                    Err(Interrupted::TimedOut) => {
                        warn!(page = page_no, locator = schema.review_container(), "Container query timed out");
                        Vec::new()
                    }
                    Err(Interrupted::Cancelled) => return cancelled,
                };
            if containers.is_empty() {
                warn!(page = page_no, locator = schema.review_container(), "No review containers found");
                return TerminationReason::NoContainers { page: page_no };
            }

            let extraction = join_all(
                containers
                    .iter()
                    .map(|element| self.extractor.extract_record(element.as_ref(), schema)),
            );
            let records = tokio::select! {
                biased;
                _ = cancel.cancelled() => return cancelled,
                records = extraction => records,
            };
            let kept = session.add_records(records);
            session.advance(CrawlState::ElementsExtracted);
            info!(page = page_no, containers = containers.len(), kept, "Extracted reviews");

            session.advance(CrawlState::NextPageCheck);
            let next = match bounded(cancel, timeout, page.query(schema.next_page())).await {
                Ok(Ok(Some(next))) => next,
                Ok(Ok(None)) => {
                    info!(page = page_no, "No next-page control, last page reached");
                    return TerminationReason::NoNextPage { page: page_no };
                }
                Ok(Err(e)) => {
                    warn!(page = page_no, locator = schema.next_page(), error = %e, "Next-page lookup failed");
                    return TerminationReason::NoNextPage { page: page_no };
                }
                Err(Interrupted::TimedOut) => {
                    warn!(page = page_no, locator = schema.next_page(), "Next-page lookup timed out");
                    return TerminationReason::NoNextPage { page: page_no };
                }
                Err(Interrupted::Cancelled) => return cancelled,
            };

            match bounded(cancel, timeout, next.is_visible()).await {
                Ok(Ok(true)) => {}
                Ok(Ok(false)) => {
                    info!(page = page_no, "Next-page control hidden, last page reached");
                    return TerminationReason::NextPageHidden { page: page_no };
                }
                Ok(Err(e)) => {
                    warn!(page = page_no, error = %e, "Next-page visibility check failed");
                    return TerminationReason::NextPageHidden { page: page_no };
                }
                Err(Interrupted::TimedOut) => {
                    warn!(page = page_no, "Next-page visibility check timed out");
                    return TerminationReason::NextPageHidden { page: page_no };
                }
                Err(Interrupted::Cancelled) => return cancelled,
            }

            if self.settings.max_pages.is_some_and(|max| page_no >= max) {
                info!(page = page_no, "Page limit reached");
                return TerminationReason::PageLimit { page: page_no };
            }

            match self.turn_page(page, next.as_ref(), cancel).await {
                Transition::Moved => {}
                Transition::Cancelled => return cancelled,
                Transition::Failed(e) => {
                    warn!(page = page_no, error = %e, "Could not move to the next page");
                    return TerminationReason::TransitionFailed {
                        page: page_no,
                        reason: e.to_string(),
                    };
                }
            }

            drop(next);
            drop(containers);
            self.release_elements(page, page_no).await;

            session.next_page();
            session.advance(CrawlState::PageLoaded);
        }
    }

    /// Drop the previous page's element references. Failures are logged only.
    async fn release_elements(&self, page: &dyn PageHandle, page_no: u32) {
        match tokio::time::timeout(self.settings.timeout, page.release_elements()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(page = page_no, error = %e, "Failed to release element handles"),
            Err(_) => warn!(page = page_no, "Releasing element handles timed out"),
        }
    }

    /// Click the next-page control and wait for the page to settle.
    async fn turn_page(
        &self,
        page: &dyn PageHandle,
        next: &dyn ElementHandle,
        cancel: &CancellationToken,
    ) -> Transition {
        let timeout = self.settings.timeout;
        let timed_out = |step| {
            Transition::Failed(PageTransitionError::Timeout {
                step,
                timeout_secs: timeout.as_secs(),
            })
        };

        match bounded(cancel, timeout, next.click()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Transition::Failed(PageTransitionError::Click(e)),
            Err(Interrupted::TimedOut) => return timed_out("click"),
            Err(Interrupted::Cancelled) => return Transition::Cancelled,
        }

        match bounded(cancel, timeout, page.wait_for_network_idle(timeout)).await {
            Ok(Ok(())) => Transition::Moved,
            Ok(Err(e)) => Transition::Failed(PageTransitionError::Settle(e)),
            Err(Interrupted::TimedOut) => timed_out("network settle"),
            Err(Interrupted::Cancelled) => Transition::Cancelled,
        }
    }

    /// Close the browser session. Failures are logged only.
    async fn release(&self, browser: &dyn BrowserSession) {
        match tokio::time::timeout(self.settings.timeout, browser.close()).await {
            Ok(Ok(())) => debug!("Browser session closed"),
            Ok(Err(e)) => warn!(error = %e, "Failed to close browser session"),
            Err(_) => warn!(
                timeout_secs = self.settings.timeout.as_secs(),
                "Closing browser session timed out"
            ),
        }
    }
}

enum Transition {
    Moved,
    Cancelled,
    Failed(PageTransitionError),
}

enum Interrupted {
    TimedOut,
    Cancelled,
}

/// Await `fut` unless the timeout elapses or `cancel` fires first.
async fn bounded<F: Future>(
    cancel: &CancellationToken,
    timeout: Duration,
    fut: F,
) -> Result<F::Output, Interrupted> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Interrupted::Cancelled),
        result = tokio::time::timeout(timeout, fut) => result.map_err(|_| Interrupted::TimedOut),
    }
}

/// A setup step: an elapsed timeout becomes [`BrowserError::Timeout`],
/// cancellation fails the crawl.
async fn step<T, F>(
    cancel: &CancellationToken,
    timeout: Duration,
    what: &'static str,
    fut: F,
) -> Result<Result<T, BrowserError>, CrawlError>
where
    F: Future<Output = Result<T, BrowserError>>,
{
    match bounded(cancel, timeout, fut).await {
        Ok(result) => Ok(result),
        Err(Interrupted::TimedOut) => Ok(Err(BrowserError::Timeout(format!(
            "{} exceeded {}s",
            what,
            timeout.as_secs()
        )))),
        Err(Interrupted::Cancelled) => Err(CrawlError::Cancelled),
    }
}

fn validate_url(url: &str) -> Result<Url, CrawlError> {
    let parsed = Url::parse(url).map_err(|e| CrawlError::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" | "file" => Ok(parsed),
        other => Err(CrawlError::InvalidUrl {
            url: url.to_string(),
            message: format!("unsupported scheme '{}'", other),
        }),
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
