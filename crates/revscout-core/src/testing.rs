//! In-memory browser and scripted inference provider for tests.
//!
//! A [`FakeSite`] describes a paginated review site addressed by a fixed
//! set of locators ([`CONTAINER`], [`TITLE`], ...). [`FakeBrowser`] serves
//! it through the browser traits and counts what the engine did.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use revscout_protocols::browser::{BrowserLauncher, BrowserSession, ElementHandle, PageHandle};
use revscout_protocols::error::{BrowserError, ProviderError};
use revscout_protocols::provider::{CompletionRequest, CompletionResponse, LLMProvider};
use revscout_protocols::types::{LocatorSchema, Message, StopReason, Usage};

pub const CONTAINER: &str = "div.review";
pub const TITLE: &str = "h3.title";
pub const BODY: &str = "p.body";
pub const RATING: &str = "span.rating";
pub const REVIEWER: &str = "span.author";
pub const NEXT: &str = "a.next";

/// Inference reply naming the fake site's locators.
pub fn schema_reply() -> String {
    serde_json::json!({
        "review_container": CONTAINER,
        "title": TITLE,
        "body": BODY,
        "rating": RATING,
        "reviewer": REVIEWER,
        "next_page": NEXT,
    })
    .to_string()
}

/// Schema naming the fake site's locators.
pub fn schema() -> LocatorSchema {
    LocatorSchema::from_locators(CONTAINER, TITLE, BODY, RATING, REVIEWER, NEXT)
        .expect("fake locators are non-empty")
}

async fn hang() {
    std::future::pending::<()>().await
}

// ---------------------------------------------------------------------------
// Site description
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum FieldBehavior {
    Text(Option<String>),
    QueryFails,
    TextFails,
    Hangs,
}

/// One review container.
#[derive(Debug, Clone, Default)]
pub struct FakeReview {
    fields: HashMap<&'static str, FieldBehavior>,
}

impl FakeReview {
    pub fn new() -> Self {
        Self::default()
    }

    /// A review with all four fields present.
    pub fn full(title: &str, body: &str, rating: &str, reviewer: &str) -> Self {
        Self::new()
            .with(TITLE, title)
            .with(BODY, body)
            .with(RATING, rating)
            .with(REVIEWER, reviewer)
    }

    pub fn with(mut self, locator: &'static str, text: &str) -> Self {
        self.fields
            .insert(locator, FieldBehavior::Text(Some(text.to_string())));
        self
    }

    /// The locator matches, but its text content is null.
    pub fn with_null_text(mut self, locator: &'static str) -> Self {
        self.fields.insert(locator, FieldBehavior::Text(None));
        self
    }

    pub fn with_failing_query(mut self, locator: &'static str) -> Self {
        self.fields.insert(locator, FieldBehavior::QueryFails);
        self
    }

    pub fn with_failing_text(mut self, locator: &'static str) -> Self {
        self.fields.insert(locator, FieldBehavior::TextFails);
        self
    }

    pub fn with_hanging(mut self, locator: &'static str) -> Self {
        self.fields.insert(locator, FieldBehavior::Hangs);
        self
    }

    /// Element handle for this container.
    pub fn element(&self) -> FakeElement {
        FakeElement {
            review: self.clone(),
        }
    }
}

/// What clicking the next-page control does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Moves to the following page.
    Advance,
    /// The click itself errors.
    Fail,
    /// The click never completes.
    Hang,
    /// The click lands but the page never settles.
    SettleFails,
}

/// Next-page control of one page.
#[derive(Debug, Clone)]
pub struct FakeNext {
    visible: Result<bool, ()>,
    click: ClickOutcome,
}

impl FakeNext {
    pub fn visible() -> Self {
        Self {
            visible: Ok(true),
            click: ClickOutcome::Advance,
        }
    }

    pub fn hidden() -> Self {
        Self {
            visible: Ok(false),
            click: ClickOutcome::Advance,
        }
    }

    /// The visibility check errors.
    pub fn unknown_visibility() -> Self {
        Self {
            visible: Err(()),
            click: ClickOutcome::Advance,
        }
    }

    pub fn on_click(mut self, click: ClickOutcome) -> Self {
        self.click = click;
        self
    }
}

/// One page of results.
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    reviews: Vec<FakeReview>,
    next: Option<FakeNext>,
    containers_fail: bool,
}

impl FakePage {
    pub fn new(reviews: Vec<FakeReview>) -> Self {
        Self {
            reviews,
            ..Default::default()
        }
    }

    pub fn with_next(mut self, next: FakeNext) -> Self {
        self.next = Some(next);
        self
    }

    /// The container query errors on this page.
    pub fn with_failing_containers(mut self) -> Self {
        self.containers_fail = true;
        self
    }
}

/// What the initial navigation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GotoOutcome {
    Load,
    /// The browser reports a navigation error.
    Fail,
    /// The browser reports its own timeout.
    TimeOut,
    /// The navigation never completes.
    Hang,
}

/// A paginated review site.
#[derive(Debug, Clone)]
pub struct FakeSite {
    markup: String,
    pages: Vec<FakePage>,
    goto: GotoOutcome,
    content_fails: bool,
}

impl FakeSite {
    pub fn new(pages: Vec<FakePage>) -> Self {
        Self {
            markup: "<html><body><div class=\"review\">...</div></body></html>".to_string(),
            pages,
            goto: GotoOutcome::Load,
            content_fails: false,
        }
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    pub fn with_goto(mut self, goto: GotoOutcome) -> Self {
        self.goto = goto;
        self
    }

    pub fn with_failing_content(mut self) -> Self {
        self.content_fails = true;
        self
    }
}

// ---------------------------------------------------------------------------
// Browser
// ---------------------------------------------------------------------------

/// Counters of browser activity.
#[derive(Debug, Default)]
pub struct FakeStats {
    launches: AtomicUsize,
    pages_opened: AtomicUsize,
    navigations: AtomicUsize,
    clicks: AtomicUsize,
    releases: AtomicUsize,
    closes: AtomicUsize,
}

impl FakeStats {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn pages_opened(&self) -> usize {
        self.pages_opened.load(Ordering::SeqCst)
    }

    pub fn navigations(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }

    pub fn clicks(&self) -> usize {
        self.clicks.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LaunchFailure {
    Launch,
    NewPage,
}

/// Launcher serving a [`FakeSite`].
pub struct FakeBrowser {
    site: Arc<FakeSite>,
    stats: Arc<FakeStats>,
    failure: Option<LaunchFailure>,
}

impl FakeBrowser {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site: Arc::new(site),
            stats: Arc::new(FakeStats::default()),
            failure: None,
        }
    }

    /// Launching the browser fails.
    pub fn failing_launch(mut self) -> Self {
        self.failure = Some(LaunchFailure::Launch);
        self
    }

    /// Launching succeeds, opening a page fails.
    pub fn failing_new_page(mut self) -> Self {
        self.failure = Some(LaunchFailure::NewPage);
        self
    }

    pub fn stats(&self) -> Arc<FakeStats> {
        self.stats.clone()
    }
}

#[async_trait]
impl BrowserLauncher for FakeBrowser {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        self.stats.launches.fetch_add(1, Ordering::SeqCst);
        if self.failure == Some(LaunchFailure::Launch) {
            return Err(BrowserError::ChromeNotFound);
        }
        Ok(Box::new(FakeSession {
            site: self.site.clone(),
            stats: self.stats.clone(),
            new_page_fails: self.failure == Some(LaunchFailure::NewPage),
        }))
    }
}

struct FakeSession {
    site: Arc<FakeSite>,
    stats: Arc<FakeStats>,
    new_page_fails: bool,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn new_page(&self) -> Result<Box<dyn PageHandle>, BrowserError> {
        if self.new_page_fails {
            return Err(BrowserError::ConnectionFailed("target crashed".to_string()));
        }
        self.stats.pages_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakePageHandle {
            site: self.site.clone(),
            stats: self.stats.clone(),
            cursor: Arc::new(Mutex::new(Cursor::default())),
        }))
    }

    async fn close(&self) -> Result<(), BrowserError> {
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Cursor {
    page: usize,
    settle_fails: bool,
}

struct FakePageHandle {
    site: Arc<FakeSite>,
    stats: Arc<FakeStats>,
    cursor: Arc<Mutex<Cursor>>,
}

impl FakePageHandle {
    fn current(&self) -> Option<&FakePage> {
        self.site.pages.get(self.cursor.lock().page)
    }
}

#[async_trait]
impl PageHandle for FakePageHandle {
    async fn goto(&self, url: &str, _timeout: Duration) -> Result<(), BrowserError> {
        self.stats.navigations.fetch_add(1, Ordering::SeqCst);
        match self.site.goto {
            GotoOutcome::Load => Ok(()),
            GotoOutcome::Fail => Err(BrowserError::NavigationFailed(format!(
                "net::ERR_NAME_NOT_RESOLVED at {}",
                url
            ))),
            GotoOutcome::TimeOut => Err(BrowserError::Timeout("page load".to_string())),
            GotoOutcome::Hang => {
                hang().await;
                Ok(())
            }
        }
    }

    async fn wait_for_network_idle(&self, _timeout: Duration) -> Result<(), BrowserError> {
        let mut cursor = self.cursor.lock();
        if std::mem::take(&mut cursor.settle_fails) {
            return Err(BrowserError::NavigationFailed("page crashed".to_string()));
        }
        Ok(())
    }

    async fn content(&self) -> Result<String, BrowserError> {
        if self.site.content_fails {
            return Err(BrowserError::SessionClosed);
        }
        Ok(self.site.markup.clone())
    }

    async fn query_all(&self, locator: &str) -> Result<Vec<Box<dyn ElementHandle>>, BrowserError> {
        let Some(page) = self.current() else {
            return Ok(Vec::new());
        };
        if page.containers_fail {
            return Err(BrowserError::StaleElement("document replaced".to_string()));
        }
        if locator != CONTAINER {
            return Ok(Vec::new());
        }
        Ok(page
            .reviews
            .iter()
            .map(|review| Box::new(review.element()) as Box<dyn ElementHandle>)
            .collect())
    }

    async fn query(&self, locator: &str) -> Result<Option<Box<dyn ElementHandle>>, BrowserError> {
        if locator != NEXT {
            return Ok(None);
        }
        let next = self.current().and_then(|page| page.next.clone());
        Ok(next.map(|next| {
            Box::new(NextControl {
                next,
                stats: self.stats.clone(),
                cursor: self.cursor.clone(),
            }) as Box<dyn ElementHandle>
        }))
    }

    async fn release_elements(&self) -> Result<(), BrowserError> {
        self.stats.releases.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Review container element.
pub struct FakeElement {
    review: FakeReview,
}

#[async_trait]
impl ElementHandle for FakeElement {
    async fn query(&self, locator: &str) -> Result<Option<Box<dyn ElementHandle>>, BrowserError> {
        match self.review.fields.get(locator) {
            None => Ok(None),
            Some(FieldBehavior::QueryFails) => Err(BrowserError::InvalidLocator {
                locator: locator.to_string(),
                message: "SyntaxError".to_string(),
            }),
            Some(FieldBehavior::Hangs) => {
                hang().await;
                Ok(None)
            }
            Some(FieldBehavior::Text(text)) => {
                Ok(Some(Box::new(TextNode(Ok(text.clone()))) as Box<dyn ElementHandle>))
            }
            Some(FieldBehavior::TextFails) => {
                Ok(Some(Box::new(TextNode(Err(()))) as Box<dyn ElementHandle>))
            }
        }
    }

    async fn text_content(&self) -> Result<Option<String>, BrowserError> {
        Ok(None)
    }

    async fn click(&self) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn is_visible(&self) -> Result<bool, BrowserError> {
        Ok(true)
    }
}

struct TextNode(Result<Option<String>, ()>);

#[async_trait]
impl ElementHandle for TextNode {
    async fn query(&self, _locator: &str) -> Result<Option<Box<dyn ElementHandle>>, BrowserError> {
        Ok(None)
    }

    async fn text_content(&self) -> Result<Option<String>, BrowserError> {
        self.0
            .clone()
            .map_err(|_| BrowserError::StaleElement("node detached".to_string()))
    }

    async fn click(&self) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn is_visible(&self) -> Result<bool, BrowserError> {
        Ok(true)
    }
}

struct NextControl {
    next: FakeNext,
    stats: Arc<FakeStats>,
    cursor: Arc<Mutex<Cursor>>,
}

#[async_trait]
impl ElementHandle for NextControl {
    async fn query(&self, _locator: &str) -> Result<Option<Box<dyn ElementHandle>>, BrowserError> {
        Ok(None)
    }

    async fn text_content(&self) -> Result<Option<String>, BrowserError> {
        Ok(Some("Next".to_string()))
    }

    async fn click(&self) -> Result<(), BrowserError> {
        self.stats.clicks.fetch_add(1, Ordering::SeqCst);
        match self.next.click {
            ClickOutcome::Advance => {
                self.cursor.lock().page += 1;
                Ok(())
            }
            ClickOutcome::Fail => Err(BrowserError::ActionFailed(
                "element not clickable".to_string(),
            )),
            ClickOutcome::Hang => {
                hang().await;
                Ok(())
            }
            ClickOutcome::SettleFails => {
                self.cursor.lock().settle_fails = true;
                Ok(())
            }
        }
    }

    async fn is_visible(&self) -> Result<bool, BrowserError> {
        self.next
            .visible
            .map_err(|_| BrowserError::StaleElement("control detached".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Inference provider
// ---------------------------------------------------------------------------

/// Provider answering from a script, recording every request.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
    delay: Option<Duration>,
}

impl ScriptedProvider {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self::scripted(vec![Ok(reply.into())])
    }

    pub fn failing(error: ProviderError) -> Self {
        Self::scripted(vec![Err(error)])
    }

    pub fn scripted(replies: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Delay every reply.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let model = request.model.clone();
        self.requests.lock().push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.replies.lock().pop_front().unwrap_or_else(|| {
            Err(ProviderError::InvalidResponse(
                "no scripted reply left".to_string(),
            ))
        })?;

        Ok(CompletionResponse {
            id: "scripted-1".to_string(),
            model,
            message: Message::assistant(reply),
            stop_reason: StopReason::EndTurn,
            usage: Usage::default(),
        })
    }
}
