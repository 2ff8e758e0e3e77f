use std::collections::HashSet;
use std::error::Error as _;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::FetchError;

type RequestHandler = Arc<dyn Fn(&Url) + Send + Sync>;
type HtmlHandler = Arc<dyn Fn(&ElementRef<'_>, &mut VisitContext) + Send + Sync>;
type ErrorHandler = Arc<dyn Fn(&Url, &FetchError) + Send + Sync>;

const MAX_REDIRECTS: usize = 10;

/// Raised by the redirect policy; mapped back to `FetchError::DisallowedDomain`.
#[derive(Debug, Error)]
#[error("redirected to {url}, outside the allowed domains")]
struct OffsiteRedirect {
    url: String,
}

/// Empty `domains` allows any host.
fn host_allowed(domains: &[String], url: &Url) -> bool {
    if domains.is_empty() {
        return true;
    }
    url.host_str().is_some_and(|host| domains.iter().any(|d| d == host))
}

/// Parse a CSS selector, reporting failures as a fetch error.
pub fn parse_selector(selector: &str) -> Result<Selector, FetchError> {
    Selector::parse(selector).map_err(|e| FetchError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Text of an element and all its descendants, trimmed.
pub fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Concatenated text of every descendant matching `selector`, trimmed.
/// Empty when nothing matches.
pub fn child_text(el: &ElementRef<'_>, selector: &Selector) -> String {
    el.select(selector)
        .flat_map(|child| child.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Handed to element triggers; lets a trigger queue further pages.
#[derive(Debug, Default)]
pub struct VisitContext {
    queued: Vec<String>,
}

impl VisitContext {
    /// Queue a link (absolute or relative to the current page) one level deeper.
    pub fn visit(&mut self, link: impl Into<String>) {
        self.queued.push(link.into());
    }
}

pub struct CollectorBuilder {
    allowed_domains: Vec<String>,
    max_depth: usize,
    timeout: Duration,
    user_agent: String,
    on_request: Vec<RequestHandler>,
    on_html: Vec<(String, HtmlHandler)>,
    on_error: Vec<ErrorHandler>,
}

impl CollectorBuilder {
    /// Hosts that may be fetched. Empty means any host.
    pub fn allowed_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_domains = domains.into_iter().map(Into::into).collect();
        self
    }

    /// The first visited page is depth 1; pages queued from it are depth 2, and so on.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn on_request<F>(mut self, f: F) -> Self
    where
        F: Fn(&Url) + Send + Sync + 'static,
    {
        self.on_request.push(Arc::new(f));
        self
    }

    /// Run `f` for every element matching `selector`, in document order.
    pub fn on_html<F>(mut self, selector: &str, f: F) -> Self
    where
        F: Fn(&ElementRef<'_>, &mut VisitContext) + Send + Sync + 'static,
    {
        let handler: HtmlHandler = Arc::new(f);
        self.on_html.push((selector.to_string(), handler));
        self
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&Url, &FetchError) + Send + Sync + 'static,
    {
        self.on_error.push(Arc::new(f));
        self
    }

    pub fn build(self) -> Result<Collector, FetchError> {
        // Redirects are held to the same allow-list as visited URLs.
        let domains = self.allowed_domains.clone();
        let redirects = reqwest::redirect::Policy::custom(move |attempt| {
            if !host_allowed(&domains, attempt.url()) {
                let url = attempt.url().to_string();
                attempt.error(OffsiteRedirect { url })
            } else if attempt.previous().len() >= MAX_REDIRECTS {
                attempt.error("too many redirects")
            } else {
                attempt.follow()
            }
        });

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .redirect(redirects)
            .build()?;

        let on_html = self
            .on_html
            .into_iter()
            .map(|(selector, handler)| Ok((parse_selector(&selector)?, handler)))
            .collect::<Result<Vec<_>, FetchError>>()?;

        Ok(Collector {
            shared: Arc::new(Shared {
                client,
                allowed_domains: self.allowed_domains,
                max_depth: self.max_depth,
                on_request: self.on_request,
                on_html,
                on_error: self.on_error,
            }),
            tasks: JoinSet::new(),
            visited: HashSet::new(),
        })
    }
}

struct Shared {
    client: reqwest::Client,
    allowed_domains: Vec<String>,
    max_depth: usize,
    on_request: Vec<RequestHandler>,
    on_html: Vec<(Selector, HtmlHandler)>,
    on_error: Vec<ErrorHandler>,
}

impl Shared {
    fn is_allowed(&self, url: &Url) -> bool {
        host_allowed(&self.allowed_domains, url)
    }

    fn report_error(&self, url: &Url, err: &FetchError) {
        for handler in &self.on_error {
            handler(url, err);
        }
    }
}

/// Fetches pages concurrently and fires element triggers on their markup.
///
/// Every visit runs as its own task; [`Collector::wait`] joins them all.
pub struct Collector {
    shared: Arc<Shared>,
    tasks: JoinSet<Result<(Vec<Url>, usize), FetchError>>,
    visited: HashSet<Url>,
}

impl Collector {
    pub fn builder() -> CollectorBuilder {
        CollectorBuilder {
            allowed_domains: Vec::new(),
            max_depth: 1,
            timeout: Duration::from_secs(30),
            user_agent: crate::config::USER_AGENT.to_string(),
            on_request: Vec::new(),
            on_html: Vec::new(),
            on_error: Vec::new(),
        }
    }

    /// Start fetching `url` as a depth-1 page. Returns immediately.
    pub fn visit(&mut self, url: &str) -> Result<(), FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            input: url.to_string(),
            reason: e.to_string(),
        })?;
        if !self.shared.is_allowed(&parsed) {
            return Err(FetchError::DisallowedDomain { url: url.to_string() });
        }
        self.spawn(parsed, 1);
        Ok(())
    }

    /// Block until every outstanding fetch (including queued follow-ups) has finished.
    /// Returns the first error any fetch reported.
    pub async fn wait(&mut self) -> Result<(), FetchError> {
        let mut first_error = None;

        while let Some(joined) = self.tasks.join_next().await {
            let (queued, depth) = match joined {
                Ok(Ok((queued, depth))) => (queued, depth),
                Ok(Err(e)) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                    continue;
                }
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(FetchError::Task(e.to_string()));
                    }
                    continue;
                }
            };
            for url in queued {
                if !self.shared.is_allowed(&url) {
                    debug!(%url, "skipping link outside allowed domains");
                    continue;
                }
                self.spawn(url, depth + 1);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn spawn(&mut self, url: Url, depth: usize) {
        if depth > self.shared.max_depth {
            debug!(%url, depth, "max depth reached");
            return;
        }
        if !self.visited.insert(url.clone()) {
            return;
        }

        let shared = Arc::clone(&self.shared);
        self.tasks.spawn(async move {
            match fetch_page(&shared, &url).await {
                Ok(queued) => Ok((queued, depth)),
                Err(e) => {
                    warn!(%url, error = %e, "fetch failed");
                    shared.report_error(&url, &e);
                    Err(e)
                }
            }
        });
    }
}

async fn fetch_page(shared: &Shared, url: &Url) -> Result<Vec<Url>, FetchError> {
    for handler in &shared.on_request {
        handler(url);
    }

    let resp = shared
        .client
        .get(url.clone())
        .send()
        .await
        .map_err(send_error)?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    let is_html = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(true, |ct| ct.contains("html"));
    let body = resp.text().await?;
    if !is_html {
        debug!(%url, "response is not HTML, no triggers fired");
        return Ok(Vec::new());
    }

    Ok(run_triggers(shared, url, &body))
}

fn send_error(err: reqwest::Error) -> FetchError {
    let offsite = std::iter::successors(err.source(), |&e| e.source())
        .find_map(|e| e.downcast_ref::<OffsiteRedirect>())
        .map(|r| r.url.clone());
    match offsite {
        Some(url) => FetchError::DisallowedDomain { url },
        None => FetchError::Network(err),
    }
}

/// Parse `body` and fire every element trigger. Synchronous: the parsed DOM is
/// not `Send` and must not be held across an await point.
fn run_triggers(shared: &Shared, url: &Url, body: &str) -> Vec<Url> {
    let document = Html::parse_document(body);
    let mut ctx = VisitContext::default();

    for (selector, handler) in &shared.on_html {
        for el in document.select(selector) {
            handler(&el, &mut ctx);
        }
    }

    ctx.queued
        .into_iter()
        .filter_map(|link| match url.join(&link) {
            Ok(next) => Some(next),
            Err(e) => {
                debug!(%link, error = %e, "ignoring unparsable link");
                None
            }
        })
        .collect()
}
