//! Browser-driven resolver page scraping.
//!
//! Each request launches its own browser, opens the resolver page, types the
//! share link into the input, clicks the fetch button and polls the DOM for
//! the result link. The browser is closed exactly once on every path.
//!
//! The browser itself sits behind [`BrowserLauncher`] / [`BrowserSession`]:
//! production uses [`chromium::ChromiumLauncher`], tests plug in a double.

pub mod chromium;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::time::{sleep, timeout};

use super::backend::ExtractionBackend;
use super::types::{Link, ResolutionFailure, ResolutionResult};
use crate::core::config::BrowserSettings;
use crate::core::metrics::ActiveSessionGuard;

/// Errors raised by the browser driver
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("page interaction failed: {0}")]
    Page(String),

    #[error("no page is open in this session")]
    NoPage,
}

/// What the result element exposes: display text and resolved `href`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedLink {
    pub text: Option<String>,
    pub href: Option<String>,
}

/// One live browser process with (at most) one page.
#[async_trait]
pub trait BrowserSession: Send {
    /// Opens `url` and waits for navigation to settle.
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    async fn type_into(&mut self, selector: &str, text: &str) -> Result<(), BrowserError>;

    async fn click(&mut self, selector: &str) -> Result<(), BrowserError>;

    /// Reads the first element matching `selector`; `Ok(None)` while it is not rendered yet.
    async fn query_link(&mut self, selector: &str) -> Result<Option<ScrapedLink>, BrowserError>;

    /// Releases the browser. Consumes the session so it cannot be closed twice.
    async fn close(self: Box<Self>) -> Result<(), BrowserError>;
}

/// Starts fresh, isolated browser sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError>;
}

/// [`ExtractionBackend`] that scrapes a resolver web page.
pub struct BrowserBackend<L> {
    launcher: L,
    page_url: String,
    input_selector: String,
    button_selector: String,
    result_selector: String,
    wait_timeout: Duration,
    navigation_timeout: Duration,
    poll_interval: Duration,
    /// Caps concurrently running browsers
    sessions: Semaphore,
}

impl<L: BrowserLauncher> BrowserBackend<L> {
    pub fn new(launcher: L, settings: &BrowserSettings) -> Self {
        Self {
            launcher,
            page_url: settings.page_url.clone(),
            input_selector: settings.input_selector.clone(),
            button_selector: settings.button_selector.clone(),
            result_selector: settings.result_selector.clone(),
            wait_timeout: settings.wait_timeout(),
            navigation_timeout: settings.navigation_timeout(),
            poll_interval: settings.poll_interval().max(Duration::from_millis(1)),
            sessions: Semaphore::new(settings.max_sessions.max(1)),
        }
    }

    async fn scrape(&self, session: &mut dyn BrowserSession, link: &Link) -> Result<ResolutionResult, ResolutionFailure> {
        timeout(self.navigation_timeout, session.navigate(&self.page_url))
            .await
            .map_err(|_| ResolutionFailure::ExtractionTimeout)?
            .map_err(ResolutionFailure::backend)?;

        session
            .type_into(&self.input_selector, link.as_str())
            .await
            .map_err(ResolutionFailure::backend)?;
        session
            .click(&self.button_selector)
            .await
            .map_err(ResolutionFailure::backend)?;

        let scraped = timeout(self.wait_timeout, self.poll_for_result(session))
            .await
            .map_err(|_| ResolutionFailure::ExtractionTimeout)??;

        let download_url = scraped
            .href
            .map(|href| href.trim().to_string())
            .filter(|href| is_usable_href(href))
            .ok_or(ResolutionFailure::ExtractionEmpty)?;

        Ok(ResolutionResult::new(download_url).with_file_name(scraped.text))
    }

    async fn poll_for_result(&self, session: &mut dyn BrowserSession) -> Result<ScrapedLink, ResolutionFailure> {
        loop {
            if let Some(found) = session
                .query_link(&self.result_selector)
                .await
                .map_err(ResolutionFailure::backend)?
            {
                return Ok(found);
            }
            sleep(self.poll_interval).await;
        }
    }
}

/// Rejects placeholders the page renders before the real link arrives.
fn is_usable_href(href: &str) -> bool {
    !href.is_empty() && href != "#" && !href.starts_with("javascript:") && !href.ends_with('#')
}

#[async_trait]
impl<L: BrowserLauncher> ExtractionBackend for BrowserBackend<L> {
    fn name(&self) -> &'static str {
        "browser"
    }

    async fn resolve(&self, link: &Link) -> Result<ResolutionResult, ResolutionFailure> {
        // Queueing for a session counts against the same wait window
        let _permit = timeout(self.wait_timeout, self.sessions.acquire())
            .await
            .map_err(|_| {
                log::warn!("No browser session freed up within {:?} for {}", self.wait_timeout, link);
                ResolutionFailure::ExtractionTimeout
            })?
            .map_err(|_| ResolutionFailure::backend("browser session pool is closed"))?;

        let mut session = self.launcher.launch().await.map_err(ResolutionFailure::backend)?;
        let _active = ActiveSessionGuard::enter();
        log::debug!("Browser session opened for {}", link);

        let outcome = self.scrape(session.as_mut(), link).await;

        if let Err(e) = session.close().await {
            log::warn!("Failed to close browser session: {}", e);
        }
        log::debug!("Browser session closed for {}", link);

        outcome
    }
}
