//! Headless Chromium driver built on `chromiumoxide`.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures_util::StreamExt;
use std::path::PathBuf;
use tokio::task::JoinHandle;

use super::{BrowserError, BrowserLauncher, BrowserSession, ScrapedLink};
use crate::core::config::BrowserSettings;

impl From<CdpError> for BrowserError {
    fn from(err: CdpError) -> Self {
        BrowserError::Page(err.to_string())
    }
}

/// Launches one headless Chromium process per session.
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher {
    executable: Option<PathBuf>,
    no_sandbox: bool,
}

impl ChromiumLauncher {
    pub fn from_settings(settings: &BrowserSettings) -> Self {
        Self {
            executable: settings.executable.clone(),
            no_sandbox: settings.no_sandbox,
        }
    }

    fn config(&self) -> Result<BrowserConfig, BrowserError> {
        let mut builder = BrowserConfig::builder()
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--disable-extensions")
            .arg("--no-first-run");

        if self.no_sandbox {
            builder = builder.no_sandbox().arg("--disable-setuid-sandbox");
        }
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(BrowserError::Launch)
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let (browser, mut handler) = Browser::launch(self.config()?)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // The CDP connection only makes progress while the handler is polled.
        let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

        Ok(Box::new(ChromiumSession {
            browser,
            handler_task,
            page: None,
        }))
    }
}

struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Option<Page>,
}

impl ChromiumSession {
    fn page(&self) -> Result<&Page, BrowserError> {
        self.page.as_ref().ok_or(BrowserError::NoPage)
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        let page = self.browser.new_page(url).await?;
        page.wait_for_navigation().await?;
        self.page = Some(page);
        Ok(())
    }

    async fn type_into(&mut self, selector: &str, text: &str) -> Result<(), BrowserError> {
        self.page()?
            .find_element(selector)
            .await?
            .click()
            .await?
            .type_str(text)
            .await?;
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> Result<(), BrowserError> {
        self.page()?.find_element(selector).await?.click().await?;
        Ok(())
    }

    async fn query_link(&mut self, selector: &str) -> Result<Option<ScrapedLink>, BrowserError> {
        let element = match self.page()?.find_element(selector).await {
            Ok(element) => element,
            Err(e) if is_not_rendered(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let text = element.inner_text().await?;
        let href = element
            .property("href")
            .await?
            .and_then(|value| value.as_str().map(str::to_owned));

        Ok(Some(ScrapedLink { text, href }))
    }

    async fn close(self: Box<Self>) -> Result<(), BrowserError> {
        let mut session = *self;
        session.page = None;

        let closed = session.browser.close().await.map(|_| ()).map_err(BrowserError::from);
        if let Err(e) = session.browser.wait().await {
            log::warn!("Browser process did not exit cleanly: {}", e);
        }
        closed
    }
}

/// Errors `find_element` reports while the node is not in the DOM yet.
///
/// A missing match surfaces either as `NotFound` or as a protocol error from
/// describing node id 0. Transport failures are real errors.
fn is_not_rendered(err: &CdpError) -> bool {
    matches!(err, CdpError::NotFound | CdpError::Chrome(_))
}

impl Drop for ChromiumSession {
    // Also runs when a resolution is aborted mid-flight; `Browser` kills its child on drop.
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}
