//! Scripted browser standing in for Chromium

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use terabox_bot::resolver::browser::{BrowserError, BrowserLauncher, BrowserSession, ScrapedLink};

/// Shared counters; `released` counts every session that went away, closed or dropped.
#[derive(Debug, Default)]
pub struct SessionCounters {
    pub launched: AtomicUsize,
    pub closed: AtomicUsize,
    pub released: AtomicUsize,
    pub open: AtomicUsize,
    pub max_open: AtomicUsize,
    pub typed: std::sync::Mutex<Vec<String>>,
}

impl SessionCounters {
    pub fn launched(&self) -> usize {
        self.launched.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn max_open(&self) -> usize {
        self.max_open.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
pub struct MockLauncher {
    pub counters: Arc<SessionCounters>,
    /// Result element shows up after this many polls; `None` means never
    pub ready_after: Option<usize>,
    pub link: ScrapedLink,
    pub fail_launch: bool,
    pub fail_navigate: bool,
    /// Time spent in `navigate`
    pub page_load: Duration,
}

impl MockLauncher {
    pub fn new(link: ScrapedLink) -> Self {
        Self {
            counters: Arc::new(SessionCounters::default()),
            ready_after: Some(0),
            link,
            fail_launch: false,
            fail_navigate: false,
            page_load: Duration::ZERO,
        }
    }

    pub fn resolving_to(text: &str, href: &str) -> Self {
        Self::new(ScrapedLink {
            text: Some(text.to_string()),
            href: Some(href.to_string()),
        })
    }

    pub fn never_ready() -> Self {
        Self {
            ready_after: None,
            ..Self::new(ScrapedLink::default())
        }
    }
}

#[async_trait]
impl BrowserLauncher for MockLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        if self.fail_launch {
            return Err(BrowserError::Launch("chromium not found".to_string()));
        }

        self.counters.launched.fetch_add(1, Ordering::SeqCst);
        let open = self.counters.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_open.fetch_max(open, Ordering::SeqCst);

        Ok(Box::new(MockSession {
            script: self.clone(),
            polls: 0,
        }))
    }
}

struct MockSession {
    script: MockLauncher,
    polls: usize,
}

#[async_trait]
impl BrowserSession for MockSession {
    async fn navigate(&mut self, _url: &str) -> Result<(), BrowserError> {
        tokio::time::sleep(self.script.page_load).await;
        if self.script.fail_navigate {
            return Err(BrowserError::Page("net::ERR_NAME_NOT_RESOLVED".to_string()));
        }
        Ok(())
    }

    async fn type_into(&mut self, _selector: &str, text: &str) -> Result<(), BrowserError> {
        self.script.counters.typed.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn click(&mut self, _selector: &str) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn query_link(&mut self, _selector: &str) -> Result<Option<ScrapedLink>, BrowserError> {
        self.polls += 1;
        Ok(match self.script.ready_after {
            Some(n) if self.polls > n => Some(self.script.link.clone()),
            _ => None,
        })
    }

    async fn close(self: Box<Self>) -> Result<(), BrowserError> {
        self.script.counters.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.script.counters.open.fetch_sub(1, Ordering::SeqCst);
        self.script.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}
