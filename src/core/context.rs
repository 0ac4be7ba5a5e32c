//! Application context built once at startup

use std::sync::Arc;
use std::time::Instant;

use super::config::AppConfig;
use super::error::AppResult;
use crate::resolver::LinkResolver;

/// Everything a request needs, shared by the dispatcher and the CLI.
pub struct AppContext {
    pub config: AppConfig,
    pub resolver: Arc<LinkResolver>,
    pub started: Instant,
}

impl AppContext {
    pub fn new(config: AppConfig, resolver: LinkResolver) -> Self {
        Self {
            config,
            resolver: Arc::new(resolver),
            started: Instant::now(),
        }
    }

    /// Builds the resolver (and its backend) from `config`.
    pub fn from_config(config: AppConfig) -> AppResult<Arc<Self>> {
        let resolver = LinkResolver::from_config(&config)?;
        Ok(Arc::new(Self::new(config, resolver)))
    }

    pub fn backend_name(&self) -> &'static str {
        self.resolver.backend_name()
    }
}
