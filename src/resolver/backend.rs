//! Extraction backend abstraction
//!
//! One backend is active per deployment and picked from
//! [`AppConfig::backend`](crate::core::config::AppConfig). Calling code only
//! sees [`ExtractionBackend`], so the fragile DOM-scraping variant can be
//! swapped for the API variant (or retired) without touching the bot layer.

use async_trait::async_trait;
use std::sync::Arc;

use super::api::RemoteApiBackend;
use super::browser::{chromium::ChromiumLauncher, BrowserBackend};
use super::types::{Link, ResolutionFailure, ResolutionResult};
use crate::core::config::{AppConfig, BackendKind};
use crate::core::error::AppResult;

/// Turns a validated share link into a direct download descriptor.
///
/// Implementations must finish within their configured wait window and
/// report one of `ExtractionTimeout`, `ExtractionEmpty` or `BackendError`
/// on failure. They never return `InvalidLink`; validation happens before.
#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    /// Short name used in logs and metric labels (e.g. "api", "browser")
    fn name(&self) -> &'static str;

    async fn resolve(&self, link: &Link) -> Result<ResolutionResult, ResolutionFailure>;
}

/// Builds the backend selected by configuration.
pub fn build_backend(config: &AppConfig) -> AppResult<Arc<dyn ExtractionBackend>> {
    let backend: Arc<dyn ExtractionBackend> = match config.backend {
        BackendKind::Api => Arc::new(RemoteApiBackend::from_settings(&config.api)?),
        BackendKind::Browser => Arc::new(BrowserBackend::new(
            ChromiumLauncher::from_settings(&config.browser),
            &config.browser,
        )),
    };

    log::info!("Extraction backend: {}", backend.name());
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_browser_backend_by_default() {
        let backend = build_backend(&AppConfig::default()).unwrap();
        assert_eq!(backend.name(), "browser");
    }

    #[test]
    fn test_build_api_backend() {
        let mut config = AppConfig {
            backend: BackendKind::Api,
            ..AppConfig::default()
        };
        config.api.endpoint = Some("https://resolver.example/api".to_string());

        let backend = build_backend(&config).unwrap();
        assert_eq!(backend.name(), "api");
    }

    #[test]
    fn test_build_api_backend_without_endpoint_fails() {
        let config = AppConfig {
            backend: BackendKind::Api,
            ..AppConfig::default()
        };
        assert!(build_backend(&config).is_err());
    }
}
