//! Link Resolver: share link in, direct download descriptor (or classified failure) out.
//!
//! - `validator`: share-link grammar
//! - `backend`: the [`ExtractionBackend`] seam and config-driven selection
//! - `api` / `browser`: the two backend variants
//! - `estimate`: size label to download-time estimate

pub mod api;
pub mod backend;
pub mod browser;
pub mod estimate;
pub mod types;
pub mod validator;

use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

pub use backend::{build_backend, ExtractionBackend};
pub use estimate::{DownloadEstimate, SizeEstimator};
pub use types::{Link, ResolutionFailure, ResolutionResult};
pub use validator::PatternValidator;

use crate::core::config::AppConfig;
use crate::core::error::AppResult;
use crate::core::metrics;

/// What the user should be told about one link
#[derive(Debug, Clone, PartialEq)]
pub enum UserFacingReply {
    Resolved {
        result: ResolutionResult,
        /// Present when the backend reported a size label
        estimate: Option<DownloadEstimate>,
    },
    InvalidLink,
    /// Resolver timed out or had nothing usable
    CouldNotExtract,
    /// Resolver unreachable or broken
    Failed,
}

impl From<ResolutionFailure> for UserFacingReply {
    fn from(failure: ResolutionFailure) -> Self {
        match failure {
            ResolutionFailure::InvalidLink => UserFacingReply::InvalidLink,
            ResolutionFailure::ExtractionTimeout | ResolutionFailure::ExtractionEmpty => {
                UserFacingReply::CouldNotExtract
            }
            ResolutionFailure::BackendError(_) => UserFacingReply::Failed,
        }
    }
}

/// Validator + one backend + estimator, shared by every request
pub struct LinkResolver {
    validator: PatternValidator,
    backend: Arc<dyn ExtractionBackend>,
    estimator: SizeEstimator,
}

impl LinkResolver {
    pub fn new(validator: PatternValidator, backend: Arc<dyn ExtractionBackend>, estimator: SizeEstimator) -> Self {
        Self {
            validator,
            backend,
            estimator,
        }
    }

    /// Builds the resolver with the backend selected in `config`.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        Ok(Self::new(
            PatternValidator::new(&config.hosts)?,
            build_backend(config)?,
            SizeEstimator::new(&config.estimator),
        ))
    }

    pub fn validator(&self) -> &PatternValidator {
        &self.validator
    }

    pub fn estimator(&self) -> &SizeEstimator {
        &self.estimator
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Validates `text` and, if it is a share link, runs the backend once.
    pub async fn resolve(&self, text: &str) -> Result<ResolutionResult, ResolutionFailure> {
        let Some(link) = self.validator.parse(text) else {
            metrics::record_resolution(self.backend.name(), ResolutionFailure::InvalidLink.label(), 0.0);
            return Err(ResolutionFailure::InvalidLink);
        };
        self.resolve_link(&link).await
    }

    /// Runs the backend for an already validated link.
    ///
    /// A panic inside the backend is caught here and reported as
    /// `BackendError`; it never takes the bot down.
    pub async fn resolve_link(&self, link: &Link) -> Result<ResolutionResult, ResolutionFailure> {
        let backend = self.backend.name();
        let started = Instant::now();

        let outcome = AssertUnwindSafe(self.backend.resolve(link))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(ResolutionFailure::backend(format!(
                    "backend panicked: {}",
                    panic_message(panic.as_ref())
                )))
            });

        let elapsed = started.elapsed();
        match &outcome {
            Ok(result) => {
                log::info!("✅ [{}] Resolved {} in {:.2}s", backend, link, elapsed.as_secs_f64());
                log::debug!("[{}] {:?}", backend, result);
            }
            Err(failure @ (ResolutionFailure::ExtractionTimeout | ResolutionFailure::ExtractionEmpty)) => {
                log::warn!("⚠️  [{}] {} for {} after {:.2}s", backend, failure, link, elapsed.as_secs_f64());
            }
            Err(failure) => {
                log::error!("❌ [{}] {} for {} after {:.2}s", backend, failure, link, elapsed.as_secs_f64());
            }
        }

        let label = match &outcome {
            Ok(_) => "success",
            Err(failure) => failure.label(),
        };
        metrics::record_resolution(backend, label, elapsed.as_secs_f64());

        outcome
    }

    /// Request boundary: every input ends in a reply, nothing propagates.
    pub async fn handle_link(&self, text: &str) -> UserFacingReply {
        let outcome = self.resolve(text).await;
        self.reply_for(outcome)
    }

    /// Same as [`handle_link`](Self::handle_link) for a link the caller already validated.
    pub async fn handle_parsed_link(&self, link: &Link) -> UserFacingReply {
        let outcome = self.resolve_link(link).await;
        self.reply_for(outcome)
    }

    fn reply_for(&self, outcome: Result<ResolutionResult, ResolutionFailure>) -> UserFacingReply {
        match outcome {
            Ok(result) => {
                let estimate = result.size_label.as_deref().map(|label| self.estimator.estimate(label));
                UserFacingReply::Resolved { result, estimate }
            }
            Err(failure) => failure.into(),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
