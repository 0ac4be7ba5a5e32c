//! Values flowing through a single resolution

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A share link that passed [`PatternValidator`](super::PatternValidator)
///
/// Only the validator can build one, so every backend receives input that
/// already matches the accepted grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link(String);

impl Link {
    pub(crate) fn new_unchecked(link: impl Into<String>) -> Self {
        Link(link.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Link {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalized descriptor returned by every backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    pub file_name: Option<String>,
    pub download_url: String,
    /// Free-form label such as `12.4 MB`
    pub size_label: Option<String>,
}

impl ResolutionResult {
    pub fn new(download_url: impl Into<String>) -> Self {
        Self {
            file_name: None,
            download_url: download_url.into(),
            size_label: None,
        }
    }

    pub fn with_file_name(mut self, file_name: Option<String>) -> Self {
        self.file_name = non_blank(file_name);
        self
    }

    pub fn with_size_label(mut self, size_label: Option<String>) -> Self {
        self.size_label = non_blank(size_label);
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Classified outcome of a failed resolution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionFailure {
    /// Input did not match the share-link grammar
    #[error("link is not a supported share link")]
    InvalidLink,

    /// Resolver did not answer within the wait window
    #[error("resolver did not answer in time")]
    ExtractionTimeout,

    /// Resolver answered but without a usable download link
    #[error("resolver returned no usable download link")]
    ExtractionEmpty,

    /// Resolver unreachable, failed, or answered with malformed data
    #[error("backend error: {0}")]
    BackendError(String),
}

impl ResolutionFailure {
    pub fn backend(detail: impl fmt::Display) -> Self {
        ResolutionFailure::BackendError(detail.to_string())
    }

    /// Metric label for this failure
    pub fn label(&self) -> &'static str {
        match self {
            ResolutionFailure::InvalidLink => "invalid_link",
            ResolutionFailure::ExtractionTimeout => "timeout",
            ResolutionFailure::ExtractionEmpty => "empty",
            ResolutionFailure::BackendError(_) => "backend_error",
        }
    }
}
