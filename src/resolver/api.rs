//! Remote API resolver client.
//!
//! Issues one GET to the configured endpoint with the share link as a query
//! parameter and reads the first file descriptor from the JSON envelope:
//!
//! ```json
//! {"success": true, "data": [{"fileName": "x.mp4", "size": "12.4 MB", "downloadUrl": "https://..."}]}
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::backend::ExtractionBackend;
use super::types::{Link, ResolutionFailure, ResolutionResult};
use crate::core::config::ApiSettings;
use crate::core::error::{AppError, AppResult};

#[derive(Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: Option<Vec<ApiDescriptor>>,
}

#[derive(Deserialize)]
struct ApiDescriptor {
    #[serde(default, rename = "fileName", alias = "file_name", alias = "name")]
    file_name: Option<String>,
    #[serde(default, alias = "fileSize")]
    size: Option<String>,
    #[serde(default, rename = "downloadUrl", alias = "download_url", alias = "dlink")]
    download_url: Option<String>,
}

/// Backend that asks a third-party resolver API for the direct link.
pub struct RemoteApiBackend {
    client: reqwest::Client,
    endpoint: String,
    query_param: String,
}

impl RemoteApiBackend {
    /// Creates a client with a request timeout equal to the wait window.
    pub fn new(endpoint: impl Into<String>, query_param: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        Self::with_user_agent(endpoint, query_param, timeout, ApiSettings::default().user_agent)
    }

    pub fn with_user_agent(
        endpoint: impl Into<String>,
        query_param: impl Into<String>,
        timeout: Duration,
        user_agent: impl Into<String>,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.into())
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            query_param: query_param.into(),
        })
    }

    pub fn from_settings(settings: &ApiSettings) -> AppResult<Self> {
        let endpoint = settings
            .endpoint
            .clone()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| AppError::invalid_config("api.endpoint is not set"))?;

        Self::with_user_agent(
            endpoint,
            settings.query_param.clone(),
            settings.timeout(),
            settings.user_agent.clone(),
        )
    }

    /// Endpoint with the URL-escaped link appended as a query parameter.
    fn request_url(&self, link: &Link) -> String {
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{}{}={}",
            self.endpoint,
            separator,
            urlencoding::encode(&self.query_param),
            urlencoding::encode(link.as_str())
        )
    }
}

fn classify_request_error(err: reqwest::Error) -> ResolutionFailure {
    if err.is_timeout() {
        ResolutionFailure::ExtractionTimeout
    } else {
        ResolutionFailure::backend(err)
    }
}

/// Maps a response body to a result.
///
/// Malformed JSON, `success` false or missing, and an empty descriptor list
/// are `BackendError`. A descriptor without a download URL is `ExtractionEmpty`.
pub(crate) fn parse_envelope(body: &str) -> Result<ResolutionResult, ResolutionFailure> {
    let envelope: ApiEnvelope = serde_json::from_str(body)
        .map_err(|e| ResolutionFailure::backend(format!("resolver API returned invalid JSON: {}", e)))?;

    if envelope.success != Some(true) {
        return Err(ResolutionFailure::backend("resolver API reported failure"));
    }

    let descriptor = envelope
        .data
        .and_then(|files| files.into_iter().next())
        .ok_or_else(|| ResolutionFailure::backend("resolver API returned no files"))?;

    let download_url = descriptor
        .download_url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or(ResolutionFailure::ExtractionEmpty)?;

    Ok(ResolutionResult::new(download_url)
        .with_file_name(descriptor.file_name)
        .with_size_label(descriptor.size))
}

#[async_trait]
impl ExtractionBackend for RemoteApiBackend {
    fn name(&self) -> &'static str {
        "api"
    }

    async fn resolve(&self, link: &Link) -> Result<ResolutionResult, ResolutionFailure> {
        let response = self
            .client
            .get(self.request_url(link))
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            log::debug!("Resolver API returned status {} for {}", status, link);
            return Err(ResolutionFailure::backend(format!(
                "resolver API returned status {}",
                status
            )));
        }

        let body = response.text().await.map_err(classify_request_error)?;
        parse_envelope(&body)
    }
}
