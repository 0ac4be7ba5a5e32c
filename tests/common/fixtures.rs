//! Fixture builders

use std::sync::Arc;

use terabox_bot::config::{default_hosts, BrowserSettings};
use terabox_bot::resolver::{ExtractionBackend, Link, LinkResolver, PatternValidator, SizeEstimator};

/// A validated share link on the default host list.
pub fn share_link(id: &str) -> Link {
    PatternValidator::new(&default_hosts())
        .unwrap()
        .parse(&format!("https://terabox.com/s/{}", id))
        .unwrap()
}

/// Browser settings with the shortest windows the config allows.
pub fn browser_settings(max_sessions: usize) -> BrowserSettings {
    BrowserSettings {
        wait_timeout_secs: 1,
        navigation_timeout_secs: 1,
        poll_interval_ms: 10,
        max_sessions,
        ..BrowserSettings::default()
    }
}

pub fn resolver_with(backend: Arc<dyn ExtractionBackend>) -> LinkResolver {
    LinkResolver::new(
        PatternValidator::new(&default_hosts()).unwrap(),
        backend,
        SizeEstimator::default(),
    )
}

/// JSON body of a successful resolver API answer with one file.
pub fn api_envelope(file_name: &str, size: Option<&str>, download_url: &str) -> serde_json::Value {
    let mut file = serde_json::json!({
        "fileName": file_name,
        "downloadUrl": download_url,
    });
    if let Some(size) = size {
        file["size"] = serde_json::Value::String(size.to_string());
    }
    serde_json::json!({ "success": true, "data": [file] })
}
