//! Prometheus metrics for link resolution
//!
//! Everything is registered in the default registry on first use and exposed
//! by the keep-alive server at `/metrics`.

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, Encoder, HistogramVec, IntCounterVec,
    IntGauge, TextEncoder,
};

/// Resolutions by backend and outcome
/// Labels: backend (api/browser), outcome (success/invalid_link/timeout/empty/backend_error)
pub static RESOLUTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "terabox_resolutions_total",
        "Total number of link resolutions by backend and outcome",
        &["backend", "outcome"]
    )
    .expect("register terabox_resolutions_total")
});

/// Time spent inside the extraction backend
pub static RESOLVE_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "terabox_resolve_duration_seconds",
        "Time spent resolving a share link",
        &["backend"],
        vec![0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 15.0, 30.0, 60.0]
    )
    .expect("register terabox_resolve_duration_seconds")
});

/// Browser processes currently alive
pub static BROWSER_SESSIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "terabox_browser_sessions_active",
        "Number of headless browser sessions currently open"
    )
    .expect("register terabox_browser_sessions_active")
});

/// Incoming Telegram messages
/// Labels: kind (command/link/invalid)
pub static MESSAGES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "terabox_messages_total",
        "Total number of incoming messages by kind",
        &["kind"]
    )
    .expect("register terabox_messages_total")
});

/// Forces registration so `/metrics` lists every series from the start.
pub fn init_metrics() {
    Lazy::force(&RESOLUTIONS_TOTAL);
    Lazy::force(&RESOLVE_DURATION_SECONDS);
    Lazy::force(&BROWSER_SESSIONS_ACTIVE);
    Lazy::force(&MESSAGES_TOTAL);
}

pub fn record_resolution(backend: &str, outcome: &str, elapsed_secs: f64) {
    RESOLUTIONS_TOTAL.with_label_values(&[backend, outcome]).inc();
    RESOLVE_DURATION_SECONDS.with_label_values(&[backend]).observe(elapsed_secs);
}

pub fn record_message(kind: &str) {
    MESSAGES_TOTAL.with_label_values(&[kind]).inc();
}

/// Keeps [`BROWSER_SESSIONS_ACTIVE`] in step with a session's lifetime.
pub struct ActiveSessionGuard(());

impl ActiveSessionGuard {
    pub fn enter() -> Self {
        BROWSER_SESSIONS_ACTIVE.inc();
        Self(())
    }
}

impl Drop for ActiveSessionGuard {
    fn drop(&mut self) {
        BROWSER_SESSIONS_ACTIVE.dec();
    }
}

/// Renders the default registry in the text exposition format.
pub fn gather_text() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_contains_resolution_series() {
        init_metrics();
        record_resolution("api", "success", 0.3);

        let text = gather_text().unwrap();
        assert!(text.contains("terabox_resolutions_total"));
        assert!(text.contains("terabox_resolve_duration_seconds"));
    }
}
