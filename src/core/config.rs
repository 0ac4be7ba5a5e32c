//! Application configuration
//!
//! Settings are merged by [`figment`] in this order (later wins):
//! 1. built-in defaults ([`AppConfig::default`])
//! 2. optional TOML file (`terabox-bot.toml` or `--config <path>`)
//! 3. raw `BOT_TOKEN` / `PORT` environment variables
//! 4. `TERABOX_`-prefixed environment variables, `__` separating nested keys
//!    (e.g. `TERABOX_BROWSER__WAIT_TIMEOUT_SECS=20`)
//!
//! The config is loaded once at startup and handed to [`AppContext`](super::context::AppContext);
//! nothing reads the environment after that.

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::{AppError, AppResult};

/// Default config file looked up in the working directory
pub const CONFIG_FILE: &str = "terabox-bot.toml";

/// Prefix for nested environment overrides
pub const ENV_PREFIX: &str = "TERABOX_";

/// Which extraction backend is active for this deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Call a resolver JSON API
    Api,
    /// Drive a headless browser against a resolver web page
    Browser,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Api => "api",
            BackendKind::Browser => "browser",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote API backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Resolver endpoint; required when `backend = "api"`
    pub endpoint: Option<String>,
    /// Query parameter carrying the share link
    pub query_param: String,
    /// Bounded wait for the whole request
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            query_param: "url".to_string(),
            timeout_secs: 15,
            user_agent: concat!("terabox-bot/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Browser-driven backend settings
///
/// Selectors belong to a third-party page and change without notice, so all
/// of them live here rather than in code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub page_url: String,
    pub input_selector: String,
    pub button_selector: String,
    pub result_selector: String,
    /// How long to wait for the result element after clicking
    pub wait_timeout_secs: u64,
    /// How long page navigation may take before giving up
    pub navigation_timeout_secs: u64,
    pub poll_interval_ms: u64,
    /// Upper bound on concurrently running browser processes
    pub max_sessions: usize,
    /// Pass `--no-sandbox` (needed in most containers)
    pub no_sandbox: bool,
    /// Chrome/Chromium binary; autodetected when unset
    pub executable: Option<PathBuf>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            page_url: "https://teraboxdown.pages.dev/".to_string(),
            input_selector: "#url".to_string(),
            button_selector: "#fetchFile".to_string(),
            result_selector: ".result-download-link a".to_string(),
            wait_timeout_secs: 15,
            navigation_timeout_secs: 30,
            poll_interval_ms: 250,
            max_sessions: 2,
            no_sandbox: true,
            executable: None,
        }
    }
}

impl BrowserSettings {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Download-time estimator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorSettings {
    /// Nominal transfer rate in bits per second
    pub rate_bits_per_sec: f64,
    /// Unit name -> bytes multiplier, matched case-insensitively
    pub units: BTreeMap<String, u64>,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        let units = [("B", 1), ("KB", 1 << 10), ("MB", 1 << 20), ("GB", 1 << 30)]
            .into_iter()
            .map(|(unit, bytes)| (unit.to_string(), bytes))
            .collect();

        Self {
            // 10 Mbit/s
            rate_bits_per_sec: 10.0 * 1024.0 * 1024.0,
            units,
        }
    }
}

/// Top-level configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Telegram bot token (`BOT_TOKEN`)
    pub bot_token: String,
    /// Keep-alive web server port (`PORT`)
    pub port: u16,
    pub log_level: String,
    pub log_file: Option<String>,
    pub backend: BackendKind,
    /// Accepted share-link hostnames
    pub hosts: Vec<String>,
    pub api: ApiSettings,
    pub browser: BrowserSettings,
    pub estimator: EstimatorSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            port: 3000,
            log_level: "info".to_string(),
            log_file: None,
            backend: BackendKind::Browser,
            hosts: default_hosts(),
            api: ApiSettings::default(),
            browser: BrowserSettings::default(),
            estimator: EstimatorSettings::default(),
        }
    }
}

// Token stays out of logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("bot_token", &if self.bot_token.is_empty() { "<unset>" } else { "<redacted>" })
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("log_file", &self.log_file)
            .field("backend", &self.backend)
            .field("hosts", &self.hosts)
            .field("api", &self.api)
            .field("browser", &self.browser)
            .field("estimator", &self.estimator)
            .finish()
    }
}

/// Share-link hostnames accepted out of the box
pub fn default_hosts() -> Vec<String> {
    [
        "terabox.com",
        "1024terabox.com",
        "teraboxapp.com",
        "teraboxlink.com",
        "terasharelink.com",
        "terafileshare.com",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl AppConfig {
    /// Builds the provider chain without extracting it.
    pub fn figment(file: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(file))
            .merge(Env::raw().only(&["BOT_TOKEN", "PORT"]))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads and validates the configuration.
    ///
    /// `file` defaults to [`CONFIG_FILE`]; a missing file is not an error.
    pub fn load(file: Option<&Path>) -> AppResult<Self> {
        Self::load_with_backend(file, None)
    }

    /// Like [`load`](Self::load), with the backend forced before validation.
    pub fn load_with_backend(file: Option<&Path>, backend: Option<BackendKind>) -> AppResult<Self> {
        let file = file.unwrap_or_else(|| Path::new(CONFIG_FILE));
        let mut config: AppConfig = Self::figment(file).extract()?;
        if let Some(backend) = backend {
            config.backend = backend;
        }
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would make every request fail.
    pub fn validate(&self) -> AppResult<()> {
        if self.hosts.is_empty() || self.hosts.iter().any(|h| h.trim().is_empty()) {
            return Err(AppError::invalid_config("hosts must be a non-empty list of hostnames"));
        }

        match self.backend {
            BackendKind::Api => {
                let endpoint = self.api.endpoint.as_deref().unwrap_or_default();
                if endpoint.trim().is_empty() {
                    return Err(AppError::invalid_config("api.endpoint is required when backend = \"api\""));
                }
                url::Url::parse(endpoint)?;
                if self.api.timeout_secs == 0 {
                    return Err(AppError::invalid_config("api.timeout_secs must be greater than zero"));
                }
            }
            BackendKind::Browser => {
                let b = &self.browser;
                if b.wait_timeout_secs == 0 || b.navigation_timeout_secs == 0 {
                    return Err(AppError::invalid_config("browser timeouts must be greater than zero"));
                }
                if b.max_sessions == 0 {
                    return Err(AppError::invalid_config("browser.max_sessions must be at least 1"));
                }
                url::Url::parse(&b.page_url)?;
            }
        }

        if !(self.estimator.rate_bits_per_sec.is_finite() && self.estimator.rate_bits_per_sec > 0.0) {
            return Err(AppError::invalid_config("estimator.rate_bits_per_sec must be positive"));
        }
        if self.estimator.units.is_empty() {
            return Err(AppError::invalid_config("estimator.units must not be empty"));
        }

        Ok(())
    }

    /// Logs the effective configuration at startup.
    pub fn log_summary(&self) {
        log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        log::info!("⚙️  Configuration");
        log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        log::info!("Backend: {}", self.backend);
        log::info!("Accepted hosts: {}", self.hosts.join(", "));
        match self.backend {
            BackendKind::Api => {
                log::info!(
                    "API endpoint: {} (param '{}', timeout {}s)",
                    self.api.endpoint.as_deref().unwrap_or("<unset>"),
                    self.api.query_param,
                    self.api.timeout_secs
                );
            }
            BackendKind::Browser => {
                log::info!(
                    "Resolver page: {} (wait {}s, max {} sessions)",
                    self.browser.page_url,
                    self.browser.wait_timeout_secs,
                    self.browser.max_sessions
                );
            }
        }
        log::info!("Keep-alive port: {}", self.port);
        if self.bot_token.is_empty() {
            log::warn!("⚠️  BOT_TOKEN is not set");
        }
    }
}
