use thiserror::Error;

/// Centralized infrastructure error type for the application
///
/// Covers everything that can go wrong outside a single link resolution:
/// configuration, logger setup, HTTP client construction and the keep-alive
/// server. Per-request outcomes use
/// [`ResolutionFailure`](crate::resolver::ResolutionFailure) instead.
///
/// # Example
///
/// ```no_run
/// use terabox_bot::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be read or merged
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    /// Configuration was read but is not usable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Host pattern could not be compiled
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Logger initialization errors
    #[error("Logger error: {0}")]
    Logger(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Shorthand for [`AppError::InvalidConfig`].
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        AppError::InvalidConfig(msg.into())
    }
}
