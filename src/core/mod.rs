//! Configuration, logging, errors, metrics and the keep-alive server

pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod web_server;

pub use config::{AppConfig, BackendKind};
pub use context::AppContext;
pub use error::{AppError, AppResult};
pub use logging::init_logger;
