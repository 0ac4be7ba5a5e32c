//! Common test utilities
//!
//! This module is shared across all integration tests

pub mod fixtures;
pub mod mock_browser;

#[allow(unused_imports)]
pub use fixtures::{api_envelope, browser_settings, resolver_with, share_link};
#[allow(unused_imports)]
pub use mock_browser::{MockLauncher, SessionCounters};
