//! Handler types and dependencies

use std::sync::Arc;

use crate::core::context::AppContext;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub context: Arc<AppContext>,
}

impl HandlerDeps {
    pub fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }
}
