//! Shared state for the API layer.

use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::Settings;
use crate::db::Collections;

/// Shared context for all routes and middleware: the injected store
/// handle plus the process-wide token service. Everything here is
/// immutable after startup and cheap to clone per request.
#[derive(Clone)]
pub struct ApiContext {
    pub collections: Collections,
    pub tokens: Arc<TokenService>,
    pub settings: Arc<Settings>,
}

impl ApiContext {
    pub fn new(collections: Collections, tokens: TokenService, settings: Settings) -> Self {
        Self {
            collections,
            tokens: Arc::new(tokens),
            settings: Arc::new(settings),
        }
    }
}
