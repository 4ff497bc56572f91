//! HTTP API layer.
//!
//! `api_router()` returns a composable `Router`; protected routes sit
//! behind the bearer-auth middleware, public routes (auth, directory,
//! health) do not. Shared state travels in `ApiContext`.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod types;

pub use router::api_router;
pub use types::ApiContext;
