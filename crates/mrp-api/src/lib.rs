//! # mrp-api: HTTP Surface of the Maven Resolver Proxy
//!
//! Serves a local build's resolved artifacts at Maven repository URLs so
//! that tooling which only speaks the repository protocol (nested builds,
//! integration-test invokers, IDE importers) can read them.
//!
//! ## API Surface
//!
//! | Route       | Methods   | Module         |
//! |-------------|-----------|----------------|
//! | `/{*path}`  | GET, HEAD | [`dispatch`]   |
//!
//! Every other method falls through to the framework default (405).
//!
//! ## Status Codes
//!
//! | Outcome                                              | Status |
//! |------------------------------------------------------|--------|
//! | File, digest or metadata served                      | 200    |
//! | Malformed path, unresolvable artifact, no versions   | 404    |
//! | Digest or serialization failure, range lookup fault  | 500    |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → Handler
//! ```

pub mod bootstrap;
pub mod dispatch;
pub mod error;
pub mod middleware;
pub mod server;
pub mod state;
pub mod transmit;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub use crate::server::{ProxyServer, ServerError};

/// Assemble the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/{*path}", get(dispatch::serve).head(dispatch::serve))
        .layer(middleware::tracing_layer::layer())
        .with_state(state)
}
