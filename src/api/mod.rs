//! HTTP surface.
//!
//! Serves the single-page UI at `/` and the session endpoints under
//! `/api/`. The router is composable: `app_router()` returns a `Router`
//! that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::app_router;
pub use server::{start_server, AppServer, ServerSession};
pub use types::ApiContext;
