//! HTTP router.
//!
//! Returns a composable `Router`: the page at `/` and JSON/HTML endpoints
//! under `/api/`. Every response is marked `no-store`; results are medical
//! data and only live in the session.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{HeaderValue, CACHE_CONTROL};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the application router around a shared session.
pub fn app_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    let body_limit = ctx.body_limit();

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/session", get(endpoints::session::snapshot))
        .route("/result", get(endpoints::session::result_fragment))
        .route(
            "/file",
            post(endpoints::file::select).delete(endpoints::file::clear),
        )
        .route("/symptoms", put(endpoints::symptoms::replace))
        .route("/symptoms/tags", post(endpoints::symptoms::add_tag))
        .route("/analyze", post(endpoints::analyze::run));

    Router::new()
        .route("/", get(endpoints::page::index))
        .nest("/api", api)
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}
