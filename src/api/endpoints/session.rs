//! Session snapshot and result fragment.

use axum::extract::State;
use axum::response::Html;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::core_state::SessionSnapshot;
use crate::render::{render_error_message, render_result_html};

/// `GET /api/session`: everything the page needs to redraw its controls.
pub async fn snapshot(State(ctx): State<ApiContext>) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(ctx.core.snapshot()?))
}

/// `GET /api/result`: current error (if any) above the last result (if any).
///
/// Empty body when there is neither.
pub async fn result_fragment(State(ctx): State<ApiContext>) -> Result<Html<String>, ApiError> {
    let mut html = String::new();
    if let Some(notice) = ctx.core.last_error()? {
        html.push_str(&render_error_message(&notice.message));
    }
    if let Some(record) = ctx.core.last_result()? {
        html.push_str(&render_result_html(&record.result));
    }
    Ok(Html(html))
}
