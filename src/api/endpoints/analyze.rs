//! Analyze endpoint.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{AnalyzeResponse, ApiContext};
use crate::render::render_result_html;

/// `POST /api/analyze`: run the pipeline over the current file and symptoms.
///
/// A second call while one is running gets 409. Failures are also recorded
/// on the session so `GET /api/result` shows them inline.
pub async fn run(State(ctx): State<ApiContext>) -> Result<Json<AnalyzeResponse>, ApiError> {
    let record = ctx.core.run_analysis().await?;
    let html = render_result_html(&record.result);
    Ok(Json(AnalyzeResponse {
        result: record,
        html,
    }))
}
