//! Symptom text endpoints.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SymptomsRequest, SymptomsResponse, TagRequest};
use crate::core_state::CoreError;

/// `PUT /api/symptoms`: replace the free-text symptom description.
pub async fn replace(
    State(ctx): State<ApiContext>,
    Json(body): Json<SymptomsRequest>,
) -> Result<Json<SymptomsResponse>, ApiError> {
    if ctx.core.is_analyzing() {
        return Err(CoreError::AnalysisInProgress.into());
    }
    ctx.core.set_symptoms(&body.text)?;
    Ok(Json(SymptomsResponse { text: body.text }))
}

/// `POST /api/symptoms/tags`: quick-add one tag from the fixed vocabulary.
pub async fn add_tag(
    State(ctx): State<ApiContext>,
    Json(body): Json<TagRequest>,
) -> Result<Json<SymptomsResponse>, ApiError> {
    if ctx.core.is_analyzing() {
        return Err(CoreError::AnalysisInProgress.into());
    }
    let text = ctx.core.add_symptom_tag(&body.tag)?;
    Ok(Json(SymptomsResponse { text }))
}
