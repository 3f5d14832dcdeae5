//! File selection endpoints.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::core_state::CoreError;
use crate::pipeline::{ingest, AnalysisError, PayloadSummary, SelectedFile};

/// `POST /api/file`: multipart upload, field `file`.
///
/// The file is validated and encoded; on success it replaces the current
/// selection and clears the last outcome. A rejected file changes nothing
/// in the session: the page alerts with the envelope message.
pub async fn select(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<PayloadSummary>, ApiError> {
    if ctx.core.is_analyzing() {
        return Err(CoreError::AnalysisInProgress.into());
    }

    let mut selected: Option<SelectedFile> = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(multipart_error(&ctx, e)),
        };
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("document").to_string();
        let declared_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| multipart_error(&ctx, e))?;
        selected = Some(SelectedFile {
            name,
            declared_type,
            bytes: bytes.to_vec(),
        });
    }

    let file = selected.ok_or_else(|| ApiError::BadRequest("No file provided.".into()))?;

    let payload = ingest(file, ctx.core.max_upload_bytes).await.map_err(|e| {
        let err = AnalysisError::from(e);
        tracing::info!(code = err.code(), "File rejected");
        err
    })?;
    Ok(Json(ctx.core.select_file(payload)?))
}

/// `DELETE /api/file`: drop the current selection.
pub async fn clear(State(ctx): State<ApiContext>) -> Result<StatusCode, ApiError> {
    if ctx.core.is_analyzing() {
        return Err(CoreError::AnalysisInProgress.into());
    }
    ctx.core.clear_file()?;
    Ok(StatusCode::NO_CONTENT)
}

/// Body-limit overruns surface as a size error; anything else is a
/// malformed upload.
fn multipart_error(ctx: &ApiContext, err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::info!(limit = ctx.core.max_upload_bytes, "Upload body over limit");
        return AnalysisError::UploadTooLarge {
            limit: ctx.core.max_upload_bytes,
        }
        .into();
    }
    tracing::warn!("Failed to read upload: {}", err.body_text());
    ApiError::BadRequest("Failed to read file data.".into())
}
