//! The analyze action: precheck → dispatch → interpret → confidence gate.

use std::time::Instant;

use tracing::Instrument;

use super::dispatch::{AnalysisRequest, ModelClient};
use super::ingest::UploadedPayload;
use super::interpret::{check_confidence, parse_analysis};
use super::types::AnalysisResult;
use super::AnalysisError;

/// Run one analysis.
///
/// Rejects with `NoInputProvided` before touching the client when there is
/// neither a file nor non-blank symptom text. A file-based result whose
/// self-reported confidence is below the floor is rejected rather than
/// returned.
pub async fn analyze(
    client: &dyn ModelClient,
    payload: Option<&UploadedPayload>,
    symptoms: &str,
) -> Result<AnalysisResult, AnalysisError> {
    let request = AnalysisRequest::new(payload, symptoms);
    if request.is_empty() {
        return Err(AnalysisError::NoInputProvided);
    }

    let span = tracing::info_span!(
        "analyze",
        request_id = %uuid::Uuid::new_v4(),
        model = client.model_name(),
        has_file = request.has_file(),
        media_type = request.file.as_ref().map(|f| f.media_type.as_mime()).unwrap_or("none"),
    );
    run(client, &request).instrument(span).await
}

async fn run(
    client: &dyn ModelClient,
    request: &AnalysisRequest,
) -> Result<AnalysisResult, AnalysisError> {
    let start = Instant::now();

    let raw = client.generate(request).await.map_err(|e| {
        tracing::warn!(elapsed_ms = %start.elapsed().as_millis(), error = %e, "Dispatch failed");
        AnalysisError::from(e)
    })?;

    let result = parse_analysis(&raw).map_err(|e| {
        tracing::warn!(reply_len = raw.len(), error = %e, "Model reply unusable");
        AnalysisError::from(e)
    })?;

    check_confidence(&result, request.has_file()).map_err(|e| {
        tracing::info!(confidence = ?result.confidence_score, "Rejected low-confidence parse");
        AnalysisError::from(e)
    })?;

    tracing::info!(
        elapsed_ms = %start.elapsed().as_millis(),
        parameters = result.parameters.len(),
        confidence = ?result.confidence_score,
        "Analysis complete"
    );

    Ok(result)
}
