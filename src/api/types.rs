//! Shared types for the HTTP layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core_state::{AnalysisRecord, CoreState};

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }

    /// Request body ceiling: the ingest limit plus multipart framing.
    pub fn body_limit(&self) -> usize {
        self.core.max_upload_bytes + MULTIPART_OVERHEAD_BYTES
    }
}

const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

// ═══════════════════════════════════════════════════════════
// Request / response bodies
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct SymptomsRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct TagRequest {
    pub tag: String,
}

#[derive(Debug, Serialize)]
pub struct SymptomsResponse {
    pub text: String,
}

/// `POST /api/analyze` reply: the structured record plus its rendered fragment.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub result: AnalysisRecord,
    pub html: String,
}
