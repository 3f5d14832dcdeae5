//! Raw model reply → `AnalysisResult`.
//!
//! Extraction rule: the substring from the FIRST `{` to the LAST `}` in the
//! reply, inclusive. This is deliberately greedy and blind to strings and
//! nesting, so:
//! - prose before/after a single object is dropped;
//! - two objects in one reply yield `{..} prose {..}`, which fails to decode;
//! - a stray `}` after the object extends the match and fails to decode;
//! - a `}` before the first `{` is ignored.
//!
//! The rule is part of observable behavior. Do not make it smarter.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::types::{AnalysisResult, CONFIDENCE_FLOOR};

static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("static pattern"));

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpretError {
    #[error("Model reply contains no JSON object")]
    NoJsonFound,

    #[error("Model reply is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("Parsing confidence {score} is below the floor")]
    LowConfidence { score: f64 },
}

/// Greedy leftmost-`{` to rightmost-`}` match.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    JSON_OBJECT.find(raw).map(|m| m.as_str())
}

/// Locate and strictly decode the JSON object in a model reply.
pub fn parse_analysis(raw: &str) -> Result<AnalysisResult, InterpretError> {
    let json = extract_json_object(raw).ok_or(InterpretError::NoJsonFound)?;
    serde_json::from_str(json).map_err(|e| InterpretError::MalformedJson(e.to_string()))
}

/// Reject a file-based result whose self-reported score is under the floor.
/// Symptom-only results and results without a score always pass.
pub fn check_confidence(result: &AnalysisResult, file_supplied: bool) -> Result<(), InterpretError> {
    if result.meets_confidence_floor(file_supplied) {
        Ok(())
    } else {
        Err(InterpretError::LowConfidence {
            score: result.confidence_score.unwrap_or_default(),
        })
    }
}
