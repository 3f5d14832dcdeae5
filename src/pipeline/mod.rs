pub mod types;
pub mod ingest;
pub mod prompt;
pub mod dispatch;
pub mod gemini;
pub mod interpret;
pub mod orchestrator;

pub use types::*;
pub use ingest::*;
pub use prompt::*;
pub use dispatch::*;
pub use gemini::*;
pub use interpret::*;
pub use orchestrator::*;

use thiserror::Error;

/// Message shown when the model replied but the reply could not be used.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to analyze. Please try again.";

/// Every way one analyze action (or the file selection feeding it) can end
/// badly. All are terminal for the current request only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("File is {size} bytes, larger than the {limit} byte limit")]
    FileTooLarge { size: usize, limit: usize },

    /// The request body hit the transport limit before the file was read
    /// in full, so its real size is unknown.
    #[error("Upload exceeded the body limit for a {limit} byte file")]
    UploadTooLarge { limit: usize },

    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("No file and no symptoms provided")]
    NoInputProvided,

    #[error("An analysis is already running")]
    AnalysisInProgress,

    #[error("Model service error: {0}")]
    UpstreamServiceError(String),

    #[error("Model reply contains no JSON object")]
    NoJsonFound,

    #[error("Model reply is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("Parsing confidence {score} is below the floor")]
    LowConfidenceParse { score: f64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// Text shown to the user on the page.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedMediaType(_) => {
                "Please upload a valid image (JPEG, PNG) or PDF file.".into()
            }
            Self::FileTooLarge { limit, .. } | Self::UploadTooLarge { limit } => format!(
                "File too large. Maximum {}MB.",
                limit / (1024 * 1024)
            ),
            Self::EmptyFile => "The selected file is empty.".into(),
            Self::NoInputProvided => {
                "Please upload a medical report OR describe your symptoms to proceed.".into()
            }
            Self::AnalysisInProgress => "An analysis is already running.".into(),
            Self::UpstreamServiceError(message) => message.clone(),
            Self::NoJsonFound | Self::MalformedJson(_) | Self::Internal(_) => {
                GENERIC_FAILURE_MESSAGE.into()
            }
            Self::LowConfidenceParse { .. } => "Could not reliably parse the report. \
                The image might be blurry or not a recognized medical document. \
                Please upload a clearer PDF or the original lab printout."
                .into(),
        }
    }

    /// Stable machine-readable code for the JSON error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            Self::FileTooLarge { .. } | Self::UploadTooLarge { .. } => "FILE_TOO_LARGE",
            Self::EmptyFile => "EMPTY_FILE",
            Self::NoInputProvided => "NO_INPUT",
            Self::AnalysisInProgress => "BUSY",
            Self::UpstreamServiceError(_) => "UPSTREAM",
            Self::NoJsonFound | Self::MalformedJson(_) => "ANALYSIS_FAILED",
            Self::LowConfidenceParse { .. } => "LOW_CONFIDENCE",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<IngestError> for AnalysisError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::UnsupportedMediaType(mime) => Self::UnsupportedMediaType(mime),
            IngestError::FileTooLarge { size, limit } => Self::FileTooLarge { size, limit },
            IngestError::EmptyFile => Self::EmptyFile,
            IngestError::Encoding(e) => Self::Internal(e),
        }
    }
}

impl From<DispatchError> for AnalysisError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Upstream(message) => Self::UpstreamServiceError(message),
        }
    }
}

impl From<InterpretError> for AnalysisError {
    fn from(err: InterpretError) -> Self {
        match err {
            InterpretError::NoJsonFound => Self::NoJsonFound,
            InterpretError::MalformedJson(e) => Self::MalformedJson(e),
            InterpretError::LowConfidence { score } => Self::LowConfidenceParse { score },
        }
    }
}
