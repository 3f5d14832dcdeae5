//! File ingestion: user-selected file → transport-ready payload.
//!
//! The declared content type is authoritative. Browsers sometimes send no
//! type (or the generic `application/octet-stream`); only then is the type
//! guessed, first from the file name, then from magic bytes.
//!
//! Encoding runs on the blocking pool so large PDFs never stall the
//! executor that serves the page.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;
use thiserror::Error;

/// Generic type browsers report when they do not know better.
const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("File is {size} bytes, larger than the {limit} byte limit")]
    FileTooLarge { size: usize, limit: usize },

    #[error("File is empty")]
    EmptyFile,

    #[error("Encoding task failed: {0}")]
    Encoding(String),
}

// ──────────────────────────────────────────────
// Media types
// ──────────────────────────────────────────────

/// The allow-list of media types the model accepts from us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Jpeg,
    Png,
    Webp,
    Heic,
    Pdf,
}

impl MediaType {
    pub const ALL: [MediaType; 5] = [
        MediaType::Jpeg,
        MediaType::Png,
        MediaType::Webp,
        MediaType::Heic,
        MediaType::Pdf,
    ];

    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            "image/heic" => Some(Self::Heic),
            "application/pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Heic => "image/heic",
            Self::Pdf => "application/pdf",
        }
    }

    pub fn is_image(&self) -> bool {
        !matches!(self, Self::Pdf)
    }

    /// Short label for the UI ("PDF", "PNG", ...).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Webp => "WEBP",
            Self::Heic => "HEIC",
            Self::Pdf => "PDF",
        }
    }
}

/// Detect MIME type from file magic bytes.
pub fn detect_mime_from_bytes(bytes: &[u8]) -> &'static str {
    if bytes.len() < 4 {
        return OCTET_STREAM;
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return "image/jpeg";
    }
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return "image/png";
    }
    if bytes.starts_with(b"%PDF") {
        return "application/pdf";
    }
    if bytes.len() >= 12 && bytes[..4] == *b"RIFF" && bytes[8..12] == *b"WEBP" {
        return "image/webp";
    }
    if bytes.len() >= 12 && bytes[4..8] == *b"ftyp" {
        let brand = &bytes[8..12];
        if brand == b"heic" || brand == b"heix" || brand == b"mif1" {
            return "image/heic";
        }
    }
    OCTET_STREAM
}

/// Resolve the media type string for a selected file.
fn resolve_mime(file: &SelectedFile) -> String {
    match file.declared_type.as_deref().map(str::trim) {
        Some(declared) if !declared.is_empty() && declared != OCTET_STREAM => {
            declared.to_string()
        }
        _ => mime_guess::from_path(&file.name)
            .first()
            .map(|m| m.essence_str().to_string())
            .filter(|m| MediaType::from_mime(m).is_some())
            .unwrap_or_else(|| detect_mime_from_bytes(&file.bytes).to_string()),
    }
}

// ──────────────────────────────────────────────
// Payload
// ──────────────────────────────────────────────

/// A file handle as delivered by the upload boundary.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub declared_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Transport-ready representation of an uploaded file. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedPayload {
    file_name: String,
    size_bytes: usize,
    encoded: String,
    media_type: MediaType,
    preview: Option<String>,
}

impl UploadedPayload {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Standard base64, unwrapped, without a data-URL prefix.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// `data:` URL for images; `None` for PDFs.
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn summary(&self) -> PayloadSummary {
        PayloadSummary {
            file_name: self.file_name.clone(),
            size_bytes: self.size_bytes,
            media_type: self.media_type.as_mime(),
            label: self.media_type.label(),
            preview: self.preview.clone(),
        }
    }
}

/// What the page needs to show the selected file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadSummary {
    pub file_name: String,
    pub size_bytes: usize,
    pub media_type: &'static str,
    pub label: &'static str,
    pub preview: Option<String>,
}

/// Validate and encode a selected file.
pub async fn ingest(file: SelectedFile, max_bytes: usize) -> Result<UploadedPayload, IngestError> {
    let mime = resolve_mime(&file);
    let media_type =
        MediaType::from_mime(&mime).ok_or_else(|| IngestError::UnsupportedMediaType(mime))?;

    if file.bytes.is_empty() {
        return Err(IngestError::EmptyFile);
    }
    if file.bytes.len() > max_bytes {
        return Err(IngestError::FileTooLarge {
            size: file.bytes.len(),
            limit: max_bytes,
        });
    }

    let SelectedFile { name, bytes, .. } = file;
    let size_bytes = bytes.len();
    let start = std::time::Instant::now();

    let encoded = tokio::task::spawn_blocking(move || BASE64.encode(&bytes))
        .await
        .map_err(|e| IngestError::Encoding(e.to_string()))?;

    let preview = media_type
        .is_image()
        .then(|| format!("data:{};base64,{}", media_type.as_mime(), encoded));

    tracing::info!(
        media_type = media_type.as_mime(),
        size = size_bytes,
        elapsed_ms = %start.elapsed().as_millis(),
        "File ingested"
    );

    Ok(UploadedPayload {
        file_name: name,
        size_bytes,
        encoded,
        media_type,
        preview,
    })
}
