//! Presentation decisions, independent of markup.

use crate::pipeline::{AnalysisResult, ParameterStatus};

/// The two ways a result is presented. Decided once, from whether the
/// model returned any parameter rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultView {
    /// Lab report with at least one measured parameter.
    ParameterBacked,
    /// Symptom-only triage, or a file the model found no rows in.
    SymptomOnly,
}

impl From<&AnalysisResult> for ResultView {
    fn from(result: &AnalysisResult) -> Self {
        if result.parameters.is_empty() {
            Self::SymptomOnly
        } else {
            Self::ParameterBacked
        }
    }
}

/// Section headings for one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionTitles {
    pub heading: &'static str,
    pub abnormalities: &'static str,
    pub causes: &'static str,
    pub lifestyle: &'static str,
}

pub const PARAMETER_TABLE_TITLE: &str = "Detailed Parameter Analysis";
pub const SUMMARY_TITLE: &str = "Executive Summary";
pub const DISCLAIMER_TITLE: &str = "Important Medical Disclaimer";
pub const FOLLOW_UP_TITLE: &str = "Next Steps & Follow-up";
pub const RAW_TEXT_TITLE: &str = "Show Raw OCR Text";
pub const ERROR_TITLE: &str = "Unable to Complete Analysis";

impl ResultView {
    pub fn titles(self) -> SectionTitles {
        match self {
            Self::ParameterBacked => SectionTitles {
                heading: "Report Analysis Results",
                abnormalities: "Abnormal Findings",
                causes: "Potential Causes",
                lifestyle: "Lifestyle Tips",
            },
            Self::SymptomOnly => SectionTitles {
                heading: "Symptom Analysis Results",
                abnormalities: "Key Symptoms Identified",
                causes: "Possible Conditions",
                lifestyle: "Treatment & Advice",
            },
        }
    }

    pub fn shows_parameter_table(self) -> bool {
        self == Self::ParameterBacked
    }
}

// ──────────────────────────────────────────────
// Confidence badge
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Good,
    Warn,
    Poor,
    Neutral,
}

impl BadgeTone {
    /// 80 and up good, 50 and up warn, else poor. Exactly zero has no tone.
    pub fn for_score(score: f64) -> Self {
        if score == 0.0 {
            Self::Neutral
        } else if score >= 80.0 {
            Self::Good
        } else if score >= 50.0 {
            Self::Warn
        } else {
            Self::Poor
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Good => "badge-good",
            Self::Warn => "badge-warn",
            Self::Poor => "badge-poor",
            Self::Neutral => "badge-neutral",
        }
    }
}

/// Badge shown next to the heading: parameter-backed results with a score only.
pub fn confidence_badge(view: ResultView, result: &AnalysisResult) -> Option<(f64, BadgeTone)> {
    match (view, result.confidence_score) {
        (ResultView::ParameterBacked, Some(score)) => Some((score, BadgeTone::for_score(score))),
        _ => None,
    }
}

// ──────────────────────────────────────────────
// Parameter rows
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTint {
    Neutral,
    Warning,
    Alert,
}

impl From<ParameterStatus> for RowTint {
    fn from(status: ParameterStatus) -> Self {
        match status {
            ParameterStatus::Normal | ParameterStatus::Unknown => Self::Neutral,
            ParameterStatus::Abnormal => Self::Warning,
            ParameterStatus::Critical => Self::Alert,
        }
    }
}

impl RowTint {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Neutral => "row-neutral",
            Self::Warning => "row-warning",
            Self::Alert => "row-alert",
        }
    }
}

// ──────────────────────────────────────────────
// Disclosure defaults
// ──────────────────────────────────────────────

/// Collapsible sections and whether each starts open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disclosure {
    ParameterTable,
    FollowUp,
    RawText,
}

impl Disclosure {
    pub fn open_by_default(self) -> bool {
        match self {
            Self::ParameterTable | Self::FollowUp => true,
            Self::RawText => false,
        }
    }
}
