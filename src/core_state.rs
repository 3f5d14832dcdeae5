//! Session controller shared by every HTTP handler.
//!
//! Holds the three slots the page works with (selected file, symptom text,
//! last outcome) plus the in-flight flag that keeps analyses one at a time.
//! Nothing here is persisted; a restart starts a blank session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::pipeline::{
    analyze, AnalysisError, AnalysisResult, ModelClient, PayloadSummary, UploadedPayload,
};
use crate::symptoms::{append_symptom_tag, is_known_tag, SYMPTOM_TAGS};

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    /// Most recently accepted upload. `Arc` so an analysis can hold it
    /// without keeping the lock.
    payload: RwLock<Option<Arc<UploadedPayload>>>,
    symptoms: RwLock<String>,
    outcome: RwLock<Outcome>,
    /// Set while an analysis is dispatched; cleared by `AnalysisTicket::drop`.
    analyzing: AtomicBool,
    client: Arc<dyn ModelClient>,
    pub max_upload_bytes: usize,
    pub started_at: DateTime<Utc>,
}

/// Last result and last error are tracked separately: a failure does not
/// erase the result shown before it.
#[derive(Debug, Default)]
struct Outcome {
    last_result: Option<AnalysisRecord>,
    last_error: Option<ErrorNotice>,
}

/// A successful analysis and when it finished.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub result: AnalysisResult,
    pub analyzed_at: DateTime<Utc>,
    pub file_name: Option<String>,
}

/// Error surfaced inline on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorNotice {
    pub code: &'static str,
    pub message: String,
}

impl From<&AnalysisError> for ErrorNotice {
    fn from(err: &AnalysisError) -> Self {
        Self {
            code: err.code(),
            message: err.user_message(),
        }
    }
}

impl CoreState {
    pub fn new(client: Arc<dyn ModelClient>, max_upload_bytes: usize) -> Self {
        Self {
            payload: RwLock::new(None),
            symptoms: RwLock::new(String::new()),
            outcome: RwLock::new(Outcome::default()),
            analyzing: AtomicBool::new(false),
            client,
            max_upload_bytes,
            started_at: Utc::now(),
        }
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    // ── Inputs ──────────────────────────────────────────────

    /// Replace the selected file. Any previous result or error is cleared.
    pub fn select_file(&self, payload: UploadedPayload) -> Result<PayloadSummary, CoreError> {
        let summary = payload.summary();
        {
            let mut slot = self.payload.write().map_err(|_| CoreError::LockPoisoned)?;
            self.ensure_idle()?;
            *slot = Some(Arc::new(payload));
        }
        let mut outcome = self.outcome.write().map_err(|_| CoreError::LockPoisoned)?;
        *outcome = Outcome::default();
        tracing::info!(
            media_type = summary.media_type,
            size = summary.size_bytes,
            "File selected"
        );
        Ok(summary)
    }

    /// Drop the selected file. The last outcome stays on screen.
    pub fn clear_file(&self) -> Result<(), CoreError> {
        let mut slot = self.payload.write().map_err(|_| CoreError::LockPoisoned)?;
        self.ensure_idle()?;
        *slot = None;
        Ok(())
    }

    pub fn set_symptoms(&self, text: &str) -> Result<(), CoreError> {
        let mut slot = self.symptoms.write().map_err(|_| CoreError::LockPoisoned)?;
        self.ensure_idle()?;
        *slot = text.to_string();
        Ok(())
    }

    /// Quick-add a tag from the fixed vocabulary. Returns the new text.
    pub fn add_symptom_tag(&self, tag: &str) -> Result<String, CoreError> {
        if !is_known_tag(tag) {
            return Err(CoreError::UnknownTag(tag.to_string()));
        }
        let mut slot = self.symptoms.write().map_err(|_| CoreError::LockPoisoned)?;
        self.ensure_idle()?;
        *slot = append_symptom_tag(&slot, tag);
        Ok(slot.clone())
    }

    pub fn symptoms(&self) -> Result<String, CoreError> {
        self.symptoms
            .read()
            .map(|s| s.clone())
            .map_err(|_| CoreError::LockPoisoned)
    }

    pub fn payload(&self) -> Result<Option<Arc<UploadedPayload>>, CoreError> {
        self.payload
            .read()
            .map(|p| p.clone())
            .map_err(|_| CoreError::LockPoisoned)
    }

    // ── Analysis lifecycle ──────────────────────────────────

    pub fn is_analyzing(&self) -> bool {
        self.analyzing.load(Ordering::Acquire)
    }

    /// Inputs are frozen while an analysis holds the ticket. Checked with the
    /// slot's write lock held.
    fn ensure_idle(&self) -> Result<(), CoreError> {
        if self.is_analyzing() {
            return Err(CoreError::AnalysisInProgress);
        }
        Ok(())
    }

    /// True when not already analyzing and there is a file or symptom text.
    pub fn can_analyze(&self) -> bool {
        if self.is_analyzing() {
            return false;
        }
        let has_file = self.payload.read().map(|p| p.is_some()).unwrap_or(false);
        let has_symptoms = self
            .symptoms
            .read()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false);
        has_file || has_symptoms
    }

    /// Claim the in-flight slot and clear the previous error.
    pub fn begin_analysis(&self) -> Result<AnalysisTicket<'_>, CoreError> {
        self.analyzing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CoreError::AnalysisInProgress)?;
        let ticket = AnalysisTicket {
            flag: &self.analyzing,
        };
        let mut outcome = self.outcome.write().map_err(|_| CoreError::LockPoisoned)?;
        outcome.last_error = None;
        Ok(ticket)
    }

    /// Store a fresh result, replacing the previous one entirely.
    pub fn record_success(&self, record: AnalysisRecord) -> Result<(), CoreError> {
        let mut outcome = self.outcome.write().map_err(|_| CoreError::LockPoisoned)?;
        outcome.last_result = Some(record);
        outcome.last_error = None;
        Ok(())
    }

    /// Store an error. The previous result, if any, is kept.
    pub fn record_failure(&self, err: &AnalysisError) -> Result<(), CoreError> {
        let mut outcome = self.outcome.write().map_err(|_| CoreError::LockPoisoned)?;
        outcome.last_error = Some(ErrorNotice::from(err));
        Ok(())
    }

    /// Run one analysis over the current inputs and record the outcome.
    pub async fn run_analysis(&self) -> Result<AnalysisRecord, AnalysisError> {
        let _ticket = self.begin_analysis()?;
        let payload = self.payload()?;
        let symptoms = self.symptoms()?;

        match analyze(self.client.as_ref(), payload.as_deref(), &symptoms).await {
            Ok(result) => {
                let record = AnalysisRecord {
                    result,
                    analyzed_at: Utc::now(),
                    file_name: payload.as_ref().map(|p| p.file_name().to_string()),
                };
                self.record_success(record.clone())?;
                Ok(record)
            }
            Err(err) => {
                self.record_failure(&err)?;
                Err(err)
            }
        }
    }

    pub fn last_result(&self) -> Result<Option<AnalysisRecord>, CoreError> {
        self.outcome
            .read()
            .map(|o| o.last_result.clone())
            .map_err(|_| CoreError::LockPoisoned)
    }

    pub fn last_error(&self) -> Result<Option<ErrorNotice>, CoreError> {
        self.outcome
            .read()
            .map(|o| o.last_error.clone())
            .map_err(|_| CoreError::LockPoisoned)
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot, CoreError> {
        let file = self.payload()?.map(|p| p.summary());
        let symptoms = self.symptoms()?;
        let outcome = self.outcome.read().map_err(|_| CoreError::LockPoisoned)?;
        let analyzing = self.is_analyzing();
        let can_analyze = !analyzing && (file.is_some() || !symptoms.trim().is_empty());
        let action_label = if file.is_some() {
            "Analyze Report"
        } else {
            "Check Symptoms"
        };

        Ok(SessionSnapshot {
            file,
            symptoms,
            tags: SYMPTOM_TAGS,
            can_analyze,
            analyzing,
            action_label,
            analyzed_at: outcome.last_result.as_ref().map(|r| r.analyzed_at),
            last_error: outcome.last_error.clone(),
        })
    }
}

// ═══════════════════════════════════════════════════════════
// In-flight guard
// ═══════════════════════════════════════════════════════════

/// Held for the duration of one analysis. Dropping it (on success, error
/// or a cancelled request future) frees the slot.
pub struct AnalysisTicket<'a> {
    flag: &'a AtomicBool,
}

impl Drop for AnalysisTicket<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

// ═══════════════════════════════════════════════════════════
// Snapshot + errors
// ═══════════════════════════════════════════════════════════

/// Everything the page needs to redraw its controls.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub file: Option<PayloadSummary>,
    pub symptoms: String,
    pub tags: &'static [&'static str],
    pub can_analyze: bool,
    pub analyzing: bool,
    pub action_label: &'static str,
    pub analyzed_at: Option<DateTime<Utc>>,
    pub last_error: Option<ErrorNotice>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("An analysis is already running")]
    AnalysisInProgress,
    #[error("Unknown symptom tag: {0}")]
    UnknownTag(String),
}

impl From<CoreError> for AnalysisError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AnalysisInProgress => AnalysisError::AnalysisInProgress,
            other => AnalysisError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{ingest, MockModelClient, SelectedFile};

    const SYMPTOM_REPLY: &str = r#"{"summary":"Likely a cold","parameters":[],"rawText":"Symptom Analysis Only"}"#;

    fn state_with(mock: MockModelClient) -> (CoreState, Arc<MockModelClient>) {
        let mock = Arc::new(mock);
        let state = CoreState::new(mock.clone(), 1024);
        (state, mock)
    }

    async fn pdf_payload() -> UploadedPayload {
        ingest(
            SelectedFile {
                name: "labs.pdf".into(),
                declared_type: Some("application/pdf".into()),
                bytes: b"%PDF-1.4 body".to_vec(),
            },
            1024,
        )
        .await
        .unwrap()
    }

    #[test]
    fn new_state_cannot_analyze() {
        let (state, _) = state_with(MockModelClient::new("{}"));
        assert!(!state.can_analyze());
        let snap = state.snapshot().unwrap();
        assert!(snap.file.is_none());
        assert_eq!(snap.action_label, "Check Symptoms");
        assert_eq!(snap.tags.len(), 10);
    }

    #[test]
    fn whitespace_symptoms_do_not_enable_analysis() {
        let (state, _) = state_with(MockModelClient::new("{}"));
        state.set_symptoms("   \n").unwrap();
        assert!(!state.can_analyze());
        state.set_symptoms("headache").unwrap();
        assert!(state.can_analyze());
    }

    #[test]
    fn quick_add_goes_through_vocabulary() {
        let (state, _) = state_with(MockModelClient::new("{}"));
        assert_eq!(state.add_symptom_tag("Fever").unwrap(), "Fever");
        assert_eq!(state.add_symptom_tag("Fever").unwrap(), "Fever");
        assert_eq!(state.add_symptom_tag("Cough").unwrap(), "Fever, Cough");
        assert_eq!(
            state.add_symptom_tag("Insomnia"),
            Err(CoreError::UnknownTag("Insomnia".into()))
        );
        assert_eq!(state.symptoms().unwrap(), "Fever, Cough");
    }

    #[test]
    fn second_ticket_rejected_until_first_dropped() {
        let (state, _) = state_with(MockModelClient::new("{}"));
        let ticket = state.begin_analysis().unwrap();
        assert!(state.is_analyzing());
        assert!(matches!(
            state.begin_analysis(),
            Err(CoreError::AnalysisInProgress)
        ));
        drop(ticket);
        assert!(!state.is_analyzing());
        assert!(state.begin_analysis().is_ok());
    }

    #[tokio::test]
    async fn inputs_frozen_while_analysis_runs() {
        let (state, _) = state_with(MockModelClient::new(SYMPTOM_REPLY));
        state.set_symptoms("Fever").unwrap();
        let record = state.run_analysis().await.unwrap();
        let pdf = pdf_payload().await;

        let ticket = state.begin_analysis().unwrap();
        assert_eq!(state.select_file(pdf.clone()), Err(CoreError::AnalysisInProgress));
        assert_eq!(state.clear_file(), Err(CoreError::AnalysisInProgress));
        assert_eq!(state.set_symptoms("Cough"), Err(CoreError::AnalysisInProgress));
        assert_eq!(state.add_symptom_tag("Cough"), Err(CoreError::AnalysisInProgress));
        assert!(state.payload().unwrap().is_none());
        assert_eq!(state.symptoms().unwrap(), "Fever");
        assert_eq!(state.last_result().unwrap(), Some(record));
        drop(ticket);

        assert!(state.select_file(pdf).is_ok());
        assert!(state.set_symptoms("Cough").is_ok());
    }

    #[test]
    fn begin_analysis_clears_previous_error() {
        let (state, _) = state_with(MockModelClient::new("{}"));
        state.record_failure(&AnalysisError::NoJsonFound).unwrap();
        assert!(state.last_error().unwrap().is_some());
        let _ticket = state.begin_analysis().unwrap();
        assert!(state.last_error().unwrap().is_none());
    }

    #[tokio::test]
    async fn successful_run_records_result() {
        let (state, mock) = state_with(MockModelClient::new(SYMPTOM_REPLY));
        state.set_symptoms("Fever").unwrap();
        let record = state.run_analysis().await.unwrap();
        assert_eq!(record.result.summary, "Likely a cold");
        assert!(record.file_name.is_none());
        assert_eq!(mock.calls(), 1);
        assert_eq!(state.last_result().unwrap(), Some(record));
        assert!(!state.is_analyzing());
    }

    #[tokio::test]
    async fn failure_keeps_previous_result() {
        let (state, _) = state_with(MockModelClient::new(SYMPTOM_REPLY));
        state.set_symptoms("Fever").unwrap();
        let first = state.run_analysis().await.unwrap();

        // Same state, new client behaviour: swap by rebuilding around the old outcome.
        let failing: Arc<dyn ModelClient> = Arc::new(MockModelClient::failing("quota exceeded"));
        let state = CoreState {
            client: failing,
            ..state
        };
        let err = state.run_analysis().await.unwrap_err();
        assert_eq!(err, AnalysisError::UpstreamServiceError("quota exceeded".into()));
        assert_eq!(state.last_result().unwrap(), Some(first));
        assert_eq!(
            state.last_error().unwrap().unwrap().message,
            "quota exceeded"
        );
        assert!(!state.is_analyzing());
    }

    #[tokio::test]
    async fn no_input_is_recorded_inline() {
        let (state, mock) = state_with(MockModelClient::new("{}"));
        let err = state.run_analysis().await.unwrap_err();
        assert_eq!(err, AnalysisError::NoInputProvided);
        assert_eq!(mock.calls(), 0);
        assert_eq!(state.last_error().unwrap().unwrap().code, "NO_INPUT");
    }

    #[tokio::test]
    async fn selecting_file_clears_outcome_and_relabels_action() {
        let (state, _) = state_with(MockModelClient::new(SYMPTOM_REPLY));
        state.set_symptoms("Nausea").unwrap();
        state.run_analysis().await.unwrap();
        state.record_failure(&AnalysisError::NoJsonFound).unwrap();

        let summary = state.select_file(pdf_payload().await).unwrap();
        assert_eq!(summary.file_name, "labs.pdf");
        assert!(state.last_result().unwrap().is_none());
        assert!(state.last_error().unwrap().is_none());
        assert_eq!(state.snapshot().unwrap().action_label, "Analyze Report");
    }

    #[tokio::test]
    async fn clearing_file_keeps_outcome() {
        let (state, _) = state_with(MockModelClient::new(
            r#"{"summary":"ok","parameters":[{"name":"Hb","value":"14"}]}"#,
        ));
        state.select_file(pdf_payload().await).unwrap();
        let record = state.run_analysis().await.unwrap();
        assert_eq!(record.file_name.as_deref(), Some("labs.pdf"));

        state.clear_file().unwrap();
        assert!(state.payload().unwrap().is_none());
        assert!(state.last_result().unwrap().is_some());
        assert!(!state.can_analyze());
    }
}
