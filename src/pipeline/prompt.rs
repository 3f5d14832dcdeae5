//! Instruction builder for the analysis request.
//!
//! The branch depends only on whether a file accompanies the request.

use super::types::SYMPTOM_ONLY_RAW_TEXT;

/// Marker sent in place of empty symptom text on file-based requests.
pub const NO_SYMPTOMS_MARKER: &str = "None";

const RESULT_SCHEMA: &str = r#"{
  "summary": "plain-language overview, 3-5 sentences",
  "parameters": [
    {
      "name": "parameter name as printed",
      "value": "measured value as printed",
      "unit": "unit or empty string",
      "normalRange": "reference range as printed",
      "meaning": "what this parameter measures, a few words",
      "status": "Normal | Abnormal | Critical | Unknown",
      "explanation": "one sentence on what this value means for the patient"
    }
  ],
  "abnormalities": ["each out-of-range finding or key symptom"],
  "possibleCauses": ["likely causes or conditions"],
  "lifestyleSuggestions": ["practical diet, activity or self-care advice"],
  "followUpConsiderations": ["tests or specialist visits to consider"],
  "disclaimer": "short reminder that this is not a diagnosis",
  "rawText": "the text read from the document",
  "confidenceScore": 0
}"#;

const REPORT_ROLE: &str = "\
You are a medical report interpreter. Read the attached medical document \
(lab report, prescription or clinical note), explain every measured parameter \
in plain language and flag anything outside its reference range.";

const TRIAGE_ROLE: &str = "\
You are a symptom triage assistant. Based only on the symptoms described \
below, explain what they may indicate, what the person can do now, and when \
they should see a doctor.";

const OUTPUT_RULES: &str = "\
Return ONLY strictly valid JSON matching this shape, with no markdown fences \
and no text before or after it:";

/// Build the natural-language instruction sent with the request.
pub fn build_instruction(has_file: bool, symptoms: &str) -> String {
    let symptoms = symptoms.trim();
    if has_file {
        let context = if symptoms.is_empty() {
            NO_SYMPTOMS_MARKER
        } else {
            symptoms
        };
        format!(
            "{REPORT_ROLE}\n\
             Set \"confidenceScore\" to how reliably you could read the document, \
             from 0 (unreadable or not a medical document) to 100 (perfectly legible).\n\n\
             {OUTPUT_RULES}\n{RESULT_SCHEMA}\n\n\
             User symptoms: {context}\n"
        )
    } else {
        format!(
            "{TRIAGE_ROLE}\n\
             There is no document: leave \"parameters\" empty, set \"rawText\" to \
             \"{SYMPTOM_ONLY_RAW_TEXT}\" and omit \"confidenceScore\".\n\n\
             {OUTPUT_RULES}\n{RESULT_SCHEMA}\n\n\
             Symptoms: {symptoms}\n"
        )
    }
}
