use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder the model writes into `rawText` for symptom-only analyses.
pub const SYMPTOM_ONLY_RAW_TEXT: &str = "Symptom Analysis Only";

/// Results from a file-based analysis below this self-reported score are rejected.
pub const CONFIDENCE_FLOOR: f64 = 30.0;

/// Structured analysis returned by the model.
///
/// Field names follow the JSON contract the prompt asks for (camelCase).
/// Decoding is lenient about absent fields: lists default to empty, text to
/// empty. Anything that is present must still have a compatible type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    #[serde(deserialize_with = "text_or_default")]
    pub summary: String,
    pub parameters: Vec<ParameterFinding>,
    pub abnormalities: Vec<String>,
    pub possible_causes: Vec<String>,
    pub lifestyle_suggestions: Vec<String>,
    pub follow_up_considerations: Vec<String>,
    #[serde(deserialize_with = "text_or_default")]
    pub disclaimer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
}

impl AnalysisResult {
    /// Raw text worth showing: present, non-empty and not the symptom placeholder.
    pub fn displayable_raw_text(&self) -> Option<&str> {
        self.raw_text
            .as_deref()
            .filter(|t| !t.is_empty() && *t != SYMPTOM_ONLY_RAW_TEXT)
    }

    /// True when the result may be shown for a request that did (or did not)
    /// carry a file.
    pub fn meets_confidence_floor(&self, file_supplied: bool) -> bool {
        match (file_supplied, self.confidence_score) {
            (true, Some(score)) => score >= CONFIDENCE_FLOOR,
            _ => true,
        }
    }
}

/// One lab measurement row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParameterFinding {
    #[serde(deserialize_with = "text_or_default")]
    pub name: String,
    /// Kept as text: models return both `"13.5"` and `13.5`.
    #[serde(deserialize_with = "text_or_default")]
    pub value: String,
    #[serde(deserialize_with = "text_or_default")]
    pub unit: String,
    #[serde(deserialize_with = "text_or_default")]
    pub normal_range: String,
    #[serde(deserialize_with = "text_or_default")]
    pub meaning: String,
    #[serde(deserialize_with = "status_or_unknown")]
    pub status: ParameterStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterStatus {
    Normal,
    Abnormal,
    Critical,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ParameterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Abnormal => "Abnormal",
            Self::Critical => "Critical",
            Self::Unknown => "Unknown",
        }
    }
}

/// Accept a string, a number, a bool or null where text is expected.
fn text_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(String::new()),
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!(
            "expected text, found {}",
            json_kind(&other)
        ))),
    }
}

fn status_or_unknown<'de, D>(deserializer: D) -> Result<ParameterStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ParameterStatus>::deserialize(deserializer)?.unwrap_or_default())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
        _ => "a scalar",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_shape() {
        let json = r#"{
            "summary": "Mild anaemia.",
            "parameters": [{
                "name": "Hemoglobin", "value": "10.9", "unit": "g/dL",
                "normalRange": "12-16", "meaning": "Oxygen carrier",
                "status": "Abnormal", "explanation": "Slightly low."
            }],
            "abnormalities": ["Low hemoglobin"],
            "possibleCauses": ["Iron deficiency"],
            "lifestyleSuggestions": ["Eat leafy greens"],
            "followUpConsiderations": ["Repeat CBC in 4 weeks"],
            "disclaimer": "Not medical advice.",
            "rawText": "HGB 10.9",
            "confidenceScore": 88
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.parameters.len(), 1);
        assert_eq!(result.parameters[0].status, ParameterStatus::Abnormal);
        assert_eq!(result.parameters[0].normal_range, "12-16");
        assert_eq!(result.possible_causes, vec!["Iron deficiency"]);
        assert_eq!(result.confidence_score, Some(88.0));
        assert_eq!(result.raw_text.as_deref(), Some("HGB 10.9"));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let result: AnalysisResult = serde_json::from_str(r#"{"summary": "ok"}"#).unwrap();
        assert_eq!(result.summary, "ok");
        assert!(result.parameters.is_empty());
        assert!(result.follow_up_considerations.is_empty());
        assert!(result.disclaimer.is_empty());
        assert!(result.confidence_score.is_none());
    }

    #[test]
    fn numeric_value_kept_as_text() {
        let p: ParameterFinding =
            serde_json::from_str(r#"{"name": "Glucose", "value": 5.4, "status": "Normal"}"#)
                .unwrap();
        assert_eq!(p.value, "5.4");
        assert_eq!(p.unit, "");
    }

    #[test]
    fn unknown_status_maps_to_unknown() {
        let p: ParameterFinding =
            serde_json::from_str(r#"{"name": "TSH", "status": "Borderline"}"#).unwrap();
        assert_eq!(p.status, ParameterStatus::Unknown);
        let p: ParameterFinding = serde_json::from_str(r#"{"name": "TSH"}"#).unwrap();
        assert_eq!(p.status, ParameterStatus::Unknown);
        let p: ParameterFinding =
            serde_json::from_str(r#"{"name": "TSH", "status": null}"#).unwrap();
        assert_eq!(p.status, ParameterStatus::Unknown);
    }

    #[test]
    fn object_where_text_expected_is_rejected() {
        let err = serde_json::from_str::<AnalysisResult>(r#"{"summary": {"a": 1}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("expected text"));
    }

    #[test]
    fn placeholder_raw_text_is_not_displayable() {
        let mut result = AnalysisResult {
            raw_text: Some(SYMPTOM_ONLY_RAW_TEXT.into()),
            ..Default::default()
        };
        assert!(result.displayable_raw_text().is_none());
        result.raw_text = Some(String::new());
        assert!(result.displayable_raw_text().is_none());
        result.raw_text = Some("WBC 7.2".into());
        assert_eq!(result.displayable_raw_text(), Some("WBC 7.2"));
    }

    #[test]
    fn confidence_floor_only_applies_with_file() {
        let low = AnalysisResult {
            confidence_score: Some(29.0),
            ..Default::default()
        };
        assert!(!low.meets_confidence_floor(true));
        assert!(low.meets_confidence_floor(false));

        let edge = AnalysisResult {
            confidence_score: Some(30.0),
            ..Default::default()
        };
        assert!(edge.meets_confidence_floor(true));

        assert!(AnalysisResult::default().meets_confidence_floor(true));
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(AnalysisResult {
            possible_causes: vec!["x".into()],
            ..Default::default()
        })
        .unwrap();
        assert!(json.get("possibleCauses").is_some());
        assert!(json.get("rawText").is_none());
    }
}
