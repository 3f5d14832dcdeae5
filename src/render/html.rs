//! HTML fragments for the result area of the page.
//!
//! Output is a fragment, not a document; the page drops it into its
//! result container. Every piece of model-provided text goes through
//! [`escape_html`].

use std::fmt::Write;

use super::view::{
    confidence_badge, Disclosure, ResultView, RowTint, DISCLAIMER_TITLE, ERROR_TITLE,
    FOLLOW_UP_TITLE, PARAMETER_TABLE_TITLE, RAW_TEXT_TITLE, SUMMARY_TITLE,
};
use crate::pipeline::{AnalysisError, AnalysisResult, ParameterFinding};

/// Escape text for use in element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn open_attr(section: Disclosure) -> &'static str {
    if section.open_by_default() {
        " open"
    } else {
        ""
    }
}

// ═══════════════════════════════════════════════════════════
// Result
// ═══════════════════════════════════════════════════════════

pub fn render_result_html(result: &AnalysisResult) -> String {
    let view = ResultView::from(result);
    let titles = view.titles();
    let mut html = String::with_capacity(4096);

    // `write!` into a String cannot fail.
    let _ = write!(html, r#"<section class="result result-{}">"#, variant_slug(view));

    // Heading + badge
    let _ = write!(
        html,
        r#"<header class="result-header"><h2>{}</h2>"#,
        escape_html(titles.heading)
    );
    if let Some((score, tone)) = confidence_badge(view, result) {
        let _ = write!(
            html,
            r#"<span class="badge {}">Parsing Confidence: {}%</span>"#,
            tone.css_class(),
            score
        );
    }
    html.push_str("</header>");

    // Disclaimer
    let _ = write!(
        html,
        r#"<aside class="disclaimer"><p class="disclaimer-title">{}</p><p>{}</p></aside>"#,
        DISCLAIMER_TITLE,
        escape_html(&result.disclaimer)
    );

    // Summary
    let _ = write!(
        html,
        r#"<div class="card"><h3>{}</h3><p class="summary">{}</p></div>"#,
        SUMMARY_TITLE,
        escape_html(&result.summary)
    );

    if !result.abnormalities.is_empty() {
        let _ = write!(
            html,
            r#"<div class="card card-alert"><h3>{}</h3>{}</div>"#,
            escape_html(titles.abnormalities),
            bullet_list(&result.abnormalities)
        );
    }

    if view.shows_parameter_table() {
        let _ = write!(
            html,
            r#"<details class="card"{}><summary>{}</summary>{}</details>"#,
            open_attr(Disclosure::ParameterTable),
            PARAMETER_TABLE_TITLE,
            parameter_table(&result.parameters)
        );
    }

    let _ = write!(
        html,
        r#"<div class="columns"><div class="card"><h3>{}</h3>{}</div><div class="card"><h3>{}</h3>{}</div></div>"#,
        escape_html(titles.causes),
        bullet_list(&result.possible_causes),
        escape_html(titles.lifestyle),
        bullet_list(&result.lifestyle_suggestions)
    );

    let _ = write!(
        html,
        r#"<details class="card"{}><summary>{}</summary>{}</details>"#,
        open_attr(Disclosure::FollowUp),
        escape_html(FOLLOW_UP_TITLE),
        numbered_list(&result.follow_up_considerations)
    );

    if let Some(raw) = result.displayable_raw_text() {
        let _ = write!(
            html,
            r#"<details class="raw-text"{}><summary>{}</summary><pre>{}</pre></details>"#,
            open_attr(Disclosure::RawText),
            RAW_TEXT_TITLE,
            escape_html(raw)
        );
    }

    html.push_str("</section>");
    html
}

fn variant_slug(view: ResultView) -> &'static str {
    match view {
        ResultView::ParameterBacked => "report",
        ResultView::SymptomOnly => "symptoms",
    }
}

fn bullet_list(items: &[String]) -> String {
    let mut out = String::from("<ul>");
    for item in items {
        let _ = write!(out, "<li>{}</li>", escape_html(item));
    }
    out.push_str("</ul>");
    out
}

/// Ordered list with explicit numbers starting at 1.
fn numbered_list(items: &[String]) -> String {
    let mut out = String::from(r#"<ol class="steps">"#);
    for (idx, item) in items.iter().enumerate() {
        let _ = write!(
            out,
            r#"<li><span class="step-number">{}</span><span>{}</span></li>"#,
            idx + 1,
            escape_html(item)
        );
    }
    out.push_str("</ol>");
    out
}

fn parameter_table(rows: &[ParameterFinding]) -> String {
    let mut out = String::from(
        "<table><thead><tr><th>Parameter</th><th>Value / Unit</th>\
         <th>Reference</th><th>Interpretation</th></tr></thead><tbody>",
    );
    for row in rows {
        let tint = RowTint::from(row.status);
        let _ = write!(
            out,
            r#"<tr class="{}"><td><strong>{}</strong><small>{}</small></td><td><strong>{}</strong><small>{}</small></td><td class="mono">{}</td><td><span class="pill pill-{}">{}</span>"#,
            tint.css_class(),
            escape_html(&row.name),
            escape_html(&row.meaning),
            escape_html(&row.value),
            escape_html(&row.unit),
            escape_html(&row.normal_range),
            row.status.as_str().to_ascii_lowercase(),
            row.status.as_str()
        );
        if let Some(explanation) = row.explanation.as_deref().filter(|e| !e.is_empty()) {
            let _ = write!(out, "<p>{}</p>", escape_html(explanation));
        }
        out.push_str("</td></tr>");
    }
    out.push_str("</tbody></table>");
    out
}

// ═══════════════════════════════════════════════════════════
// Error
// ═══════════════════════════════════════════════════════════

pub fn render_error_html(err: &AnalysisError) -> String {
    render_error_message(&err.user_message())
}

/// Inline error box for an already user-facing message.
pub fn render_error_message(message: &str) -> String {
    format!(
        r#"<div class="error" role="alert"><h3>{}</h3><p>{}</p></div>"#,
        ERROR_TITLE,
        escape_html(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{ParameterStatus, SYMPTOM_ONLY_RAW_TEXT};

    fn finding(name: &str, status: ParameterStatus) -> ParameterFinding {
        ParameterFinding {
            name: name.into(),
            value: "13.5".into(),
            unit: "g/dL".into(),
            normal_range: "12-16".into(),
            meaning: "Oxygen carrier".into(),
            status,
            explanation: None,
        }
    }

    fn report() -> AnalysisResult {
        AnalysisResult {
            summary: "Mostly normal".into(),
            parameters: vec![
                finding("Hemoglobin", ParameterStatus::Normal),
                finding("Glucose", ParameterStatus::Critical),
            ],
            abnormalities: vec!["Glucose high".into()],
            possible_causes: vec!["Diet".into()],
            lifestyle_suggestions: vec!["Walk daily".into()],
            follow_up_considerations: vec!["Repeat fasting test".into(), "See GP".into()],
            disclaimer: "Not medical advice".into(),
            raw_text: Some("HGB 13.5".into()),
            confidence_score: Some(92.0),
        }
    }

    fn symptom_result() -> AnalysisResult {
        AnalysisResult {
            summary: "Likely viral".into(),
            abnormalities: vec!["Fever".into()],
            possible_causes: vec!["Influenza".into()],
            lifestyle_suggestions: vec!["Rest".into()],
            follow_up_considerations: vec!["See a doctor if it persists".into()],
            disclaimer: "Not medical advice".into(),
            raw_text: Some(SYMPTOM_ONLY_RAW_TEXT.into()),
            confidence_score: Some(70.0),
            ..Default::default()
        }
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<b>"A" & 'B'</b>"#),
            "&lt;b&gt;&quot;A&quot; &amp; &#39;B&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn report_uses_report_titles_table_and_badge() {
        let html = render_result_html(&report());
        assert!(html.contains("Report Analysis Results"));
        assert!(html.contains("Abnormal Findings"));
        assert!(html.contains("Potential Causes"));
        assert!(html.contains("Lifestyle Tips"));
        assert!(html.contains(PARAMETER_TABLE_TITLE));
        assert!(html.contains("<table>"));
        assert!(html.contains(r#"<span class="badge badge-good">Parsing Confidence: 92%</span>"#));
    }

    #[test]
    fn empty_parameters_give_symptom_titles_without_table_or_badge() {
        let html = render_result_html(&symptom_result());
        assert!(html.contains("Symptom Analysis Results"));
        assert!(html.contains("Key Symptoms Identified"));
        assert!(html.contains("Possible Conditions"));
        assert!(html.contains("Treatment &amp; Advice"));
        assert!(!html.contains("<table>"));
        assert!(!html.contains(PARAMETER_TABLE_TITLE));
        assert!(!html.contains("Parsing Confidence"));
    }

    #[test]
    fn placeholder_raw_text_hidden() {
        let html = render_result_html(&symptom_result());
        assert!(!html.contains(RAW_TEXT_TITLE));
        assert!(!html.contains(SYMPTOM_ONLY_RAW_TEXT));

        let empty = AnalysisResult {
            raw_text: Some(String::new()),
            ..report()
        };
        assert!(!render_result_html(&empty).contains(RAW_TEXT_TITLE));
    }

    #[test]
    fn raw_text_collapsed_others_open() {
        let html = render_result_html(&report());
        assert!(html.contains(&format!(
            r#"<details class="raw-text"><summary>{RAW_TEXT_TITLE}</summary><pre>HGB 13.5</pre>"#
        )));
        assert!(html.contains(&format!(
            r#"<details class="card" open><summary>{PARAMETER_TABLE_TITLE}</summary>"#
        )));
        assert!(html.contains(
            r#"<details class="card" open><summary>Next Steps &amp; Follow-up</summary>"#
        ));
    }

    #[test]
    fn abnormalities_panel_omitted_when_empty() {
        let result = AnalysisResult {
            abnormalities: vec![],
            ..report()
        };
        assert!(!render_result_html(&result).contains("Abnormal Findings"));
    }

    #[test]
    fn rows_tinted_by_status() {
        let html = render_result_html(&report());
        assert!(html.contains(r#"<tr class="row-neutral"><td><strong>Hemoglobin"#));
        assert!(html.contains(r#"<tr class="row-alert"><td><strong>Glucose"#));
        assert!(html.contains(r#"<span class="pill pill-critical">Critical</span>"#));
    }

    #[test]
    fn follow_up_numbered_from_one() {
        let html = render_result_html(&report());
        assert!(html.contains(
            r#"<span class="step-number">1</span><span>Repeat fasting test</span>"#
        ));
        assert!(html.contains(r#"<span class="step-number">2</span><span>See GP</span>"#));
    }

    #[test]
    fn model_text_is_escaped() {
        let result = AnalysisResult {
            summary: "<script>alert(1)</script>".into(),
            ..symptom_result()
        };
        let html = render_result_html(&result);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn zero_score_badge_is_neutral() {
        let result = AnalysisResult {
            confidence_score: Some(0.0),
            ..report()
        };
        assert!(render_result_html(&result).contains("badge badge-neutral"));
    }

    #[test]
    fn error_fragment_uses_user_message() {
        let html = render_error_html(&AnalysisError::NoInputProvided);
        assert!(html.contains("Please upload a medical report OR describe your symptoms"));
        assert!(html.starts_with(r#"<div class="error""#));
    }
}
