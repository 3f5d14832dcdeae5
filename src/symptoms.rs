//! Quick-add symptom vocabulary.

/// Tags offered as one-click additions to the symptom text.
pub const SYMPTOM_TAGS: &[&str] = &[
    "Fever",
    "Fatigue",
    "Headache",
    "Nausea",
    "Stomach Pain",
    "Cough",
    "Dizziness",
    "Skin Rash",
    "Joint Pain",
    "High Blood Pressure",
];

pub fn is_known_tag(tag: &str) -> bool {
    SYMPTOM_TAGS.contains(&tag)
}

/// Append `tag` to `current` with a comma-space separator.
///
/// Leaves the text unchanged when it already contains the tag anywhere
/// (plain substring match, so "Pain" is considered present in
/// "Stomach Pain").
pub fn append_symptom_tag(current: &str, tag: &str) -> String {
    if current.contains(tag) {
        current.to_string()
    } else if current.is_empty() {
        tag.to_string()
    } else {
        format!("{current}, {tag}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tag_stands_alone() {
        assert_eq!(append_symptom_tag("", "Fever"), "Fever");
    }

    #[test]
    fn duplicate_tag_not_inserted() {
        assert_eq!(append_symptom_tag("Fever", "Fever"), "Fever");
        assert_eq!(
            append_symptom_tag("High Fever since Monday", "Fever"),
            "High Fever since Monday"
        );
    }

    #[test]
    fn subsequent_tags_comma_separated() {
        let text = append_symptom_tag("Fever", "Cough");
        assert_eq!(text, "Fever, Cough");
        assert_eq!(append_symptom_tag(&text, "Nausea"), "Fever, Cough, Nausea");
    }

    #[test]
    fn free_text_preserved() {
        assert_eq!(
            append_symptom_tag("tired for two weeks", "Dizziness"),
            "tired for two weeks, Dizziness"
        );
    }

    #[test]
    fn match_is_case_sensitive() {
        assert_eq!(append_symptom_tag("fever", "Fever"), "fever, Fever");
    }

    #[test]
    fn vocabulary_lookup() {
        assert!(is_known_tag("Skin Rash"));
        assert!(!is_known_tag("skin rash"));
        assert!(!is_known_tag("Insomnia"));
    }
}
