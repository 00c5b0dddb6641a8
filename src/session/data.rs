use crate::language::Language;
use serde::{Deserialize, Serialize};

/// Fixed categories for structured medical data submissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataCategory {
    Blood,
    Urine,
    Pulse,
    Stool,
}

impl DataCategory {
    pub const ALL: [DataCategory; 4] = [
        DataCategory::Blood,
        DataCategory::Urine,
        DataCategory::Pulse,
        DataCategory::Stool,
    ];

    /// Localized display label for this category
    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (DataCategory::Blood, Language::En) => "Blood Test",
            (DataCategory::Urine, Language::En) => "Urine Test",
            (DataCategory::Pulse, Language::En) => "Pulse Rate",
            (DataCategory::Stool, Language::En) => "Stool Test",
            (DataCategory::Blood, Language::Zh) => "验血",
            (DataCategory::Urine, Language::Zh) => "验尿",
            (DataCategory::Pulse, Language::Zh) => "脉搏",
            (DataCategory::Stool, Language::Zh) => "粪便检查",
        }
    }

    /// Format a submitted value under a header naming this category
    pub fn format_submission(&self, language: Language, value: &str) -> String {
        format!("{}\n{}", language.data_header(self.label(language)), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_submission_contains_label_and_value() {
        let text = DataCategory::Pulse.format_submission(Language::En, "80 BPM");
        assert!(text.contains("Pulse Rate"));
        assert!(text.contains("80 BPM"));
    }

    #[test]
    fn test_header_pattern_is_consistent() {
        for category in DataCategory::ALL {
            let text = category.format_submission(Language::En, "v");
            assert!(text.starts_with('['));
            assert!(text.ends_with("\nv"));
        }
    }

    #[test]
    fn test_localized_labels() {
        assert_eq!(DataCategory::Blood.label(Language::Zh), "验血");
        assert_eq!(DataCategory::Blood.label(Language::En), "Blood Test");
    }
}
