//! Answers recorded against wizard steps.

use serde::{Deserialize, Serialize};

/// What the user submitted for a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    /// One option picked from a list.
    Choice(String),
    /// Several options picked from a list. Duplicates are dropped, order kept.
    Choices(Vec<String>),
    /// Free text.
    Text(String),
    /// The user explicitly skipped an optional step.
    Skipped,
}

impl Answer {
    pub fn choice(label: impl Into<String>) -> Self {
        Self::Choice(label.into())
    }

    pub fn choices<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for label in labels {
            let label = label.into();
            if !out.contains(&label) {
                out.push(label);
            }
        }
        Self::Choices(out)
    }

    /// Free text. Blank text is treated as a skip.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Self::Skipped
        } else {
            Self::Text(value)
        }
    }

    pub fn as_choice(&self) -> Option<&str> {
        match self {
            Self::Choice(label) => Some(label),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// Every label this answer selects (empty for text and skips).
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Self::Choice(label) => vec![label.as_str()],
            Self::Choices(labels) => labels.iter().map(String::as_str).collect(),
            Self::Text(_) | Self::Skipped => Vec::new(),
        }
    }

    /// Short description of the answer's shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Choice(_) => "a single choice",
            Self::Choices(_) => "a set of choices",
            Self::Text(_) => "text",
            Self::Skipped => "a skip",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_dedupe_and_keep_order() {
        let answer = Answer::choices(["Reading", "Exercise", "Reading"]);
        assert_eq!(answer.labels(), vec!["Reading", "Exercise"]);
    }

    #[test]
    fn blank_text_is_a_skip() {
        assert!(Answer::text("   ").is_skipped());
        assert_eq!(Answer::text("my sister").as_text(), Some("my sister"));
    }

    #[test]
    fn labels_of_non_choice_answers_are_empty() {
        assert!(Answer::Skipped.labels().is_empty());
        assert!(Answer::Text("hello".into()).labels().is_empty());
        assert_eq!(Answer::choice("Often").labels(), vec!["Often"]);
    }

    #[test]
    fn serde_shape() {
        let json = serde_json::to_value(Answer::choice("Often")).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "choice", "value": "Often"}));
        let json = serde_json::to_value(Answer::Skipped).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "skipped"}));
    }
}
