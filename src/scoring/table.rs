//! Per-question weight tables.

use serde::{Deserialize, Serialize};

use crate::wizard::Answer;

/// Whether a question takes one answer or a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    Single,
    Multi,
}

/// Fixed mapping from answer label to signed weight for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    pub question: String,
    pub selection: Selection,
    /// Options in display order.
    pub weights: Vec<(String, i64)>,
}

impl ScoreTable {
    pub fn single(question: impl Into<String>, weights: &[(&str, i64)]) -> Self {
        Self::new(question, Selection::Single, weights)
    }

    pub fn multi(question: impl Into<String>, weights: &[(&str, i64)]) -> Self {
        Self::new(question, Selection::Multi, weights)
    }

    fn new(question: impl Into<String>, selection: Selection, weights: &[(&str, i64)]) -> Self {
        Self {
            question: question.into(),
            selection,
            weights: weights
                .iter()
                .map(|(label, weight)| (label.to_string(), *weight))
                .collect(),
        }
    }

    /// Weight of `label`; unknown labels weigh 0.
    pub fn weight(&self, label: &str) -> i64 {
        self.weights
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, w)| *w)
            .unwrap_or(0)
    }

    /// Score an answer against this table.
    ///
    /// Single choice ⇒ its weight; set ⇒ sum of its weights; text and skips
    /// ⇒ 0.
    pub fn score(&self, answer: &Answer) -> i64 {
        answer.labels().into_iter().map(|l| self.weight(l)).sum()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.weights.iter().map(|(l, _)| l.as_str())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.weights.iter().any(|(l, _)| l == label)
    }

    /// Lowest score this question can contribute. Skipping scores 0, so
    /// 0 is always reachable.
    pub fn min_score(&self) -> i64 {
        match self.selection {
            Selection::Single => self.weights.iter().map(|(_, w)| *w).min().unwrap_or(0).min(0),
            Selection::Multi => self.weights.iter().map(|(_, w)| *w).filter(|w| *w < 0).sum(),
        }
    }

    /// Highest score this question can contribute.
    pub fn max_score(&self) -> i64 {
        match self.selection {
            Selection::Single => self.weights.iter().map(|(_, w)| *w).max().unwrap_or(0).max(0),
            Selection::Multi => self.weights.iter().map(|(_, w)| *w).filter(|w| *w > 0).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mood() -> ScoreTable {
        ScoreTable::single("mood", &[("Rested", 0), ("Okay", 2), ("Tired", 4)])
    }

    #[test]
    fn single_uses_one_weight() {
        assert_eq!(mood().score(&Answer::choice("Tired")), 4);
    }

    #[test]
    fn missing_label_weighs_zero() {
        assert_eq!(mood().weight("Ecstatic"), 0);
        assert_eq!(mood().score(&Answer::choice("Ecstatic")), 0);
    }

    #[test]
    fn multi_sums_selection() {
        let table = ScoreTable::multi("recharge", &[("Exercise", -2), ("Reading", -1), ("Music", -1)]);
        assert_eq!(table.score(&Answer::choices(["Exercise", "Reading"])), -3);
        assert_eq!(table.score(&Answer::Choices(Vec::new())), 0);
    }

    #[test]
    fn text_and_skip_score_zero() {
        assert_eq!(mood().score(&Answer::Skipped), 0);
        assert_eq!(mood().score(&Answer::Text("Tired".into())), 0);
    }

    #[test]
    fn score_range() {
        assert_eq!(mood().min_score(), 0);
        assert_eq!(mood().max_score(), 4);

        let multi = ScoreTable::multi("m", &[("a", -2), ("b", 3), ("c", -1)]);
        assert_eq!(multi.min_score(), -3);
        assert_eq!(multi.max_score(), 3);
    }
}
