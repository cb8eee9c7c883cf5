//! Running score over a sheet of question tables.

use std::collections::BTreeMap;

use crate::wizard::Answer;

use super::table::ScoreTable;

/// The full set of scored questions for a quiz.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreSheet {
    tables: Vec<ScoreTable>,
}

impl ScoreSheet {
    pub fn new(tables: Vec<ScoreTable>) -> Self {
        Self { tables }
    }

    pub fn table(&self, question: &str) -> Option<&ScoreTable> {
        self.tables.iter().find(|t| t.question == question)
    }

    pub fn tables(&self) -> &[ScoreTable] {
        &self.tables
    }

    /// Score one answer. Questions without a table weigh 0.
    pub fn score(&self, question: &str, answer: &Answer) -> i64 {
        self.table(question).map(|t| t.score(answer)).unwrap_or(0)
    }

    /// Sum a whole answer sequence from scratch.
    pub fn total<'a, I>(&self, answers: I) -> i64
    where
        I: IntoIterator<Item = (&'a str, &'a Answer)>,
    {
        answers.into_iter().map(|(q, a)| self.score(q, a)).sum()
    }

    /// Lowest reachable total.
    pub fn min_total(&self) -> i64 {
        self.tables.iter().map(ScoreTable::min_score).sum()
    }

    /// Highest reachable total.
    pub fn max_total(&self) -> i64 {
        self.tables.iter().map(ScoreTable::max_score).sum()
    }
}

/// Incrementally maintained total.
///
/// Recording an answer for a question replaces that question's previous
/// contribution, so `total()` always equals `recompute()`.
#[derive(Debug, Clone, Default)]
pub struct ScoreAccumulator {
    sheet: ScoreSheet,
    answers: BTreeMap<String, Answer>,
    contributions: BTreeMap<String, i64>,
    total: i64,
}

impl ScoreAccumulator {
    pub fn new(sheet: ScoreSheet) -> Self {
        Self {
            sheet,
            ..Default::default()
        }
    }

    pub fn sheet(&self) -> &ScoreSheet {
        &self.sheet
    }

    /// Record (or replace) the answer for `question`. Returns its weight.
    pub fn record(&mut self, question: &str, answer: Answer) -> i64 {
        let weight = self.sheet.score(question, &answer);
        let previous = self.contributions.insert(question.to_string(), weight).unwrap_or(0);
        self.total += weight - previous;
        self.answers.insert(question.to_string(), answer);
        weight
    }

    /// Forget the answer for `question`.
    pub fn remove(&mut self, question: &str) -> Option<Answer> {
        if let Some(weight) = self.contributions.remove(question) {
            self.total -= weight;
        }
        self.answers.remove(question)
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    /// Contribution of one question, if answered.
    pub fn contribution(&self, question: &str) -> Option<i64> {
        self.contributions.get(question).copied()
    }

    pub fn answers(&self) -> &BTreeMap<String, Answer> {
        &self.answers
    }

    /// Recompute the total from the recorded answers.
    pub fn recompute(&self) -> i64 {
        self.sheet
            .total(self.answers.iter().map(|(q, a)| (q.as_str(), a)))
    }

    pub fn clear(&mut self) {
        self.answers.clear();
        self.contributions.clear();
        self.total = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> ScoreSheet {
        ScoreSheet::new(vec![
            ScoreTable::single("q1", &[("Rarely", 1), ("Often", 5)]),
            ScoreTable::single("q2", &[("Rested", 0), ("Tired", 4)]),
            ScoreTable::multi("q3", &[("Exercise", -2), ("Reading", -1)]),
        ])
    }

    #[test]
    fn incremental_matches_recompute_after_edits() {
        let mut acc = ScoreAccumulator::new(sheet());
        acc.record("q1", Answer::choice("Often"));
        acc.record("q2", Answer::choice("Tired"));
        acc.record("q3", Answer::choices(["Exercise", "Reading"]));
        assert_eq!(acc.total(), 6);
        assert_eq!(acc.total(), acc.recompute());

        acc.record("q1", Answer::choice("Rarely"));
        assert_eq!(acc.total(), 2);
        assert_eq!(acc.total(), acc.recompute());

        acc.remove("q3");
        assert_eq!(acc.total(), 5);
        assert_eq!(acc.total(), acc.recompute());
    }

    #[test]
    fn unknown_question_contributes_zero() {
        let mut acc = ScoreAccumulator::new(sheet());
        assert_eq!(acc.record("q99", Answer::choice("Often")), 0);
        assert_eq!(acc.total(), 0);
    }

    #[test]
    fn same_sequence_same_total() {
        let answers = [
            ("q1", Answer::choice("Often")),
            ("q3", Answer::choices(["Reading"])),
        ];
        let s = sheet();
        let a = s.total(answers.iter().map(|(q, a)| (*q, a)));
        let b = s.total(answers.iter().map(|(q, a)| (*q, a)));
        assert_eq!(a, 4);
        assert_eq!(a, b);
    }

    #[test]
    fn sheet_range() {
        let s = sheet();
        assert_eq!(s.min_total(), -3);
        assert_eq!(s.max_total(), 9);
    }

    #[test]
    fn clear_resets_total() {
        let mut acc = ScoreAccumulator::new(sheet());
        acc.record("q1", Answer::choice("Often"));
        acc.clear();
        assert_eq!(acc.total(), 0);
        assert!(acc.answers().is_empty());
        assert_eq!(acc.contribution("q1"), None);
    }
}
