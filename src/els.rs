//! Emotional Load Test: a five-question quiz with a weighted score.
//!
//! Weights and thresholds are placeholder business rules.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::render::{InputKind, Render, StepView};
use crate::scoring::{
    LoadColor, LoadZone, ScoreAccumulator, ScoreSheet, ScoreTable, Selection, percent_of_range,
};
use crate::wizard::step::unexpected;
use crate::wizard::{Answer, Flow, Step};

/// Steps of the ELS test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElsStep {
    Intro,
    Drained,
    HoldingBack,
    EndOfDay,
    Support,
    Recharge,
    Result,
}

impl ElsStep {
    /// The scored questions, in order.
    pub const QUESTIONS: [ElsStep; 5] = [
        Self::Drained,
        Self::HoldingBack,
        Self::EndOfDay,
        Self::Support,
        Self::Recharge,
    ];

    /// Question id used in the score sheet, for scored steps.
    pub fn question_id(&self) -> Option<&'static str> {
        match self {
            Self::Drained => Some("drained"),
            Self::HoldingBack => Some("holding_back"),
            Self::EndOfDay => Some("end_of_day"),
            Self::Support => Some("support"),
            Self::Recharge => Some("recharge"),
            Self::Intro | Self::Result => None,
        }
    }

    pub fn question_text(&self) -> Option<&'static str> {
        match self {
            Self::Drained => Some("How often do you feel emotionally drained?"),
            Self::HoldingBack => Some("How often do you hold back what you really want to say?"),
            Self::EndOfDay => Some("How do you usually feel at the end of the day?"),
            Self::Support => Some("Do you have someone you can talk to openly?"),
            Self::Recharge => Some("Which of these help you recharge? Pick any that apply."),
            Self::Intro | Self::Result => None,
        }
    }
}

impl Step for ElsStep {
    const ALL: &'static [Self] = &[
        Self::Intro,
        Self::Drained,
        Self::HoldingBack,
        Self::EndOfDay,
        Self::Support,
        Self::Recharge,
        Self::Result,
    ];

    fn first() -> Self {
        Self::Intro
    }

    fn successors(&self) -> &'static [Self] {
        match self {
            Self::Intro => &[Self::Drained],
            Self::Drained => &[Self::HoldingBack],
            Self::HoldingBack => &[Self::EndOfDay],
            Self::EndOfDay => &[Self::Support],
            Self::Support => &[Self::Recharge],
            Self::Recharge => &[Self::Result],
            Self::Result => &[],
        }
    }
}

impl std::fmt::Display for ElsStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Intro => "intro",
            Self::Drained => "drained",
            Self::HoldingBack => "holding_back",
            Self::EndOfDay => "end_of_day",
            Self::Support => "support",
            Self::Recharge => "recharge",
            Self::Result => "result",
        };
        write!(f, "{s}")
    }
}

/// The ELS weight tables.
pub fn els_sheet() -> ScoreSheet {
    ScoreSheet::new(vec![
        ScoreTable::single(
            "drained",
            &[("Never", 0), ("Rarely", 1), ("Sometimes", 3), ("Often", 5), ("Always", 6)],
        ),
        ScoreTable::single(
            "holding_back",
            &[("Rarely", 1), ("Sometimes", 3), ("Often", 5)],
        ),
        ScoreTable::single(
            "end_of_day",
            &[("Rested", 0), ("Okay", 2), ("Tired", 4), ("Exhausted", 6)],
        ),
        ScoreTable::single("support", &[("Yes", 0), ("Sometimes", 2), ("No", 4)]),
        ScoreTable::multi(
            "recharge",
            &[
                ("Exercise", -2),
                ("Reading", -1),
                ("Music", -1),
                ("Time outdoors", -2),
                ("Talking with friends", -2),
            ],
        ),
    ])
}

/// Final ELS outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ElsResult {
    pub total: i64,
    pub zone: LoadZone,
    /// Position of the total within the reachable range, 0–100.
    pub percent: u8,
    pub color: LoadColor,
}

/// ELS flow state: the running score.
#[derive(Debug, Clone)]
pub struct ElsFlow {
    scores: ScoreAccumulator,
}

impl Default for ElsFlow {
    fn default() -> Self {
        Self {
            scores: ScoreAccumulator::new(els_sheet()),
        }
    }
}

impl ElsFlow {
    pub fn total(&self) -> i64 {
        self.scores.total()
    }

    pub fn scores(&self) -> &ScoreAccumulator {
        &self.scores
    }

    /// Score and bucket whatever has been answered so far.
    pub fn result(&self) -> ElsResult {
        let total = self.scores.total();
        let sheet = self.scores.sheet();
        let percent = percent_of_range(total, sheet.min_total(), sheet.max_total());
        ElsResult {
            total,
            zone: *LoadZone::scale().bucket(total),
            percent,
            color: *LoadColor::scale().bucket(i64::from(percent)),
        }
    }

    fn check_shape(&self, step: ElsStep, answer: &Answer) -> Result<()> {
        let Some(question) = step.question_id() else {
            return Ok(());
        };
        let selection = self
            .scores
            .sheet()
            .table(question)
            .map(|t| t.selection)
            .unwrap_or(Selection::Single);
        match (selection, answer) {
            (_, Answer::Skipped) => Ok(()),
            (Selection::Single, Answer::Choice(_)) => Ok(()),
            (Selection::Multi, Answer::Choices(_)) => Ok(()),
            (Selection::Single, _) => Err(unexpected(step, "a single choice")),
            (Selection::Multi, _) => Err(unexpected(step, "a set of choices")),
        }
    }
}

impl Flow for ElsFlow {
    type Step = ElsStep;
    const NAME: &'static str = "els";

    fn apply(&mut self, step: ElsStep, answer: &Answer) -> Result<()> {
        self.check_shape(step, answer)?;
        if let Some(question) = step.question_id() {
            let weight = self.scores.record(question, answer.clone());
            tracing::debug!(question, weight, total = self.scores.total(), "els answer scored");
        }
        Ok(())
    }

    fn next(&self, step: ElsStep, answer: &Answer) -> Result<ElsStep> {
        self.check_shape(step, answer)?;
        step.successors()
            .first()
            .copied()
            .ok_or_else(|| unexpected(step, "nothing, the test is over"))
    }
}

impl Render for ElsFlow {
    fn view(&self, step: ElsStep) -> StepView {
        match step {
            ElsStep::Intro => StepView::new(
                "Emotional Load Test",
                "Five quick questions about how much you're carrying right now. \
                 There are no right answers.",
                InputKind::Continue,
            ),
            ElsStep::Result => {
                let result = self.result();
                StepView::new(
                    "Your result",
                    format!(
                        "Score {} ({}), load meter {}% {}. {}",
                        result.total,
                        result.zone,
                        result.percent,
                        result.color,
                        result.zone.summary()
                    ),
                    InputKind::Done,
                )
            }
            question => {
                let id = question.question_id().unwrap_or_default();
                let table = self.scores.sheet().table(id);
                let options: Vec<String> = table
                    .map(|t| t.labels().map(String::from).collect())
                    .unwrap_or_default();
                let input = match table.map(|t| t.selection) {
                    Some(Selection::Multi) => InputKind::MultiChoice { options },
                    _ => InputKind::Choice {
                        options,
                        skippable: true,
                    },
                };
                StepView::new(
                    format!("Question {}", question_number(question)),
                    question.question_text().unwrap_or_default(),
                    input,
                )
            }
        }
    }
}

fn question_number(step: ElsStep) -> usize {
    ElsStep::QUESTIONS
        .iter()
        .position(|q| *q == step)
        .map(|i| i + 1)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::Wizard;

    fn answer_all(wizard: &mut Wizard<ElsFlow>, answers: Vec<Answer>) {
        wizard.submit(Answer::choice("continue")).unwrap();
        for answer in answers {
            wizard.submit(answer).unwrap();
        }
    }

    #[test]
    fn worked_example_is_moderate() {
        let mut wizard = Wizard::<ElsFlow>::default();
        answer_all(
            &mut wizard,
            vec![
                Answer::choice("Rarely"),
                Answer::choice("Often"),
                Answer::choice("Tired"),
                Answer::choice("No"),
                Answer::choices(["Exercise", "Reading"]),
            ],
        );
        assert_eq!(wizard.current(), ElsStep::Result);
        let result = wizard.flow().result();
        assert_eq!(result.total, 11);
        assert_eq!(result.zone, LoadZone::Moderate);
    }

    #[test]
    fn empty_recharge_and_skips_contribute_zero() {
        let mut wizard = Wizard::<ElsFlow>::default();
        answer_all(
            &mut wizard,
            vec![
                Answer::choice("Often"),
                Answer::Skipped,
                Answer::Skipped,
                Answer::choice("Yes"),
                Answer::Choices(Vec::new()),
            ],
        );
        assert_eq!(wizard.flow().total(), 5);
        assert_eq!(wizard.flow().result().zone, LoadZone::Low);
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let mut wizard = Wizard::<ElsFlow>::default();
        wizard.submit(Answer::choice("continue")).unwrap();
        assert!(wizard.submit(Answer::choices(["Often"])).is_err());
        assert!(wizard.submit(Answer::text("often")).is_err());
        assert_eq!(wizard.current(), ElsStep::Drained);
    }

    #[test]
    fn back_and_resubmit_keeps_total_consistent() {
        let mut wizard = Wizard::<ElsFlow>::default();
        answer_all(&mut wizard, vec![Answer::choice("Always"), Answer::choice("Often")]);
        assert_eq!(wizard.flow().total(), 11);

        wizard.back().unwrap();
        wizard.submit(Answer::choice("Rarely")).unwrap();
        assert_eq!(wizard.flow().total(), 7);
        assert_eq!(wizard.flow().total(), wizard.flow().scores().recompute());
    }

    #[test]
    fn edit_rescores() {
        let mut wizard = Wizard::<ElsFlow>::default();
        answer_all(&mut wizard, vec![Answer::choice("Never"), Answer::choice("Rarely")]);
        wizard.edit(ElsStep::Drained, Answer::choice("Always")).unwrap();
        assert_eq!(wizard.flow().total(), 7);
    }

    #[test]
    fn high_load_reaches_red_plus() {
        let mut wizard = Wizard::<ElsFlow>::default();
        answer_all(
            &mut wizard,
            vec![
                Answer::choice("Always"),
                Answer::choice("Often"),
                Answer::choice("Exhausted"),
                Answer::choice("No"),
                Answer::Choices(Vec::new()),
            ],
        );
        let result = wizard.flow().result();
        assert_eq!(result.total, 21);
        assert_eq!(result.zone, LoadZone::High);
        assert_eq!(result.percent, 100);
        assert_eq!(result.color, LoadColor::RedPlus);
    }

    #[test]
    fn sheet_range_matches_tables() {
        let sheet = els_sheet();
        assert_eq!(sheet.min_total(), -8);
        assert_eq!(sheet.max_total(), 21);
    }

    #[test]
    fn every_step_has_a_view() {
        let flow = ElsFlow::default();
        for step in ElsStep::ALL {
            let view = flow.view(*step);
            assert!(!view.title.is_empty(), "{step} has no title");
        }
        let view = flow.view(ElsStep::Recharge);
        assert!(matches!(view.input, InputKind::MultiChoice { .. }));
        assert_eq!(flow.view(ElsStep::Support).title, "Question 4");
    }

    #[test]
    fn display_matches_serde() {
        for step in ElsStep::ALL {
            let json = serde_json::to_string(step).unwrap();
            assert_eq!(format!("\"{step}\""), json);
        }
    }

    #[test]
    fn linear_walk_is_total() {
        let mut current = ElsStep::first();
        let mut seen = 1;
        while let Some(next) = current.successors().first() {
            assert!(current.can_transition_to(*next));
            current = *next;
            seen += 1;
        }
        assert_eq!(current, ElsStep::Result);
        assert_eq!(seen, ElsStep::ALL.len());
    }
}
