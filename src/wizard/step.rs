//! The step and flow abstractions every wizard is built from.

use std::fmt::{Debug, Display};

use crate::error::{FlowError, Result};

use super::answer::Answer;

/// A named stage within a flow.
///
/// Implementors are plain fieldless enums. `successors` declares the
/// transition graph; a step may list itself when an answer keeps the user in
/// place (e.g. regenerating a message preview).
pub trait Step: Copy + Eq + Ord + Debug + Display + 'static {
    /// Every step of the flow, in display order.
    const ALL: &'static [Self];

    /// Where a fresh flow starts.
    fn first() -> Self;

    /// Steps reachable from `self` in one transition.
    fn successors(&self) -> &'static [Self];

    /// Whether the flow is finished once it reaches this step.
    fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }

    /// Check if a transition from `self` to `target` is valid.
    fn can_transition_to(&self, target: Self) -> bool {
        self.successors().contains(&target)
    }
}

/// A flow's payload and transition rules.
///
/// `apply` validates an answer and folds it into the flow's state; `next`
/// picks the successor. Both must be total over the step set: an answer of
/// the wrong shape is an error, never a dead end.
pub trait Flow {
    type Step: Step;

    /// Flow name used in logs and errors.
    const NAME: &'static str;

    /// Validate `answer` for `step` and update the flow's state.
    fn apply(&mut self, step: Self::Step, answer: &Answer) -> Result<()>;

    /// The step that follows `step` given `answer`.
    fn next(&self, step: Self::Step, answer: &Answer) -> Result<Self::Step>;
}

/// Shorthand for rejecting an answer of the wrong shape.
pub(crate) fn unexpected<S: Display>(step: S, expected: &'static str) -> crate::error::Error {
    FlowError::UnexpectedAnswer {
        step: step.to_string(),
        expected,
    }
    .into()
}

/// Shorthand for rejecting a label that isn't one of the step's options.
pub(crate) fn unknown_option<S: Display>(step: S, option: &str) -> crate::error::Error {
    FlowError::UnknownOption {
        step: step.to_string(),
        option: option.to_string(),
    }
    .into()
}
