//! Wizard: the single cursor over a flow's steps.

use std::collections::BTreeMap;

use crate::error::{FlowError, Result};

use super::answer::Answer;
use super::step::{Flow, Step};

/// Drives one flow: tracks the current step, the path taken, and the answer
/// recorded for each visited step.
#[derive(Debug, Clone)]
pub struct Wizard<F: Flow> {
    flow: F,
    current: F::Step,
    history: Vec<F::Step>,
    answers: BTreeMap<F::Step, Answer>,
}

impl<F: Flow + Default> Default for Wizard<F> {
    fn default() -> Self {
        Self::new(F::default())
    }
}

impl<F: Flow> Wizard<F> {
    pub fn new(flow: F) -> Self {
        Self {
            flow,
            current: F::Step::first(),
            history: Vec::new(),
            answers: BTreeMap::new(),
        }
    }

    pub fn current(&self) -> F::Step {
        self.current
    }

    pub fn flow(&self) -> &F {
        &self.flow
    }

    pub(crate) fn flow_mut(&mut self) -> &mut F {
        &mut self.flow
    }

    pub fn is_finished(&self) -> bool {
        self.current.is_terminal()
    }

    /// The answer recorded for `step`, if any.
    pub fn answer(&self, step: F::Step) -> Option<&Answer> {
        self.answers.get(&step)
    }

    pub fn answers(&self) -> &BTreeMap<F::Step, Answer> {
        &self.answers
    }

    /// Steps visited before the current one, oldest first.
    pub fn history(&self) -> &[F::Step] {
        &self.history
    }

    /// Submit an answer for the current step and advance.
    ///
    /// The answer replaces any earlier answer for the same step. Returns the
    /// new current step.
    pub fn submit(&mut self, answer: Answer) -> Result<F::Step> {
        let from = self.current;
        if from.is_terminal() {
            return Err(FlowError::Finished {
                flow: F::NAME.to_string(),
            }
            .into());
        }

        let to = self.flow.next(from, &answer)?;
        if !from.can_transition_to(to) {
            return Err(FlowError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            }
            .into());
        }
        self.flow.apply(from, &answer)?;
        self.answers.insert(from, answer);

        if to != from {
            self.history.push(from);
            self.current = to;
        }
        tracing::debug!(flow = F::NAME, %from, %to, "wizard advanced");
        Ok(to)
    }

    /// Step back to the previous step. Answers are kept so they can be
    /// revised by submitting again.
    pub fn back(&mut self) -> Result<F::Step> {
        let previous = self.history.pop().ok_or(FlowError::AtStart)?;
        tracing::debug!(flow = F::NAME, from = %self.current, to = %previous, "wizard went back");
        self.current = previous;
        Ok(previous)
    }

    /// Replace the answer of an already-answered step without moving.
    ///
    /// Rejected when the new answer would send the flow down a different
    /// branch; use [`Wizard::back`] for that. Finished flows can't be edited.
    pub fn edit(&mut self, step: F::Step, answer: Answer) -> Result<()> {
        if self.current.is_terminal() {
            return Err(FlowError::Finished {
                flow: F::NAME.to_string(),
            }
            .into());
        }
        let old = self.answers.get(&step).ok_or_else(|| FlowError::NotAnswered {
            step: step.to_string(),
        })?;

        let old_next = self.flow.next(step, old)?;
        let new_next = self.flow.next(step, &answer)?;
        if old_next != new_next {
            return Err(FlowError::InvalidTransition {
                from: step.to_string(),
                to: new_next.to_string(),
            }
            .into());
        }

        self.flow.apply(step, &answer)?;
        self.answers.insert(step, answer);
        tracing::debug!(flow = F::NAME, %step, "wizard answer edited");
        Ok(())
    }
}

impl<F: Flow + Default> Wizard<F> {
    /// Throw away all progress and start over.
    pub fn restart(&mut self) {
        *self = Self::default();
        tracing::debug!(flow = F::NAME, "wizard restarted");
    }
}
