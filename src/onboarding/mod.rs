//! Onboarding: first-launch introduction that ends by asking for a
//! display name.
//!
//! The name is held in the flow until [`OnboardingFlow::commit`] writes it
//! to the session.

pub mod state;

pub use state::OnboardingStep;

use crate::error::Result;
use crate::render::{InputKind, Render, StepView};
use crate::session::Session;
use crate::wizard::step::unexpected;
use crate::wizard::{Answer, Flow};

/// Longest display name kept; longer input is truncated.
pub const MAX_DISPLAY_NAME_CHARS: usize = 40;

#[derive(Debug, Clone, Default)]
pub struct OnboardingFlow {
    display_name: Option<String>,
}

impl OnboardingFlow {
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Write the chosen name to the session.
    pub fn commit(&self, session: &mut Session) {
        if let Some(name) = &self.display_name {
            session.set_display_name(name);
            tracing::info!(session = %session.id, "display name saved");
        }
    }
}

impl Flow for OnboardingFlow {
    type Step = OnboardingStep;
    const NAME: &'static str = "onboarding";

    fn apply(&mut self, step: OnboardingStep, answer: &Answer) -> Result<()> {
        if step == OnboardingStep::DisplayName {
            self.display_name = match answer {
                Answer::Text(name) if !name.trim().is_empty() => {
                    Some(name.trim().chars().take(MAX_DISPLAY_NAME_CHARS).collect())
                }
                Answer::Text(_) | Answer::Skipped => None,
                _ => return Err(unexpected(step, "text or a skip")),
            };
        }
        Ok(())
    }

    fn next(&self, step: OnboardingStep, answer: &Answer) -> Result<OnboardingStep> {
        if step == OnboardingStep::DisplayName
            && !matches!(answer, Answer::Text(_) | Answer::Skipped)
        {
            return Err(unexpected(step, "text or a skip"));
        }
        step.following()
            .ok_or_else(|| unexpected(step, "nothing, onboarding is complete"))
    }
}

impl Render for OnboardingFlow {
    fn view(&self, step: OnboardingStep) -> StepView {
        match step {
            OnboardingStep::Welcome => StepView::new(
                "Welcome",
                "Some things are hard to say. This helps you find the words.",
                InputKind::Continue,
            ),
            OnboardingStep::HowItWorks => StepView::new(
                "How it works",
                "Choose what you want to say, tell us a little about it, and we'll \
                 help shape it into a message you can send or keep.",
                InputKind::Continue,
            ),
            OnboardingStep::Privacy => StepView::new(
                "Your words stay yours",
                "Nothing is sent until you confirm, and you can always save a \
                 reflection privately instead.",
                InputKind::Continue,
            ),
            OnboardingStep::DisplayName => StepView::new(
                "What should we call you?",
                "This name appears on messages you sign (optional).",
                InputKind::Text { optional: true },
            ),
            OnboardingStep::Complete => StepView::new(
                "All set",
                match &self.display_name {
                    Some(name) => format!("Nice to meet you, {name}."),
                    None => "You're ready to go.".to_string(),
                },
                InputKind::Done,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::CONTINUE;
    use crate::wizard::Wizard;

    fn to_name_step() -> Wizard<OnboardingFlow> {
        let mut wizard = Wizard::<OnboardingFlow>::default();
        for _ in 0..3 {
            wizard.submit(Answer::choice(CONTINUE)).unwrap();
        }
        assert_eq!(wizard.current(), OnboardingStep::DisplayName);
        wizard
    }

    #[test]
    fn name_is_committed_to_session() {
        let mut wizard = to_name_step();
        wizard.submit(Answer::text("  Ada Lovelace ")).unwrap();
        assert!(wizard.is_finished());

        let mut session = Session::default();
        wizard.flow().commit(&mut session);
        assert_eq!(session.display_name(), Some("Ada Lovelace"));
    }

    #[test]
    fn skipping_name_leaves_session_alone() {
        let mut wizard = to_name_step();
        wizard.submit(Answer::Skipped).unwrap();

        let mut session = Session::default();
        session.set_display_name("Existing");
        wizard.flow().commit(&mut session);
        assert_eq!(session.display_name(), Some("Existing"));
    }

    #[test]
    fn long_names_are_truncated() {
        let mut wizard = to_name_step();
        wizard.submit(Answer::text("x".repeat(100))).unwrap();
        assert_eq!(
            wizard.flow().display_name().unwrap().chars().count(),
            MAX_DISPLAY_NAME_CHARS
        );
    }

    #[test]
    fn name_step_rejects_choices() {
        let mut wizard = to_name_step();
        assert!(wizard.submit(Answer::choice("Ada")).is_err());
        assert_eq!(wizard.current(), OnboardingStep::DisplayName);
    }

    #[test]
    fn completion_view_greets_by_name() {
        let mut wizard = to_name_step();
        wizard.submit(Answer::text("Ada")).unwrap();
        let view = wizard.flow().view(wizard.current());
        assert_eq!(view.input, InputKind::Done);
        assert!(view.prompt.contains("Ada"));
    }
}
