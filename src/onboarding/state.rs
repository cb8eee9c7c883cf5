//! Onboarding state machine: tracks which screen the user is on.

use serde::{Deserialize, Serialize};

use crate::wizard::Step;

/// The screens of the onboarding flow.
///
/// Progresses linearly: Welcome → HowItWorks → Privacy → DisplayName →
/// Complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    Welcome,
    HowItWorks,
    Privacy,
    DisplayName,
    Complete,
}

impl OnboardingStep {
    /// Get the next step in the linear progression, if any.
    pub fn following(&self) -> Option<OnboardingStep> {
        self.successors().first().copied()
    }

    /// 1-based position for a progress indicator; `None` once complete.
    pub fn position(&self) -> Option<usize> {
        Self::ALL
            .iter()
            .take_while(|s| !s.is_terminal())
            .position(|s| s == self)
            .map(|i| i + 1)
    }
}

impl Step for OnboardingStep {
    const ALL: &'static [Self] = &[
        Self::Welcome,
        Self::HowItWorks,
        Self::Privacy,
        Self::DisplayName,
        Self::Complete,
    ];

    fn first() -> Self {
        Self::Welcome
    }

    fn successors(&self) -> &'static [Self] {
        use OnboardingStep::*;
        match self {
            Welcome => &[HowItWorks],
            HowItWorks => &[Privacy],
            Privacy => &[DisplayName],
            DisplayName => &[Complete],
            Complete => &[],
        }
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Welcome => "welcome",
            Self::HowItWorks => "how_it_works",
            Self::Privacy => "privacy",
            Self::DisplayName => "display_name",
            Self::Complete => "complete",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transitions() {
        use OnboardingStep::*;
        let transitions = [
            (Welcome, HowItWorks),
            (HowItWorks, Privacy),
            (Privacy, DisplayName),
            (DisplayName, Complete),
        ];
        for (from, to) in transitions {
            assert!(
                from.can_transition_to(to),
                "{from} should transition to {to}"
            );
        }
    }

    #[test]
    fn invalid_transitions() {
        use OnboardingStep::*;
        // Skip steps
        assert!(!Welcome.can_transition_to(Privacy));
        assert!(!HowItWorks.can_transition_to(Complete));
        // Go backward
        assert!(!Privacy.can_transition_to(HowItWorks));
        // Terminal
        assert!(!Complete.can_transition_to(Welcome));
        // Self-transition
        assert!(!DisplayName.can_transition_to(DisplayName));
    }

    #[test]
    fn is_terminal() {
        use OnboardingStep::*;
        assert!(Complete.is_terminal());
        assert!(!Welcome.is_terminal());
        assert!(!DisplayName.is_terminal());
    }

    #[test]
    fn following_walks_all_steps() {
        use OnboardingStep::*;
        let expected = [HowItWorks, Privacy, DisplayName, Complete];
        let mut current = OnboardingStep::first();
        for expected_next in expected {
            let next = current.following().unwrap();
            assert_eq!(next, expected_next);
            current = next;
        }
        assert!(current.following().is_none());
    }

    #[test]
    fn positions() {
        assert_eq!(OnboardingStep::Welcome.position(), Some(1));
        assert_eq!(OnboardingStep::DisplayName.position(), Some(4));
        assert_eq!(OnboardingStep::Complete.position(), None);
    }

    #[test]
    fn display_matches_serde() {
        for step in OnboardingStep::ALL {
            let display = format!("{step}");
            let json = serde_json::to_string(step).unwrap();
            // JSON wraps in quotes
            assert_eq!(
                format!("\"{display}\""),
                json,
                "Display and serde should match for {step:?}"
            );
        }
    }
}
