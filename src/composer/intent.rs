//! Message intents.

use serde::{Deserialize, Serialize};

/// The purpose of a reflection message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Apology,
    Gratitude,
    Boundary,
}

impl Intent {
    pub const ALL: [Intent; 3] = [Self::Apology, Self::Gratitude, Self::Boundary];

    /// Label shown on the intent picker.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Apology => "Say sorry",
            Self::Gratitude => "Say thank you",
            Self::Boundary => "Set a boundary",
        }
    }

    /// Question asked on the conversation step.
    pub fn conversation_prompt(&self) -> &'static str {
        match self {
            Self::Apology => "What happened, and what do you wish you had done differently?",
            Self::Gratitude => "What did they do that you're grateful for?",
            Self::Boundary => "What do you need to change, and why does it matter to you?",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Apology => write!(f, "apology"),
            Self::Gratitude => write!(f, "gratitude"),
            Self::Boundary => write!(f, "boundary"),
        }
    }
}

impl std::str::FromStr for Intent {
    type Err = String;

    /// Accepts the snake_case name or the picker label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|i| i.to_string().eq_ignore_ascii_case(s) || i.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown intent: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_and_label() {
        assert_eq!("apology".parse::<Intent>().unwrap(), Intent::Apology);
        assert_eq!("Say thank you".parse::<Intent>().unwrap(), Intent::Gratitude);
        assert_eq!(" BOUNDARY ".parse::<Intent>().unwrap(), Intent::Boundary);
        assert!("rant".parse::<Intent>().is_err());
    }

    #[test]
    fn display_matches_serde() {
        for intent in Intent::ALL {
            let json = serde_json::to_string(&intent).unwrap();
            assert_eq!(format!("\"{intent}\""), json);
        }
    }
}
