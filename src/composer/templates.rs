//! Phrasing templates, two or three per intent.
//!
//! Each template is a pure interpolation over [`MessageInput`]. A blank
//! relationship falls back to wording that doesn't mention one.

use super::MessageInput;
use super::intent::Intent;

/// Renders a message from validated input.
pub type Template = fn(&MessageInput) -> String;

const APOLOGY: &[Template] = &[apology_direct, apology_reflective, apology_brief];
const GRATITUDE: &[Template] = &[gratitude_warm, gratitude_specific, gratitude_brief];
const BOUNDARY: &[Template] = &[boundary_caring, boundary_clear];

/// The ordered phrasings for an intent. Never empty.
pub fn templates_for(intent: Intent) -> &'static [Template] {
    match intent {
        Intent::Apology => APOLOGY,
        Intent::Gratitude => GRATITUDE,
        Intent::Boundary => BOUNDARY,
    }
}

fn apology_direct(input: &MessageInput) -> String {
    let relation = match input.relationship() {
        Some(rel) => format!("You matter so much to me as my {rel}, and "),
        None => "You matter to me, and ".to_string(),
    };
    format!(
        "Dear {},\n\nI've been thinking about {}. {}I'm truly sorry. \
         I want to do better, and I hope we can talk.",
        input.recipient,
        sentence_fragment(&input.text),
        relation,
    )
}

fn apology_reflective(input: &MessageInput) -> String {
    let relation = match input.relationship() {
        Some(rel) => format!("you as my {rel}"),
        None => "what we have".to_string(),
    };
    format!(
        "Hi {},\n\nI've taken some time to reflect on {}. I understand now how it \
         affected you, and I'm sorry. I value {} too much to let this go unsaid.",
        input.recipient,
        sentence_fragment(&input.text),
        relation,
    )
}

fn apology_brief(input: &MessageInput) -> String {
    format!(
        "{}, I'm sorry about {}. You deserved better from me.",
        input.recipient,
        sentence_fragment(&input.text),
    )
}

fn gratitude_warm(input: &MessageInput) -> String {
    let relation = match input.relationship() {
        Some(rel) => format!("I'm so lucky to have you as my {rel}."),
        None => "I'm so lucky to have you in my life.".to_string(),
    };
    format!(
        "Dear {},\n\nI wanted to take a moment to thank you for {}. {}",
        input.recipient,
        sentence_fragment(&input.text),
        relation,
    )
}

fn gratitude_specific(input: &MessageInput) -> String {
    let relation = match input.relationship() {
        Some(rel) => format!(" as my {rel}"),
        None => String::new(),
    };
    format!(
        "Hi {},\n\nI keep coming back to {}. It meant more than you know. \
         Thank you for everything you do{}.",
        input.recipient,
        sentence_fragment(&input.text),
        relation,
    )
}

fn gratitude_brief(input: &MessageInput) -> String {
    format!(
        "{}, thank you for {}. It made a real difference.",
        input.recipient,
        sentence_fragment(&input.text),
    )
}

fn boundary_caring(input: &MessageInput) -> String {
    let relation = match input.relationship() {
        Some(rel) => format!("I care about you as my {rel}, and"),
        None => "I care about you, and".to_string(),
    };
    format!(
        "Dear {},\n\n{} I want to be honest about something: {}. \
         Setting this boundary helps me show up better for both of us.",
        input.recipient,
        relation,
        sentence_fragment(&input.text),
    )
}

fn boundary_clear(input: &MessageInput) -> String {
    let relation = match input.relationship() {
        Some(rel) => format!("keep things healthy with you as my {rel}"),
        None => "keep things healthy between us".to_string(),
    };
    format!(
        "Hi {},\n\nI need to share something important to me: {}. \
         I'm telling you because I want to {}. Thank you for hearing me.",
        input.recipient,
        sentence_fragment(&input.text),
        relation,
    )
}

/// Trim and drop terminal punctuation so the text can sit mid-sentence.
fn sentence_fragment(text: &str) -> &str {
    text.trim().trim_end_matches(['.', '!', '?'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(relationship: &str) -> MessageInput {
        MessageInput::new("Sam", relationship, "missing your birthday dinner.")
    }

    #[test]
    fn every_intent_has_two_or_three_templates() {
        for intent in Intent::ALL {
            let n = templates_for(intent).len();
            assert!((2..=3).contains(&n), "{intent} has {n} templates");
        }
    }

    #[test]
    fn templates_interpolate_fields() {
        for intent in Intent::ALL {
            for template in templates_for(intent) {
                let text = template(&input("brother"));
                assert!(text.contains("Sam"), "{text}");
                assert!(text.contains("missing your birthday dinner"), "{text}");
                assert!(!text.contains("dinner.."), "{text}");
            }
        }
    }

    #[test]
    fn blank_relationship_falls_back() {
        for intent in Intent::ALL {
            for template in templates_for(intent) {
                let text = template(&input("   "));
                assert!(!text.contains("as my"), "{text}");
                assert!(!text.contains("  "), "{text}");
            }
        }
    }

    #[test]
    fn relationship_is_mentioned_when_given() {
        let text = apology_direct(&input("brother"));
        assert!(text.contains("as my brother"));
    }

    #[test]
    fn relationship_reads_naturally_in_every_template() {
        for intent in Intent::ALL {
            for template in templates_for(intent) {
                let text = template(&input("sister"));
                if text.contains("sister") {
                    assert!(text.contains("as my sister"), "{text}");
                }
                assert!(!text.contains("relationship as"), "{text}");
                assert!(!text.contains("us as"), "{text}");
            }
        }
    }
}
