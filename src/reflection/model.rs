//! Reflection draft and the choices made while composing it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::ReflectionSubmission;
use crate::composer::{Intent, MessageInput};
use crate::error::{FlowError, Result};
use crate::session::Session;

/// Visual card the message is rendered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateStyle {
    Classic,
    Soft,
    Bold,
    Handwritten,
}

impl TemplateStyle {
    pub const ALL: [TemplateStyle; 4] = [Self::Classic, Self::Soft, Self::Bold, Self::Handwritten];
}

impl Default for TemplateStyle {
    fn default() -> Self {
        Self::Classic
    }
}

impl std::fmt::Display for TemplateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Classic => write!(f, "classic"),
            Self::Soft => write!(f, "soft"),
            Self::Bold => write!(f, "bold"),
            Self::Handwritten => write!(f, "handwritten"),
        }
    }
}

impl std::str::FromStr for TemplateStyle {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(Self::Classic),
            "soft" => Ok(Self::Soft),
            "bold" => Ok(Self::Bold),
            "handwritten" => Ok(Self::Handwritten),
            _ => Err(format!("Unknown template: {s}")),
        }
    }
}

/// How the finished reflection reaches the recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    /// A shareable link the user sends themselves.
    Link,
    Email,
    Sms,
    /// Kept in the user's history, never delivered.
    SavePrivately,
}

impl DeliveryMethod {
    pub const ALL: [DeliveryMethod; 4] = [Self::Link, Self::Email, Self::Sms, Self::SavePrivately];

    pub fn is_private(&self) -> bool {
        matches!(self, Self::SavePrivately)
    }
}

impl std::fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Link => write!(f, "link"),
            Self::Email => write!(f, "email"),
            Self::Sms => write!(f, "sms"),
            Self::SavePrivately => write!(f, "save_privately"),
        }
    }
}

impl std::str::FromStr for DeliveryMethod {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(' ', "_").as_str() {
            "link" => Ok(Self::Link),
            "email" => Ok(Self::Email),
            "sms" => Ok(Self::Sms),
            "save_privately" | "save" | "private" => Ok(Self::SavePrivately),
            _ => Err(format!("Unknown delivery method: {s}")),
        }
    }
}

/// Whether the recipient sees who sent the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderMode {
    Named,
    Anonymous,
}

impl SenderMode {
    pub const ALL: [SenderMode; 2] = [Self::Named, Self::Anonymous];
}

impl Default for SenderMode {
    fn default() -> Self {
        Self::Named
    }
}

impl std::fmt::Display for SenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named => write!(f, "named"),
            Self::Anonymous => write!(f, "anonymous"),
        }
    }
}

impl std::str::FromStr for SenderMode {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "named" => Ok(Self::Named),
            "anonymous" => Ok(Self::Anonymous),
            _ => Err(format!("Unknown sender mode: {s}")),
        }
    }
}

/// Everything collected by the reflection wizard.
///
/// Lives only as long as the wizard; nothing is kept unless submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionDraft {
    pub id: Uuid,
    pub intent: Option<Intent>,
    pub recipient_name: String,
    pub relationship: Option<String>,
    /// The user's own words from the conversation step.
    pub description: String,
    /// Composed (or hand-edited) message.
    pub message: String,
    pub template: Option<TemplateStyle>,
    pub delivery: Option<DeliveryMethod>,
    pub sender_mode: SenderMode,
    pub created_at: DateTime<Utc>,
}

impl Default for ReflectionDraft {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            intent: None,
            recipient_name: String::new(),
            relationship: None,
            description: String::new(),
            message: String::new(),
            template: None,
            delivery: None,
            sender_mode: SenderMode::default(),
            created_at: Utc::now(),
        }
    }
}

impl ReflectionDraft {
    /// Composer input built from the draft's fields.
    pub fn message_input(&self) -> MessageInput {
        MessageInput::new(
            &self.recipient_name,
            self.relationship.clone().unwrap_or_default(),
            &self.description,
        )
    }

    /// Build the backend payload. Fails if a required choice is missing.
    pub fn to_submission(&self, session: &Session) -> Result<ReflectionSubmission> {
        let intent = self.intent.ok_or_else(|| not_answered("intent_selection"))?;
        let template = self.template.ok_or_else(|| not_answered("template_selection"))?;
        let delivery = self.delivery.ok_or_else(|| not_answered("delivery_selection"))?;
        if self.message.trim().is_empty() {
            return Err(not_answered("message_preview"));
        }

        let sender_name = match self.sender_mode {
            SenderMode::Named if !delivery.is_private() => {
                session.display_name().map(String::from)
            }
            _ => None,
        };

        Ok(ReflectionSubmission {
            id: self.id,
            intent,
            recipient_name: self.recipient_name.clone(),
            relationship: self.relationship.clone(),
            description: self.description.clone(),
            message: self.message.clone(),
            template,
            delivery,
            sender_mode: self.sender_mode,
            sender_name,
            created_at: self.created_at,
        })
    }
}

fn not_answered(step: &str) -> crate::error::Error {
    FlowError::NotAnswered {
        step: step.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> ReflectionDraft {
        ReflectionDraft {
            intent: Some(Intent::Gratitude),
            recipient_name: "Jo".into(),
            relationship: Some("mentor".into()),
            description: "believing in me".into(),
            message: "Thank you, Jo.".into(),
            template: Some(TemplateStyle::Soft),
            delivery: Some(DeliveryMethod::Email),
            ..Default::default()
        }
    }

    #[test]
    fn named_submission_carries_display_name() {
        let mut session = Session::default();
        session.set_display_name("Ada");
        let sub = complete_draft().to_submission(&session).unwrap();
        assert_eq!(sub.sender_name.as_deref(), Some("Ada"));
        assert_eq!(sub.template, TemplateStyle::Soft);
    }

    #[test]
    fn anonymous_and_private_hide_name() {
        let mut session = Session::default();
        session.set_display_name("Ada");

        let mut draft = complete_draft();
        draft.sender_mode = SenderMode::Anonymous;
        assert!(draft.to_submission(&session).unwrap().sender_name.is_none());

        let mut draft = complete_draft();
        draft.delivery = Some(DeliveryMethod::SavePrivately);
        assert!(draft.to_submission(&session).unwrap().sender_name.is_none());
    }

    #[test]
    fn missing_choices_are_reported() {
        let session = Session::default();
        let mut draft = complete_draft();
        draft.template = None;
        let err = draft.to_submission(&session).unwrap_err();
        assert!(err.to_string().contains("template_selection"));

        let mut draft = complete_draft();
        draft.message = " ".into();
        assert!(draft.to_submission(&session).is_err());
    }

    #[test]
    fn enums_parse_their_display() {
        for t in TemplateStyle::ALL {
            assert_eq!(t.to_string().parse::<TemplateStyle>().unwrap(), t);
            assert_eq!(serde_json::to_string(&t).unwrap(), format!("\"{t}\""));
        }
        for d in DeliveryMethod::ALL {
            assert_eq!(d.to_string().parse::<DeliveryMethod>().unwrap(), d);
            assert_eq!(serde_json::to_string(&d).unwrap(), format!("\"{d}\""));
        }
        for m in SenderMode::ALL {
            assert_eq!(m.to_string().parse::<SenderMode>().unwrap(), m);
        }
        assert_eq!("Save privately".parse::<DeliveryMethod>().unwrap(), DeliveryMethod::SavePrivately);
    }
}
