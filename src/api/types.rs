//! Request and response bodies of the reflection backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::composer::Intent;
use crate::reflection::model::{DeliveryMethod, SenderMode, TemplateStyle};

/// Ask the backend to send a one-time code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRequest {
    pub contact: String,
    /// `"email"` or `"sms"`.
    pub channel: String,
}

/// Exchange a one-time code for a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpVerifyRequest {
    pub contact: String,
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtpVerifyResponse {
    pub token: String,
    /// Name the backend already knows for this user, if any.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A finished reflection, as sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionSubmission {
    pub id: uuid::Uuid,
    pub intent: Intent,
    pub recipient_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    pub description: String,
    pub message: String,
    pub template: TemplateStyle,
    pub delivery: DeliveryMethod,
    pub sender_mode: SenderMode,
    /// Present only for named sends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub id: String,
    /// Link to share with the recipient, for link deliveries.
    #[serde(default)]
    pub share_url: Option<String>,
}

/// One entry of the user's reflection history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionSummary {
    pub id: String,
    #[serde(default)]
    pub intent: Option<Intent>,
    pub recipient_name: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
}

/// History comes back either bare or wrapped in `{"reflections": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum HistoryResponse {
    Wrapped { reflections: Vec<ReflectionSummary> },
    Bare(Vec<ReflectionSummary>),
}

impl HistoryResponse {
    pub(crate) fn into_vec(self) -> Vec<ReflectionSummary> {
        match self {
            Self::Wrapped { reflections } => reflections,
            Self::Bare(reflections) => reflections,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteRequest {
    pub reflection_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteResponse {
    pub invite_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_accepts_both_shapes() {
        let bare = r#"[{"id": "r1", "recipient_name": "Sam"}]"#;
        let wrapped = r#"{"reflections": [{"id": "r1", "recipient_name": "Sam", "intent": "apology"}]}"#;

        let a: HistoryResponse = serde_json::from_str(bare).unwrap();
        let b: HistoryResponse = serde_json::from_str(wrapped).unwrap();
        assert_eq!(a.into_vec()[0].id, "r1");
        let b = b.into_vec();
        assert_eq!(b[0].intent, Some(Intent::Apology));
        assert!(b[0].message.is_empty());
    }

    #[test]
    fn verify_response_optional_name() {
        let resp: OtpVerifyResponse = serde_json::from_str(r#"{"token": "t"}"#).unwrap();
        assert_eq!(resp.token, "t");
        assert!(resp.display_name.is_none());
    }
}
