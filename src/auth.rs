//! Sign-in with a one-time code sent by email or SMS.
//!
//! The wizard only advances once the backend has accepted the step: a
//! contact moves on after the code was sent, a code after it verified. A
//! failed call leaves the user on the same screen to retry.

use serde::{Deserialize, Serialize};

use crate::api::{OtpRequest, OtpVerifyRequest, ReflectionBackend};
use crate::error::{FlowError, Result};
use crate::render::{InputKind, Render, StepView};
use crate::session::Session;
use crate::validation::{Contact, validate_otp_code};
use crate::wizard::step::{unexpected, unknown_option};
use crate::wizard::{Answer, Flow, Step, Wizard};

pub const RESEND: &str = "Resend code";
pub const CHANGE_CONTACT: &str = "Change contact";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStep {
    ContactEntry,
    CodeEntry,
    Verified,
}

impl Step for AuthStep {
    const ALL: &'static [Self] = &[Self::ContactEntry, Self::CodeEntry, Self::Verified];

    fn first() -> Self {
        Self::ContactEntry
    }

    fn successors(&self) -> &'static [Self] {
        use AuthStep::*;
        match self {
            ContactEntry => &[CodeEntry],
            CodeEntry => &[CodeEntry, ContactEntry, Verified],
            Verified => &[],
        }
    }
}

impl std::fmt::Display for AuthStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContactEntry => write!(f, "contact_entry"),
            Self::CodeEntry => write!(f, "code_entry"),
            Self::Verified => write!(f, "verified"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuthFlow {
    contact: Option<Contact>,
}

impl AuthFlow {
    /// Where the code was sent. Kept after "change contact" to prefill the
    /// contact screen.
    pub fn contact(&self) -> Option<&Contact> {
        self.contact.as_ref()
    }
}

impl Flow for AuthFlow {
    type Step = AuthStep;
    const NAME: &'static str = "auth";

    fn apply(&mut self, step: AuthStep, answer: &Answer) -> Result<()> {
        if step == AuthStep::ContactEntry {
            let raw = answer
                .as_text()
                .ok_or_else(|| unexpected(step, "an email address or phone number"))?;
            self.contact = Some(Contact::parse(raw)?);
        }
        Ok(())
    }

    fn next(&self, step: AuthStep, answer: &Answer) -> Result<AuthStep> {
        match (step, answer) {
            (AuthStep::ContactEntry, Answer::Text(raw)) => {
                Contact::parse(raw)?;
                Ok(AuthStep::CodeEntry)
            }
            (AuthStep::ContactEntry, _) => {
                Err(unexpected(step, "an email address or phone number"))
            }
            (AuthStep::CodeEntry, Answer::Choice(label)) if label == RESEND => {
                Ok(AuthStep::CodeEntry)
            }
            (AuthStep::CodeEntry, Answer::Choice(label)) if label == CHANGE_CONTACT => {
                Ok(AuthStep::ContactEntry)
            }
            (AuthStep::CodeEntry, Answer::Choice(label)) => Err(unknown_option(step, label)),
            (AuthStep::CodeEntry, Answer::Text(raw)) => {
                validate_otp_code(raw)?;
                Ok(AuthStep::Verified)
            }
            (AuthStep::CodeEntry, _) => Err(unexpected(step, "a code or an action")),
            (AuthStep::Verified, _) => Err(FlowError::Finished {
                flow: Self::NAME.to_string(),
            }
            .into()),
        }
    }
}

impl Render for AuthFlow {
    fn view(&self, step: AuthStep) -> StepView {
        match step {
            AuthStep::ContactEntry => StepView::new(
                "Sign in",
                "Enter your email address or phone number and we'll send you a code.",
                InputKind::Text { optional: false },
            ),
            AuthStep::CodeEntry => StepView::new(
                "Check your messages",
                match &self.contact {
                    Some(contact) => format!("Enter the 6-digit code we sent to {contact}."),
                    None => "Enter the 6-digit code we sent you.".to_string(),
                },
                InputKind::ChoiceOrText {
                    options: vec![RESEND.to_string(), CHANGE_CONTACT.to_string()],
                },
            ),
            AuthStep::Verified => StepView::new("Signed in", "You're signed in.", InputKind::Done),
        }
    }
}

fn ensure_at(wizard: &Wizard<AuthFlow>, step: AuthStep, target: AuthStep) -> Result<()> {
    if wizard.current() != step {
        return Err(FlowError::InvalidTransition {
            from: wizard.current().to_string(),
            to: target.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Validate the contact, ask the backend to send a code, then move to code
/// entry.
pub async fn request_code(
    wizard: &mut Wizard<AuthFlow>,
    backend: &dyn ReflectionBackend,
    session: &Session,
    raw_contact: &str,
) -> Result<Contact> {
    ensure_at(wizard, AuthStep::ContactEntry, AuthStep::CodeEntry)?;
    let contact = Contact::parse(raw_contact)?;

    let request = OtpRequest {
        contact: contact.as_str().to_string(),
        channel: contact.channel().to_string(),
    };
    if let Err(e) = backend.request_otp(session, &request).await {
        tracing::warn!(channel = contact.channel(), error = %e, "code request failed");
        return Err(e.into());
    }
    tracing::info!(channel = contact.channel(), "code requested");

    wizard.submit(Answer::text(contact.as_str()))?;
    Ok(contact)
}

/// Send a fresh code to the same contact.
pub async fn resend(
    wizard: &mut Wizard<AuthFlow>,
    backend: &dyn ReflectionBackend,
    session: &Session,
) -> Result<()> {
    ensure_at(wizard, AuthStep::CodeEntry, AuthStep::CodeEntry)?;
    let contact = wizard.flow().contact().cloned().ok_or_else(|| FlowError::NotAnswered {
        step: AuthStep::ContactEntry.to_string(),
    })?;

    let request = OtpRequest {
        contact: contact.as_str().to_string(),
        channel: contact.channel().to_string(),
    };
    backend.request_otp(session, &request).await?;
    tracing::info!(channel = contact.channel(), "code resent");

    wizard.submit(Answer::choice(RESEND))?;
    Ok(())
}

/// Check the code with the backend and store the returned token in the
/// session's cookie jar.
///
/// A name the backend already knows is adopted only if the session has none.
pub async fn verify_code(
    wizard: &mut Wizard<AuthFlow>,
    backend: &dyn ReflectionBackend,
    session: &mut Session,
    raw_code: &str,
) -> Result<()> {
    ensure_at(wizard, AuthStep::CodeEntry, AuthStep::Verified)?;
    let code = validate_otp_code(raw_code)?;
    let contact = wizard.flow().contact().cloned().ok_or_else(|| FlowError::NotAnswered {
        step: AuthStep::ContactEntry.to_string(),
    })?;

    let request = OtpVerifyRequest {
        contact: contact.as_str().to_string(),
        code: code.clone(),
    };
    let response = match backend.verify_otp(session, &request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(channel = contact.channel(), error = %e, "code verification failed");
            return Err(e.into());
        }
    };

    session.set_auth_token(&response.token);
    if session.display_name().is_none() {
        if let Some(name) = response.display_name.as_deref() {
            session.set_display_name(name);
        }
    }
    tracing::info!(session = %session.id, "signed in");

    wizard.submit(Answer::text(code))?;
    Ok(())
}

/// Route one raw reply to the right action for the current step. At code
/// entry a six-digit reply is always a code, even "000001".
pub async fn respond(
    wizard: &mut Wizard<AuthFlow>,
    backend: &dyn ReflectionBackend,
    session: &mut Session,
    raw: &str,
) -> Result<AuthStep> {
    match wizard.current() {
        AuthStep::ContactEntry => {
            request_code(wizard, backend, session, raw).await?;
        }
        AuthStep::CodeEntry if validate_otp_code(raw).is_ok() => {
            verify_code(wizard, backend, session, raw).await?;
        }
        AuthStep::CodeEntry => {
            let input = wizard.flow().view(AuthStep::CodeEntry).input;
            match input.parse(raw) {
                Answer::Choice(label) if label == RESEND => resend(wizard, backend, session).await?,
                Answer::Choice(label) => {
                    wizard.submit(Answer::Choice(label))?;
                }
                _ => verify_code(wizard, backend, session, raw).await?,
            }
        }
        AuthStep::Verified => {
            return Err(FlowError::Finished {
                flow: AuthFlow::NAME.to_string(),
            }
            .into());
        }
    }
    Ok(wizard.current())
}
