//! Reflection wizard: compose a message, then send it or save it privately.

pub mod flow;
pub mod model;

pub use flow::{ACCEPT, CONFIRM, REGENERATE, ReflectionFlow, ReflectionStep};
pub use model::{DeliveryMethod, ReflectionDraft, SenderMode, TemplateStyle};

use crate::api::{ReflectionBackend, SubmitReceipt};
use crate::error::{FlowError, Result};
use crate::session::Session;
use crate::wizard::{Answer, Wizard};

/// Submit the draft and, on success, finish the wizard.
///
/// Must be called on the confirmation step. On failure the wizard stays
/// where it is so the user can retry.
pub async fn confirm(
    wizard: &mut Wizard<ReflectionFlow>,
    backend: &dyn ReflectionBackend,
    session: &Session,
) -> Result<SubmitReceipt> {
    if wizard.current() != ReflectionStep::Confirmation {
        return Err(FlowError::InvalidTransition {
            from: wizard.current().to_string(),
            to: ReflectionStep::Sent.to_string(),
        }
        .into());
    }

    let submission = wizard.flow().draft().to_submission(session)?;
    let receipt = match backend.submit_reflection(session, &submission).await {
        Ok(receipt) => receipt,
        Err(e) => {
            tracing::warn!(draft = %submission.id, error = %e, "reflection submission failed");
            return Err(e.into());
        }
    };
    tracing::info!(
        draft = %submission.id,
        reflection = %receipt.id,
        delivery = %submission.delivery,
        "reflection submitted"
    );

    wizard.flow_mut().set_receipt(receipt.clone());
    wizard.submit(Answer::choice(CONFIRM))?;
    Ok(receipt)
}

/// A link the user can pass to the recipient.
///
/// Uses the link returned with the submission when there is one, otherwise
/// asks the backend for an invite.
pub async fn share_link(
    wizard: &Wizard<ReflectionFlow>,
    backend: &dyn ReflectionBackend,
    session: &Session,
) -> Result<String> {
    let receipt = wizard.flow().receipt().ok_or_else(|| FlowError::NotAnswered {
        step: ReflectionStep::Confirmation.to_string(),
    })?;
    if let Some(url) = &receipt.share_url {
        return Ok(url.clone());
    }
    let invite = backend.create_invite(session, &receipt.id).await?;
    Ok(invite.invite_url)
}
