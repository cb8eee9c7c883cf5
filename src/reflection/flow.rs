//! Reflection wizard steps and transitions.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::composer::{Intent, MessageComposer};
use crate::error::{FlowError, Result, ValidationError};
use crate::render::{InputKind, Render, StepView};
use crate::validation::require;
use crate::wizard::step::{unexpected, unknown_option};
use crate::wizard::{Answer, Flow, Step};

use super::model::{DeliveryMethod, ReflectionDraft, SenderMode, TemplateStyle};

/// Keep the previewed message and move on.
pub const ACCEPT: &str = "accept";
/// Show the next phrasing of the message.
pub const REGENERATE: &str = "regenerate";
/// Confirm sending or saving.
pub const CONFIRM: &str = "confirm";

/// Steps of the reflection wizard.
///
/// `intent_selection → recipient_input → relationship_input → conversation
/// → message_preview → template_selection → delivery_selection →
/// [sender_selection] → confirmation → sent | saved`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflectionStep {
    IntentSelection,
    RecipientInput,
    RelationshipInput,
    Conversation,
    MessagePreview,
    TemplateSelection,
    DeliverySelection,
    SenderSelection,
    Confirmation,
    Sent,
    Saved,
}

impl Step for ReflectionStep {
    const ALL: &'static [Self] = &[
        Self::IntentSelection,
        Self::RecipientInput,
        Self::RelationshipInput,
        Self::Conversation,
        Self::MessagePreview,
        Self::TemplateSelection,
        Self::DeliverySelection,
        Self::SenderSelection,
        Self::Confirmation,
        Self::Sent,
        Self::Saved,
    ];

    fn first() -> Self {
        Self::IntentSelection
    }

    fn successors(&self) -> &'static [Self] {
        use ReflectionStep::*;
        match self {
            IntentSelection => &[RecipientInput],
            RecipientInput => &[RelationshipInput],
            RelationshipInput => &[Conversation],
            Conversation => &[MessagePreview],
            MessagePreview => &[MessagePreview, TemplateSelection],
            TemplateSelection => &[DeliverySelection],
            DeliverySelection => &[SenderSelection, Confirmation],
            SenderSelection => &[Confirmation],
            Confirmation => &[Sent, Saved],
            Sent | Saved => &[],
        }
    }
}

impl std::fmt::Display for ReflectionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::IntentSelection => "intent_selection",
            Self::RecipientInput => "recipient_input",
            Self::RelationshipInput => "relationship_input",
            Self::Conversation => "conversation",
            Self::MessagePreview => "message_preview",
            Self::TemplateSelection => "template_selection",
            Self::DeliverySelection => "delivery_selection",
            Self::SenderSelection => "sender_selection",
            Self::Confirmation => "confirmation",
            Self::Sent => "sent",
            Self::Saved => "saved",
        };
        write!(f, "{s}")
    }
}

/// Reflection wizard state: the draft and the phrasing cursor.
#[derive(Debug, Clone, Default)]
pub struct ReflectionFlow {
    draft: ReflectionDraft,
    composer: Option<MessageComposer>,
    receipt: Option<crate::api::SubmitReceipt>,
    /// The message was typed by the user rather than composed.
    hand_edited: bool,
}

impl ReflectionFlow {
    pub fn draft(&self) -> &ReflectionDraft {
        &self.draft
    }

    pub fn composer(&self) -> Option<&MessageComposer> {
        self.composer.as_ref()
    }

    /// Backend receipt, once the draft has been submitted.
    pub fn receipt(&self) -> Option<&crate::api::SubmitReceipt> {
        self.receipt.as_ref()
    }

    pub(crate) fn set_receipt(&mut self, receipt: crate::api::SubmitReceipt) {
        self.receipt = Some(receipt);
    }

    fn compose(&mut self) -> Result<()> {
        let composer = self.composer.as_ref().ok_or_else(|| FlowError::NotAnswered {
            step: ReflectionStep::IntentSelection.to_string(),
        })?;
        let input = self.draft.message_input();
        input.validate()?;
        self.draft.message = composer.compose(&input);
        self.hand_edited = false;
        Ok(())
    }

    /// Recompose after a field the message is built from changed, unless
    /// nothing was composed yet or the user wrote the message themselves.
    fn refresh(&mut self) -> Result<()> {
        if self.draft.message.is_empty() || self.hand_edited {
            return Ok(());
        }
        self.compose()
    }

    pub fn is_hand_edited(&self) -> bool {
        self.hand_edited
    }
}

fn choice<T: FromStr>(step: ReflectionStep, answer: &Answer) -> Result<T> {
    let label = answer
        .as_choice()
        .ok_or_else(|| unexpected(step, "a single choice"))?;
    label.parse().map_err(|_| unknown_option(step, label))
}

fn required_text<'a>(step: ReflectionStep, answer: &'a Answer, field: &str) -> Result<&'a str> {
    match answer {
        Answer::Text(text) => Ok(require(field, text)?),
        Answer::Skipped => Err(ValidationError::Required {
            field: field.to_string(),
        }
        .into()),
        _ => Err(unexpected(step, "text")),
    }
}

/// What the preview step was asked to do.
enum PreviewAction<'a> {
    Accept,
    Regenerate,
    Edit(&'a str),
}

fn preview_action(answer: &Answer) -> Result<PreviewAction<'_>> {
    let step = ReflectionStep::MessagePreview;
    match answer {
        Answer::Choice(label) if label.eq_ignore_ascii_case(ACCEPT) => Ok(PreviewAction::Accept),
        Answer::Choice(label) if label.eq_ignore_ascii_case(REGENERATE) => {
            Ok(PreviewAction::Regenerate)
        }
        Answer::Choice(label) => Err(unknown_option(step, label)),
        Answer::Text(_) | Answer::Skipped => {
            Ok(PreviewAction::Edit(required_text(step, answer, "Message")?))
        }
        Answer::Choices(_) => Err(unexpected(step, "accept, regenerate, or new text")),
    }
}

impl Flow for ReflectionFlow {
    type Step = ReflectionStep;
    const NAME: &'static str = "reflection";

    fn apply(&mut self, step: ReflectionStep, answer: &Answer) -> Result<()> {
        use ReflectionStep::*;
        match step {
            IntentSelection => {
                let intent: Intent = choice(step, answer)?;
                if self.composer.map(|c| c.intent()) != Some(intent) {
                    self.composer = Some(MessageComposer::new(intent));
                    self.draft.intent = Some(intent);
                    if !self.draft.message.is_empty() {
                        self.compose()?;
                    }
                }
            }
            RecipientInput => {
                self.draft.recipient_name = required_text(step, answer, "Recipient name")?.to_string();
                self.refresh()?;
            }
            RelationshipInput => {
                self.draft.relationship = match answer {
                    Answer::Text(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
                    Answer::Text(_) | Answer::Skipped => None,
                    _ => return Err(unexpected(step, "text or a skip")),
                };
                self.refresh()?;
            }
            Conversation => {
                self.draft.description = required_text(step, answer, "Message")?.to_string();
                self.compose()?;
            }
            MessagePreview => match preview_action(answer)? {
                PreviewAction::Accept => {}
                PreviewAction::Regenerate => {
                    let input = self.draft.message_input();
                    let composer = self.composer.as_mut().ok_or_else(|| FlowError::NotAnswered {
                        step: IntentSelection.to_string(),
                    })?;
                    self.draft.message = composer.regenerate(&input);
                    self.hand_edited = false;
                }
                PreviewAction::Edit(text) => {
                    self.draft.message = text.to_string();
                    self.hand_edited = true;
                }
            },
            TemplateSelection => self.draft.template = Some(choice(step, answer)?),
            DeliverySelection => {
                let delivery: DeliveryMethod = choice(step, answer)?;
                if delivery.is_private() {
                    // A sender choice from an abandoned public branch no
                    // longer applies.
                    self.draft.sender_mode = SenderMode::default();
                }
                self.draft.delivery = Some(delivery);
            }
            SenderSelection => self.draft.sender_mode = choice(step, answer)?,
            Confirmation => {
                if answer.as_choice().is_none_or(|c| !c.eq_ignore_ascii_case(CONFIRM)) {
                    return Err(unexpected(step, "confirm"));
                }
            }
            Sent | Saved => {
                return Err(FlowError::Finished {
                    flow: Self::NAME.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn next(&self, step: ReflectionStep, answer: &Answer) -> Result<ReflectionStep> {
        use ReflectionStep::*;
        match step {
            IntentSelection => choice::<Intent>(step, answer).map(|_| RecipientInput),
            RecipientInput => required_text(step, answer, "Recipient name").map(|_| RelationshipInput),
            RelationshipInput => match answer {
                Answer::Text(_) | Answer::Skipped => Ok(Conversation),
                _ => Err(unexpected(step, "text or a skip")),
            },
            Conversation => required_text(step, answer, "Message").map(|_| MessagePreview),
            MessagePreview => match preview_action(answer)? {
                PreviewAction::Accept => Ok(TemplateSelection),
                PreviewAction::Regenerate | PreviewAction::Edit(_) => Ok(MessagePreview),
            },
            TemplateSelection => choice::<TemplateStyle>(step, answer).map(|_| DeliverySelection),
            DeliverySelection => {
                let delivery: DeliveryMethod = choice(step, answer)?;
                Ok(if delivery.is_private() {
                    Confirmation
                } else {
                    SenderSelection
                })
            }
            SenderSelection => choice::<SenderMode>(step, answer).map(|_| Confirmation),
            Confirmation => {
                match answer.as_choice() {
                    Some(label) if label.eq_ignore_ascii_case(CONFIRM) => {}
                    Some(label) => return Err(unknown_option(step, label)),
                    None => return Err(unexpected(step, "confirm")),
                }
                let delivery = self.draft.delivery.ok_or_else(|| FlowError::NotAnswered {
                    step: DeliverySelection.to_string(),
                })?;
                Ok(if delivery.is_private() { Saved } else { Sent })
            }
            Sent | Saved => Err(FlowError::Finished {
                flow: Self::NAME.to_string(),
            }
            .into()),
        }
    }
}

fn labels<T: ToString>(items: impl IntoIterator<Item = T>) -> Vec<String> {
    items.into_iter().map(|i| i.to_string()).collect()
}

impl Render for ReflectionFlow {
    fn view(&self, step: ReflectionStep) -> StepView {
        use ReflectionStep::*;
        let recipient = self.draft.recipient_name.as_str();
        match step {
            IntentSelection => StepView::new(
                "What would you like to say?",
                "Pick what this message is about.",
                InputKind::choice(labels(Intent::ALL)),
            ),
            RecipientInput => StepView::new(
                "Who is it for?",
                "Enter their name.",
                InputKind::Text { optional: false },
            ),
            RelationshipInput => StepView::new(
                "How do you know them?",
                format!("Your relationship to {recipient} (optional, press Enter to skip)."),
                InputKind::Text { optional: true },
            ),
            Conversation => StepView::new(
                "Tell me more",
                self.draft
                    .intent
                    .map(|i| i.conversation_prompt())
                    .unwrap_or("What's on your mind?"),
                InputKind::Text { optional: false },
            ),
            MessagePreview => StepView::new(
                "Here's your message",
                format!(
                    "{}\n\nAccept it, regenerate another phrasing, or type your own version.",
                    self.draft.message
                ),
                InputKind::ChoiceOrText {
                    options: vec![ACCEPT.to_string(), REGENERATE.to_string()],
                },
            ),
            TemplateSelection => StepView::new(
                "Choose a look",
                "Pick a card template.",
                InputKind::choice(labels(TemplateStyle::ALL)),
            ),
            DeliverySelection => StepView::new(
                "How should it be delivered?",
                format!("Send it to {recipient}, or keep it private."),
                InputKind::choice(labels(DeliveryMethod::ALL)),
            ),
            SenderSelection => StepView::new(
                "Sign it?",
                "Send with your name, or anonymously.",
                InputKind::choice(labels(SenderMode::ALL)),
            ),
            Confirmation => {
                let action = if self.draft.delivery.is_some_and(|d| d.is_private()) {
                    "Save this reflection privately?"
                } else {
                    "Send this reflection?"
                };
                StepView::new("Ready?", action, InputKind::choice([CONFIRM]))
            }
            Sent => StepView::new(
                "Sent",
                match self.receipt.as_ref().and_then(|r| r.share_url.as_deref()) {
                    Some(url) => format!("Your message to {recipient} is on its way. Share link: {url}"),
                    None => format!("Your message to {recipient} is on its way."),
                },
                InputKind::Done,
            ),
            Saved => StepView::new(
                "Saved",
                "Your reflection is saved privately.",
                InputKind::Done,
            ),
        }
    }
}
