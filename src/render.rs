//! Step views: what each step shows and what input it takes.
//!
//! Every flow maps its steps to a [`StepView`] through [`Render::view`], so
//! a front end draws any step with one routine instead of a branch per step.

use serde::Serialize;

use crate::wizard::{Answer, Flow};

/// The kind of input a step accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputKind {
    /// Informational step; any input moves on.
    Continue,
    /// Pick one option. A skippable step accepts an empty reply.
    Choice { options: Vec<String>, skippable: bool },
    /// Pick any number of options, including none.
    MultiChoice { options: Vec<String> },
    /// Free text.
    Text { optional: bool },
    /// Pick an action, or type free text to replace the shown content.
    ChoiceOrText { options: Vec<String> },
    /// The flow is over.
    Done,
}

/// Label sent for informational steps.
pub const CONTINUE: &str = "continue";

impl InputKind {
    pub fn choice<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choice {
            options: options.into_iter().map(Into::into).collect(),
            skippable: false,
        }
    }

    /// Turn a raw reply into an answer.
    ///
    /// Options may be referred to by 1-based number or by label (case
    /// insensitive). Unrecognized labels are passed through as-is so the
    /// flow can reject or score them.
    pub fn parse(&self, raw: &str) -> Answer {
        let raw = raw.trim();
        match self {
            Self::Continue | Self::Done => Answer::choice(CONTINUE),
            Self::Choice { options, skippable } => {
                if raw.is_empty() && *skippable {
                    Answer::Skipped
                } else {
                    Answer::choice(resolve(options, raw).unwrap_or(raw))
                }
            }
            Self::MultiChoice { options } => Answer::choices(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| resolve(options, s).unwrap_or(s).to_string()),
            ),
            Self::Text { .. } => Answer::text(raw),
            Self::ChoiceOrText { options } => match resolve(options, raw) {
                Some(label) => Answer::choice(label),
                None => Answer::text(raw),
            },
        }
    }
}

/// Match an option by its 1-based number or its label. Numbers written with
/// a leading zero ("01", "000002") are not option numbers.
fn resolve<'a>(options: &'a [String], raw: &str) -> Option<&'a str> {
    if !raw.starts_with('0') {
        if let Ok(n) = raw.parse::<usize>() {
            return n.checked_sub(1).and_then(|i| options.get(i)).map(String::as_str);
        }
    }
    options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(raw))
        .map(String::as_str)
}

/// Everything needed to draw one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub title: String,
    pub prompt: String,
    pub input: InputKind,
}

impl StepView {
    pub fn new(title: impl Into<String>, prompt: impl Into<String>, input: InputKind) -> Self {
        Self {
            title: title.into(),
            prompt: prompt.into(),
            input,
        }
    }
}

/// A flow that can describe each of its steps.
pub trait Render: Flow {
    fn view(&self, step: Self::Step) -> StepView;
}
