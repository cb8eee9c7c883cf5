//! Wizard engine: the steps of a flow and the cursor that moves between them.
//!
//! Each user journey (onboarding, sign-in, reflection, ELS test) is a
//! fieldless step enum plus a [`Flow`] that owns the journey's payload. The
//! generic [`Wizard`] enforces the declared transition graph, records one
//! answer per step, and supports going back and editing.

pub mod answer;
pub mod machine;
pub mod step;

pub use answer::Answer;
pub use machine::Wizard;
pub use step::{Flow, Step};
