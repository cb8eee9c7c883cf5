//! Reflect Assist: guided reflection wizards and a small emotional-load quiz.

pub mod api;
pub mod auth;
pub mod composer;
pub mod config;
pub mod els;
pub mod error;
pub mod onboarding;
pub mod reflection;
pub mod render;
pub mod scoring;
pub mod session;
pub mod validation;
pub mod wizard;

pub use error::{Error, Result};
