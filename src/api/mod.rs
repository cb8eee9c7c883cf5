//! Reflection backend access.
//!
//! The backend (OTP issuance, reflection storage, invites) lives elsewhere;
//! this module only speaks its existing JSON contract. [`ReflectionBackend`]
//! is the seam flows depend on, [`ApiClient`] the HTTP implementation.

pub mod client;
#[cfg(test)]
pub(crate) mod stub;
pub mod types;

pub use client::ApiClient;
pub use types::{
    InviteResponse, OtpRequest, OtpVerifyRequest, OtpVerifyResponse, ReflectionSubmission,
    ReflectionSummary, SubmitReceipt,
};

use async_trait::async_trait;

use crate::error::ApiError;
use crate::session::Session;

/// Backend paths, relative to the configured base URL.
pub mod endpoints {
    pub const OTP_REQUEST: &str = "/auth/otp/request";
    pub const OTP_VERIFY: &str = "/auth/otp/verify";
    pub const REFLECTIONS: &str = "/reflections";
    pub const INVITES: &str = "/invites";
}

/// Operations the flows need from the backend.
///
/// Every call authenticates with the session's token cookie when present.
#[async_trait]
pub trait ReflectionBackend: Send + Sync {
    /// Ask for a one-time code to be sent to a contact.
    async fn request_otp(&self, session: &Session, request: &OtpRequest) -> Result<(), ApiError>;

    /// Exchange a one-time code for a session token.
    async fn verify_otp(
        &self,
        session: &Session,
        request: &OtpVerifyRequest,
    ) -> Result<OtpVerifyResponse, ApiError>;

    /// The signed-in user's past reflections.
    async fn reflection_history(&self, session: &Session)
    -> Result<Vec<ReflectionSummary>, ApiError>;

    /// Store (and, unless saved privately, deliver) a reflection.
    async fn submit_reflection(
        &self,
        session: &Session,
        submission: &ReflectionSubmission,
    ) -> Result<SubmitReceipt, ApiError>;

    /// Create an invite link for a stored reflection.
    async fn create_invite(
        &self,
        session: &Session,
        reflection_id: &str,
    ) -> Result<InviteResponse, ApiError>;
}
