//! In-memory backend for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{
    InviteResponse, OtpRequest, OtpVerifyRequest, OtpVerifyResponse, ReflectionBackend,
    ReflectionSubmission, ReflectionSummary, SubmitReceipt,
};
use crate::error::ApiError;
use crate::session::Session;

pub(crate) const STUB_TOKEN: &str = "stub-token";
pub(crate) const STUB_CODE: &str = "123456";

/// Records every call; fails all calls while `failing` holds a status.
#[derive(Default)]
pub(crate) struct StubBackend {
    pub calls: Mutex<Vec<String>>,
    pub failing: Mutex<Option<u16>>,
    pub submissions: Mutex<Vec<ReflectionSubmission>>,
    pub share_url: Option<String>,
    pub display_name: Option<String>,
}

impl StubBackend {
    pub fn fail_with(&self, status: u16) {
        *self.failing.lock().unwrap() = Some(status);
    }

    pub fn recover(&self) {
        *self.failing.lock().unwrap() = None;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        match *self.failing.lock().unwrap() {
            Some(429) => Err(ApiError::RateLimited { retry_after: None }),
            Some(status) => Err(ApiError::RequestFailed {
                status,
                body: String::new(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ReflectionBackend for StubBackend {
    async fn request_otp(&self, _session: &Session, request: &OtpRequest) -> Result<(), ApiError> {
        self.record(format!("request_otp {} {}", request.channel, request.contact))
    }

    async fn verify_otp(
        &self,
        _session: &Session,
        request: &OtpVerifyRequest,
    ) -> Result<OtpVerifyResponse, ApiError> {
        self.record(format!("verify_otp {}", request.code))?;
        if request.code != STUB_CODE {
            return Err(ApiError::Unauthorized { status: 401 });
        }
        Ok(OtpVerifyResponse {
            token: STUB_TOKEN.to_string(),
            display_name: self.display_name.clone(),
        })
    }

    async fn reflection_history(
        &self,
        _session: &Session,
    ) -> Result<Vec<ReflectionSummary>, ApiError> {
        self.record("reflection_history".to_string())?;
        Ok(Vec::new())
    }

    async fn submit_reflection(
        &self,
        _session: &Session,
        submission: &ReflectionSubmission,
    ) -> Result<SubmitReceipt, ApiError> {
        self.record(format!("submit_reflection {}", submission.delivery))?;
        self.submissions.lock().unwrap().push(submission.clone());
        Ok(SubmitReceipt {
            id: "r-1".to_string(),
            share_url: self.share_url.clone(),
        })
    }

    async fn create_invite(
        &self,
        _session: &Session,
        reflection_id: &str,
    ) -> Result<InviteResponse, ApiError> {
        self.record(format!("create_invite {reflection_id}"))?;
        Ok(InviteResponse {
            invite_url: format!("https://reflect.example/i/{reflection_id}"),
        })
    }
}
