//! HTTP client for the reflection backend.
//!
//! Every request carries `Authorization: Bearer <token>` when the session's
//! token cookie is set, and goes out without it otherwise. One request, one
//! response: no retries, no backoff.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::{Method, Response, StatusCode, Url};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError};
use crate::session::Session;

use super::ReflectionBackend;
use super::endpoints;
use super::types::{
    HistoryResponse, InviteRequest, InviteResponse, OtpRequest, OtpVerifyRequest,
    OtpVerifyResponse, ReflectionSubmission, ReflectionSummary, SubmitReceipt,
};

/// Thin wrapper over `reqwest::Client` bound to one backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client from configuration. Fails if no backend URL is set.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let base_url = config.require_api_url()?.clone();
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                key: "http_client".to_string(),
                message: e.to_string(),
            })?;
        tracing::info!(base_url = %base_url, "Using reflection backend");
        Ok(Self { http, base_url })
    }

    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join `path` onto the base URL, keeping any base path prefix.
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{joined}: {e}")))
    }

    /// Send one request.
    ///
    /// `headers` and `body` are passed through as given; only the
    /// `Authorization` header is set from the session's token cookie.
    pub async fn send(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        mut headers: HeaderMap,
    ) -> Result<Response, ApiError> {
        let url = self.url(path)?;
        let authenticated = match session.auth_token() {
            Some(token) => {
                let bearer = format!("Bearer {}", token.expose_secret());
                let mut value = HeaderValue::from_str(&bearer).map_err(|_| {
                    ApiError::InvalidRequest("auth token is not a valid header value".into())
                })?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
                true
            }
            None => false,
        };

        tracing::debug!(%method, path, authenticated, "backend request");
        let mut request = self.http.request(method.clone(), url).headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "backend request failed");
            ApiError::from(e)
        })?;
        check_status(response).await
    }

    /// Send a typed JSON body and decode a typed JSON response.
    pub async fn send_json<B, T>(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| ApiError::InvalidRequest(format!("request body: {e}")))?;
        let response = self
            .send(session, method, path, body.as_ref(), HeaderMap::new())
            .await?;
        Ok(response.json::<T>().await?)
    }
}

/// Map non-success statuses onto [`ApiError`].
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        tracing::warn!(?retry_after, "backend rate limited");
        return Err(ApiError::RateLimited { retry_after });
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        tracing::warn!(status = status.as_u16(), "backend rejected credentials");
        return Err(ApiError::Unauthorized {
            status: status.as_u16(),
        });
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), "backend request unsuccessful");
    Err(ApiError::RequestFailed {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ReflectionBackend for ApiClient {
    async fn request_otp(&self, session: &Session, request: &OtpRequest) -> Result<(), ApiError> {
        let body = serde_json::to_value(request)
            .map_err(|e| ApiError::InvalidRequest(format!("request body: {e}")))?;
        self.send(
            session,
            Method::POST,
            endpoints::OTP_REQUEST,
            Some(&body),
            HeaderMap::new(),
        )
        .await?;
        Ok(())
    }

    async fn verify_otp(
        &self,
        session: &Session,
        request: &OtpVerifyRequest,
    ) -> Result<OtpVerifyResponse, ApiError> {
        self.send_json(session, Method::POST, endpoints::OTP_VERIFY, Some(request))
            .await
    }

    async fn reflection_history(
        &self,
        session: &Session,
    ) -> Result<Vec<ReflectionSummary>, ApiError> {
        let history: HistoryResponse = self
            .send_json::<(), _>(session, Method::GET, endpoints::REFLECTIONS, None)
            .await?;
        Ok(history.into_vec())
    }

    async fn submit_reflection(
        &self,
        session: &Session,
        submission: &ReflectionSubmission,
    ) -> Result<SubmitReceipt, ApiError> {
        self.send_json(session, Method::POST, endpoints::REFLECTIONS, Some(submission))
            .await
    }

    async fn create_invite(
        &self,
        session: &Session,
        reflection_id: &str,
    ) -> Result<InviteResponse, ApiError> {
        let request = InviteRequest {
            reflection_id: reflection_id.to_string(),
        };
        self.send_json(session, Method::POST, endpoints::INVITES, Some(&request))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn url_keeps_base_path() {
        let c = client("https://api.example.com/v1/");
        assert_eq!(
            c.url("/reflections").unwrap().as_str(),
            "https://api.example.com/v1/reflections"
        );
        let c = client("https://api.example.com/v1");
        assert_eq!(
            c.url("auth/otp/request").unwrap().as_str(),
            "https://api.example.com/v1/auth/otp/request"
        );
    }

    #[test]
    fn new_requires_api_url() {
        let err = ApiClient::new(&ClientConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }
}
