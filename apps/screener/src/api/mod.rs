//! Screening-service client, the single point of entry for all remote calls.
//!
//! ARCHITECTURAL RULE: no other module may talk to the service directly.
//! Every endpoint the client consumes is a method on [`ScreeningApi`], so the
//! workflow layer can be exercised against a scripted implementation in tests.
//!
//! Failure mapping, applied uniformly to every call:
//! - the request never completes (connect failure, timeout) -> `ClientError::Transport`
//! - non-success status -> the operation's `RemoteError` variant, with the
//!   `{error}` / `{message}` detail parsed out of the body when present
//! - success status with an unreadable body -> `RemoteError::InvalidResponse`
//!
//! There are deliberately no retries and no backoff: every failure is
//! terminal for that invocation and requires a fresh user action.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::errors::{ClientError, RemoteError};
use crate::models::{
    LoginRequest, LoginResponse, NotificationRequest, RankRequest, RankResponse, ResumeRecord,
    SelectedFile, SignupRequest, SignupResponse, UploadResponse,
};
use crate::session::SessionToken;

/// The remote surface of the screening service, one method per endpoint.
#[async_trait]
pub trait ScreeningApi: Send + Sync {
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ClientError>;
    async fn signup(&self, req: &SignupRequest) -> Result<SignupResponse, ClientError>;
    /// The bearer token is attached when a session is present; the listing
    /// endpoint itself does not require one.
    async fn fetch_resumes(
        &self,
        token: Option<&SessionToken>,
    ) -> Result<Vec<ResumeRecord>, ClientError>;
    async fn upload_resume(&self, file: &SelectedFile) -> Result<UploadResponse, ClientError>;
    async fn rank_resumes(&self, req: &RankRequest) -> Result<RankResponse, ClientError>;
    async fn send_notification(&self, req: &NotificationRequest) -> Result<(), ClientError>;
}

/// reqwest-backed implementation used by the binary.
#[derive(Clone)]
pub struct HttpScreeningApi {
    base_url: String,
    client: Client,
}

impl HttpScreeningApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ScreeningApi for HttpScreeningApi {
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ClientError> {
        debug!(username = %req.username, "logging in");
        let response = self
            .client
            .post(self.url("/admin_login"))
            .json(req)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if !response.status().is_success() {
            let detail = error_detail(response).await;
            return Err(RemoteError::LoginFailed { detail }.into());
        }
        read_json(response).await
    }

    async fn signup(&self, req: &SignupRequest) -> Result<SignupResponse, ClientError> {
        debug!(username = %req.username, "signing up");
        let response = self
            .client
            .post(self.url("/admin_signup"))
            .json(req)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        // The service reports taken usernames and existing emails with a
        // non-success status but a well-formed `{success, error}` body.
        // Surface those as a soft result rather than a remote failure.
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if let Ok(parsed) = serde_json::from_str::<SignupResponse>(&body) {
            return Ok(parsed);
        }
        if !status.is_success() {
            return Err(RemoteError::SignupFailed {
                detail: parse_error_detail(&body),
            }
            .into());
        }
        Err(RemoteError::InvalidResponse(format!("unexpected signup body: {body}")).into())
    }

    async fn fetch_resumes(
        &self,
        token: Option<&SessionToken>,
    ) -> Result<Vec<ResumeRecord>, ClientError> {
        debug!(authenticated = token.is_some(), "fetching resume list");
        let mut request = self.client.get(self.url("/get_resumes"));
        if let Some(token) = token {
            request = request.bearer_auth(token.expose());
        }
        let response = request.send().await.map_err(ClientError::Transport)?;

        if !response.status().is_success() {
            let detail = error_detail(response).await;
            return Err(RemoteError::FetchFailed { detail }.into());
        }
        read_json(response).await
    }

    async fn upload_resume(&self, file: &SelectedFile) -> Result<UploadResponse, ClientError> {
        debug!(file = %file.name, size = file.bytes.len(), "uploading resume");
        let part = reqwest::multipart::Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone());
        let form = reqwest::multipart::Form::new().part("resume", part);

        let response = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if !response.status().is_success() {
            let detail = error_detail(response).await;
            return Err(RemoteError::UploadFailed { detail }.into());
        }
        read_json(response).await
    }

    async fn rank_resumes(&self, req: &RankRequest) -> Result<RankResponse, ClientError> {
        debug!(resumes = req.resumes.len(), "requesting ranking");
        let response = self
            .client
            .post(self.url("/rank_resumes"))
            .json(req)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if !response.status().is_success() {
            let detail = error_detail(response).await;
            return Err(RemoteError::RankingFailed { detail }.into());
        }
        read_json(response).await
    }

    async fn send_notification(&self, req: &NotificationRequest) -> Result<(), ClientError> {
        debug!(recipient = %req.email, "sending notification");
        let response = self
            .client
            .post(self.url("/send_email"))
            .json(req)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if !response.status().is_success() {
            let detail = error_detail(response).await;
            return Err(RemoteError::NotificationFailed { detail }.into());
        }
        Ok(())
    }
}

/// Reads a success body, distinguishing decode failures (the call completed,
/// the service sent garbage) from mid-body transport failures.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    response.json::<T>().await.map_err(|e| {
        if e.is_decode() {
            RemoteError::InvalidResponse(e.to_string()).into()
        } else {
            ClientError::Transport(e)
        }
    })
}

/// Best-effort extraction of a human-readable detail from an error body.
async fn error_detail(response: reqwest::Response) -> Option<String> {
    let body = response.text().await.ok()?;
    parse_error_detail(&body)
}

fn parse_error_detail(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        error: Option<String>,
        #[serde(default)]
        message: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(detail) = parsed.error.or(parsed.message) {
            return Some(detail);
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
