//! Persistence gateway: the single point of entry for calls to the external
//! resume/profile REST API.
//!
//! Every operation resolves to an `ApiResult`. Transport failures, non-2xx
//! statuses and undecodable bodies are logged here and converted into
//! `ApiResult { success: false, message }`; nothing propagates past this
//! boundary. There is no retry.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::models::resume::ResumePayload;

/// Environment variable holding the API base URL. Read on every request.
pub const API_URL_ENV: &str = "API_URL";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("API_URL is not configured")]
    MissingBaseUrl,

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Uniform outcome of every gateway call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResult {
    pub fn ok(data: Option<Value>) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Body of `PUT /users/{id}`. Absent fields are left out of the JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Operations the app needs from the resume/profile API.
#[async_trait]
pub trait ResumeGateway: Send + Sync {
    /// `PUT /users/{user_id}`; adds a bearer header when `token` is given.
    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
        token: Option<&str>,
    ) -> ApiResult;

    /// `GET /resume/{resume_id}`.
    async fn fetch_resume(&self, resume_id: &str, token: Option<&str>) -> ApiResult;

    /// `POST /resume` with the complete draft snapshot.
    async fn submit_resume(&self, payload: &ResumePayload, token: Option<&str>) -> ApiResult;
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Option<String>,
}

impl ApiClient {
    /// Client that resolves the base URL from `API_URL` at request time.
    pub fn from_env() -> Self {
        Self {
            client: build_client(),
            base_url: None,
        }
    }

    /// Client pinned to a fixed base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: build_client(),
            base_url: Some(base_url.into()),
        }
    }

    fn endpoint(&self, path: &str) -> Result<String, GatewayError> {
        let raw = match &self.base_url {
            Some(url) => url.clone(),
            None => std::env::var(API_URL_ENV).map_err(|_| GatewayError::MissingBaseUrl)?,
        };
        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(GatewayError::MissingBaseUrl);
        }
        Ok(format!("{trimmed}{path}"))
    }

    pub async fn update_user_profile(&self, user_id: &str, update: &ProfileUpdate) -> ApiResult {
        self.put_profile(user_id, update, None).await
    }

    pub async fn update_user_profile_with_auth(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
        token: &str,
    ) -> ApiResult {
        self.put_profile(user_id, update, Some(token)).await
    }

    async fn put_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
        token: Option<&str>,
    ) -> ApiResult {
        let outcome = match self.endpoint(&format!("/users/{}", urlencoding::encode(user_id))) {
            Ok(url) => self.execute(self.client.put(url).json(update), token).await,
            Err(e) => Err(e),
        };
        settle("updating user profile", outcome)
    }

    pub async fn get_resume(&self, resume_id: &str, token: Option<&str>) -> ApiResult {
        let outcome = match self.endpoint(&format!("/resume/{}", urlencoding::encode(resume_id))) {
            Ok(url) => self.execute(self.client.get(url), token).await,
            Err(e) => Err(e),
        };
        settle("fetching resume", outcome)
    }

    pub async fn post_resume(&self, payload: &ResumePayload, token: Option<&str>) -> ApiResult {
        let outcome = match self.endpoint("/resume") {
            Ok(url) => self.execute(self.client.post(url).json(payload), token).await,
            Err(e) => Err(e),
        };
        settle("submitting resume", outcome)
    }

    /// Sends the request and decodes the JSON body. An empty body yields `None`.
    async fn execute(
        &self,
        request: RequestBuilder,
        token: Option<&str>,
    ) -> Result<Option<Value>, GatewayError> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!("API call succeeded: status={}, bytes={}", status, body.len());
        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&body)?))
    }
}

#[async_trait]
impl ResumeGateway for ApiClient {
    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
        token: Option<&str>,
    ) -> ApiResult {
        match token {
            Some(token) => self.update_user_profile_with_auth(user_id, update, token).await,
            None => self.update_user_profile(user_id, update).await,
        }
    }

    async fn fetch_resume(&self, resume_id: &str, token: Option<&str>) -> ApiResult {
        self.get_resume(resume_id, token).await
    }

    async fn submit_resume(&self, payload: &ResumePayload, token: Option<&str>) -> ApiResult {
        self.post_resume(payload, token).await
    }
}

fn build_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .expect("Failed to build HTTP client")
}

fn settle(action: &str, outcome: Result<Option<Value>, GatewayError>) -> ApiResult {
    match outcome {
        Ok(data) => ApiResult::ok(data),
        Err(e) => {
            error!("Error {action}: {e}");
            ApiResult::failure(e.to_string())
        }
    }
}
