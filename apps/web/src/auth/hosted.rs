//! Client for a GoTrue-compatible hosted auth REST API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::{AuthError, AuthProvider, SignUpOutcome};
use crate::models::user::{AuthUser, Session};

#[derive(Debug, Serialize)]
struct PasswordCredentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

/// Sign-up returns either a full session or, when email confirmation is
/// pending, the bare user object at the top level.
#[derive(Debug, Deserialize)]
struct SignUpResponse {
    access_token: Option<String>,
    user: Option<AuthUser>,
    id: Option<Uuid>,
    email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderErrorBody {
    msg: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

#[derive(Clone)]
pub struct HostedAuth {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl HostedAuth {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(15))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &self.anon_key)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }
}

/// Turns a non-2xx response into the provider's own message when it has one.
async fn check(response: Response) -> Result<Response, AuthError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let parsed: ProviderErrorBody = serde_json::from_str(&body).unwrap_or_default();
    let message = parsed
        .msg
        .or(parsed.error_description)
        .or(parsed.message)
        .or(parsed.error);

    warn!("Auth provider returned {}: {}", status, body);
    Err(match message {
        Some(message) => AuthError::Provider(message),
        None => AuthError::Status(status.as_u16()),
    })
}

#[async_trait]
impl AuthProvider for HostedAuth {
    async fn get_current_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .request(self.client.get(self.url("user")))
            .bearer_auth(access_token)
            .send()
            .await?;
        let body = check(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let response = self
            .request(self.client.post(self.url("token?grant_type=password")))
            .json(&PasswordCredentials { email, password })
            .send()
            .await?;
        let body = check(response).await?.text().await?;
        let token: TokenResponse = serde_json::from_str(&body)?;
        debug!("Signed in user {}", token.user.id);
        Ok(Session::from_user(token.user, token.access_token))
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        let response = self
            .request(self.client.post(self.url("signup")))
            .json(&PasswordCredentials { email, password })
            .send()
            .await?;
        let body = check(response).await?.text().await?;
        let parsed: SignUpResponse = serde_json::from_str(&body)?;

        let user = parsed.user.or(parsed.id.map(|id| AuthUser {
            id,
            email: parsed.email,
        }));
        let session = match (parsed.access_token, &user) {
            (Some(token), Some(user)) => Some(Session::from_user(user.clone(), token)),
            _ => None,
        };
        Ok(SignUpOutcome { user, session })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .request(self.client.post(self.url("logout")))
            .bearer_auth(access_token)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}
