//! Stub collaborators shared by unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{AuthError, AuthProvider, SignUpOutcome};
use crate::gateway::{ApiResult, ProfileUpdate, ResumeGateway};
use crate::models::resume::ResumePayload;
use crate::models::user::{AuthUser, Session};

pub const VALID_TOKEN: &str = "valid-token";
pub const TEST_EMAIL: &str = "a@b.com";

pub fn test_user() -> AuthUser {
    AuthUser {
        id: Uuid::from_u128(0x1234),
        email: Some(TEST_EMAIL.to_string()),
    }
}

pub fn test_session() -> Session {
    Session::from_user(test_user(), VALID_TOKEN)
}

/// Gateway returning a canned result and recording what it was sent.
pub struct StubGateway {
    result: ApiResult,
    resume: Option<serde_json::Value>,
    submitted: Mutex<Vec<ResumePayload>>,
    profiles: Mutex<Vec<(String, ProfileUpdate, Option<String>)>>,
}

impl StubGateway {
    pub fn succeeding() -> Self {
        Self::with_result(ApiResult::ok(Some(json!({"id": "new"}))))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_result(ApiResult::failure(message))
    }

    fn with_result(result: ApiResult) -> Self {
        Self {
            result,
            resume: None,
            submitted: Mutex::new(Vec::new()),
            profiles: Mutex::new(Vec::new()),
        }
    }

    /// Serves `resume` from `fetch_resume` regardless of id.
    pub fn serving_resume(mut self, resume: serde_json::Value) -> Self {
        self.resume = Some(resume);
        self
    }

    pub fn submitted(&self) -> Vec<ResumePayload> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn profiles(&self) -> Vec<(String, ProfileUpdate, Option<String>)> {
        self.profiles.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResumeGateway for StubGateway {
    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
        token: Option<&str>,
    ) -> ApiResult {
        self.profiles.lock().unwrap().push((
            user_id.to_string(),
            update.clone(),
            token.map(str::to_string),
        ));
        self.result.clone()
    }

    async fn fetch_resume(&self, _resume_id: &str, _token: Option<&str>) -> ApiResult {
        match &self.resume {
            Some(resume) => ApiResult::ok(Some(resume.clone())),
            None => ApiResult::failure("HTTP error! status: 404"),
        }
    }

    async fn submit_resume(&self, payload: &ResumePayload, _token: Option<&str>) -> ApiResult {
        self.submitted.lock().unwrap().push(payload.clone());
        match &self.result.data {
            // Echo the payload back the way a real API would return the stored record.
            Some(_) if self.result.success => {
                ApiResult::ok(Some(serde_json::to_value(payload).unwrap()))
            }
            _ => self.result.clone(),
        }
    }
}

/// Gateway whose calls never complete, for exercising cancellation.
pub struct PendingGateway;

#[async_trait]
impl ResumeGateway for PendingGateway {
    async fn update_profile(
        &self,
        _user_id: &str,
        _update: &ProfileUpdate,
        _token: Option<&str>,
    ) -> ApiResult {
        std::future::pending().await
    }

    async fn fetch_resume(&self, _resume_id: &str, _token: Option<&str>) -> ApiResult {
        std::future::pending().await
    }

    async fn submit_resume(&self, _payload: &ResumePayload, _token: Option<&str>) -> ApiResult {
        std::future::pending().await
    }
}

/// Auth provider accepting exactly one token and one password.
#[derive(Default)]
pub struct StubAuth {
    pub sign_up_confirms_by_email: bool,
    pub sign_out_error: Option<String>,
}

pub const VALID_PASSWORD: &str = "hunter22";

#[async_trait]
impl AuthProvider for StubAuth {
    async fn get_current_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        if access_token == VALID_TOKEN {
            Ok(test_user())
        } else {
            Err(AuthError::Provider("invalid JWT".to_string()))
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        if email == TEST_EMAIL && password == VALID_PASSWORD {
            Ok(test_session())
        } else {
            Err(AuthError::Provider("Invalid login credentials".to_string()))
        }
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<SignUpOutcome, AuthError> {
        if email == TEST_EMAIL {
            return Err(AuthError::Provider("User already registered".to_string()));
        }
        let user = AuthUser {
            id: Uuid::from_u128(0x5678),
            email: Some(email.to_string()),
        };
        let session = if self.sign_up_confirms_by_email {
            None
        } else {
            Some(Session::from_user(user.clone(), VALID_TOKEN))
        };
        Ok(SignUpOutcome {
            user: Some(user),
            session,
        })
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), AuthError> {
        match &self.sign_out_error {
            Some(message) => Err(AuthError::Provider(message.clone())),
            None => Ok(()),
        }
    }
}
