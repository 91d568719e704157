//! Authentication: the auth provider seam, credential validation, the
//! session cookie and the guard that protects signed-in pages.
//!
//! Credentials, password hashing and token issuance belong to the hosted
//! provider; this module never stores or checks a password itself.

pub mod guard;
pub mod handlers;
pub mod hosted;
pub mod validation;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::user::{AuthUser, Session};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Message reported by the provider, shown to the user as-is.
    #[error("{0}")]
    Provider(String),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response from auth provider: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result of a sign-up. `session` is `None` when the provider still waits
/// for email confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct SignUpOutcome {
    pub user: Option<AuthUser>,
    pub session: Option<Session>,
}

/// Operations consumed from the hosted auth provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn get_current_user(&self, access_token: &str) -> Result<AuthUser, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
}
