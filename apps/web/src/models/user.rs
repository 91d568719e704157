use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User record as returned by the auth provider. Only the fields the UI uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// The authenticated caller of a guarded page.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub access_token: String,
}

impl Session {
    pub fn from_user(user: AuthUser, access_token: impl Into<String>) -> Self {
        Self {
            user_id: user.id,
            email: user.email.unwrap_or_default(),
            access_token: access_token.into(),
        }
    }

    /// First letter of the email, upper-cased; `U` when there is none.
    pub fn avatar_initial(&self) -> char {
        self.email
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('U')
    }
}
