//! First-run profile setup: a two-step form collecting a display name and a
//! public username.

pub mod handlers;

use crate::gateway::ProfileUpdate;

pub const STEP_COUNT: u8 = 2;

const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields";
pub const NAME_REQUIRED_MESSAGE: &str = "Please enter your name to continue";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingForm {
    step: u8,
    name: String,
    username: String,
    error: Option<String>,
}

impl Default for OnboardingForm {
    fn default() -> Self {
        Self {
            step: 1,
            name: String::new(),
            username: String::new(),
            error: None,
        }
    }
}

impl OnboardingForm {
    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn set_username(&mut self, username: &str) {
        self.username = username.to_string();
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn can_advance(&self) -> bool {
        self.step < STEP_COUNT && !self.name.trim().is_empty()
    }

    pub fn can_submit(&self) -> bool {
        self.step == STEP_COUNT && !self.username.trim().is_empty()
    }

    /// Moves to the username step once a name is present. A blank name
    /// leaves the step unchanged and records why.
    pub fn go_next(&mut self) -> u8 {
        if self.can_advance() {
            self.step += 1;
            self.error = None;
        } else if self.step < STEP_COUNT {
            self.error = Some(NAME_REQUIRED_MESSAGE.to_string());
        }
        self.step
    }

    pub fn go_previous(&mut self) -> u8 {
        if self.step > 1 {
            self.step -= 1;
            self.error = None;
        }
        self.step
    }

    pub fn progress_percent(&self) -> u8 {
        ((f32::from(self.step) / f32::from(STEP_COUNT)) * 100.0).round() as u8
    }

    /// Trimmed name and username, or the message to show when either is
    /// missing.
    pub fn profile_update(&self) -> Result<ProfileUpdate, String> {
        let name = self.name.trim();
        let username = self.username.trim();
        if name.is_empty() || username.is_empty() {
            return Err(REQUIRED_FIELDS_MESSAGE.to_string());
        }
        Ok(ProfileUpdate {
            name: Some(name.to_string()),
            username: Some(username.to_string()),
        })
    }
}
