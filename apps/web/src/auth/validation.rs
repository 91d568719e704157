use email_address::EmailAddress;
use serde::Deserialize;

const MIN_SIGNUP_PASSWORD_LEN: usize = 6;

/// Email/password pair as posted by the login and register forms.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Checks login input. On failure returns every problem joined by ", ".
pub fn validate_login(credentials: &Credentials) -> Result<(), String> {
    let mut issues = Vec::new();
    if !EmailAddress::is_valid(credentials.email.trim()) {
        issues.push("Invalid email address");
    }
    if credentials.password.is_empty() {
        issues.push("Password is required");
    }
    finish(issues)
}

/// Checks sign-up input. On failure returns every problem joined by ", ".
pub fn validate_signup(credentials: &Credentials) -> Result<(), String> {
    let mut issues = Vec::new();
    if !EmailAddress::is_valid(credentials.email.trim()) {
        issues.push("Invalid email address");
    }
    if credentials.password.chars().count() < MIN_SIGNUP_PASSWORD_LEN {
        issues.push("Password must be at least 6 characters");
    }
    finish(issues)
}

fn finish(issues: Vec<&str>) -> Result<(), String> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues.join(", "))
    }
}
