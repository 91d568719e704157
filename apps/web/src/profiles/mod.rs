//! Public profile pages at `/{username}`.

pub mod handlers;

use crate::models::profile::PublicProfile;

const MAX_USERNAME_LEN: usize = 39;

/// First path segments owned by application routes. None of them can be a
/// public profile, in any letter case.
pub const RESERVED_USERNAMES: [&str; 8] = [
    "health",
    "home",
    "login",
    "logout",
    "onboarding",
    "register",
    "resume",
    "resumes",
];

/// 1 to 39 characters of ASCII letters, digits, `_` or `-`, and not a
/// reserved route name.
pub fn is_valid_username(username: &str) -> bool {
    (1..=MAX_USERNAME_LEN).contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !RESERVED_USERNAMES
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(username))
}

/// Profile served for every valid username until the profile API exists.
pub fn sample_profile(username: &str) -> PublicProfile {
    PublicProfile {
        username: username.to_string(),
        name: "John Doe".to_string(),
        email: "john.doe@example.com".to_string(),
        bio: "Experienced software developer with a passion for creating innovative solutions."
            .to_string(),
        location: "San Francisco, CA".to_string(),
        skills: ["JavaScript", "React", "Node.js", "Python", "TypeScript"]
            .into_iter()
            .map(String::from)
            .collect(),
        experience: "5+ years in software development".to_string(),
        education: "Bachelor's in Computer Science".to_string(),
    }
}
