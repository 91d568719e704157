use serde::{Deserialize, Serialize};

/// Public profile shown at `/{username}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicProfile {
    pub username: String,
    pub name: String,
    pub email: String,
    pub bio: String,
    pub location: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
}

impl PublicProfile {
    pub fn initial(&self) -> char {
        self.name.chars().next().unwrap_or('?')
    }
}
