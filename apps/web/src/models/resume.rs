use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::wizard::draft::Draft;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeStatus {
    Draft,
    Published,
}

impl ResumeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ResumeStatus::Draft => "draft",
            ResumeStatus::Published => "published",
        }
    }
}

impl fmt::Display for ResumeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored resume as listed on the dashboard and shown on the detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    pub id: String,
    pub title: String,
    pub status: ResumeStatus,
    #[serde(deserialize_with = "date_prefix")]
    pub updated_at: NaiveDate,
    #[serde(deserialize_with = "date_prefix")]
    pub created_at: NaiveDate,
    #[serde(default)]
    pub content: Draft,
}

/// Accepts `YYYY-MM-DD` as well as full RFC 3339 timestamps.
fn date_prefix<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let date = raw.get(..10).unwrap_or(raw.as_str());
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

/// Wire body for save and publish: always the complete draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumePayload {
    pub status: ResumeStatus,
    pub content: Draft,
}
