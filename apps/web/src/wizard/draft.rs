use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Identifier of a list entry, unique within one draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    /// Placeholder carried by entries that have not been added to a list yet.
    pub const UNASSIGNED: EntryId = EntryId(0);

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(EntryId)
    }
}

/// Implemented by every list entry kind so `EntryList` can stamp identifiers.
pub trait Entry {
    fn id(&self) -> EntryId;
    fn with_id(self, id: EntryId) -> Self;
}

/// Ordered collection of entries keyed by a monotonic identifier.
///
/// Identifiers are never reused within a list, even after removal.
/// Serialises as a plain JSON array.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryList<T> {
    items: Vec<T>,
    next_id: u64,
}

impl<T> Default for EntryList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T: Entry> EntryList<T> {
    /// Builds a list from entries that already carry identifiers, e.g. ones
    /// echoed back by the API. Entries without one get a fresh identifier.
    pub fn from_entries(entries: Vec<T>) -> Self {
        let mut next_id = entries.iter().map(|e| e.id().0).max().unwrap_or(0) + 1;
        let items = entries
            .into_iter()
            .map(|e| {
                if e.id() == EntryId::UNASSIGNED {
                    let id = EntryId(next_id);
                    next_id += 1;
                    e.with_id(id)
                } else {
                    e
                }
            })
            .collect();
        Self { items, next_id }
    }

    /// Returns a new list with `entry` appended under a freshly generated id.
    pub fn with_added(mut self, entry: T) -> (Self, EntryId) {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.items.push(entry.with_id(id));
        (self, id)
    }

    /// Returns a new list without the entry identified by `id`.
    /// Unknown ids leave the list unchanged.
    pub fn without(mut self, id: EntryId) -> Self {
        self.items.retain(|e| e.id() != id);
        self
    }

    pub fn get(&self, id: EntryId) -> Option<&T> {
        self.items.iter().find(|e| e.id() == id)
    }
}

impl<T> EntryList<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a EntryList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Serialize> Serialize for EntryList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de> + Entry> Deserialize<'de> for EntryList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(EntryList::from_entries)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub id: EntryId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    /// Ongoing position; `end_date` is ignored when set.
    pub current: bool,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub id: EntryId,
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(alias = "gpa")]
    pub score: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    pub id: EntryId,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub url: String,
}

impl Default for EntryId {
    fn default() -> Self {
        EntryId::UNASSIGNED
    }
}

macro_rules! impl_entry {
    ($($ty:ty),*) => {
        $(impl Entry for $ty {
            fn id(&self) -> EntryId {
                self.id
            }

            fn with_id(mut self, id: EntryId) -> Self {
                self.id = id;
                self
            }
        })*
    };
}

impl_entry!(ExperienceEntry, EducationEntry, ProjectEntry);

/// The in-progress resume edited by the wizard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Draft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub website: String,
    pub summary: String,
    pub experience: EntryList<ExperienceEntry>,
    pub education: EntryList<EducationEntry>,
    /// Free text; duplicates are kept.
    pub skills: Vec<String>,
    pub projects: EntryList<ProjectEntry>,
}

#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("Unknown field: {0}")]
    Unknown(String),
}

/// Draft fields editable through `update_field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    FirstName,
    LastName,
    Email,
    Phone,
    Location,
    Linkedin,
    Website,
    Summary,
    Skills,
}

impl DraftField {
    pub const ALL: [DraftField; 9] = [
        DraftField::FirstName,
        DraftField::LastName,
        DraftField::Email,
        DraftField::Phone,
        DraftField::Location,
        DraftField::Linkedin,
        DraftField::Website,
        DraftField::Summary,
        DraftField::Skills,
    ];

    /// Name used in forms and in the persisted payload.
    pub fn as_str(self) -> &'static str {
        match self {
            DraftField::FirstName => "firstName",
            DraftField::LastName => "lastName",
            DraftField::Email => "email",
            DraftField::Phone => "phone",
            DraftField::Location => "location",
            DraftField::Linkedin => "linkedin",
            DraftField::Website => "website",
            DraftField::Summary => "summary",
            DraftField::Skills => "skills",
        }
    }
}

impl FromStr for DraftField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "firstName" | "first_name" => Ok(DraftField::FirstName),
            "lastName" | "last_name" => Ok(DraftField::LastName),
            "email" => Ok(DraftField::Email),
            "phone" => Ok(DraftField::Phone),
            "location" => Ok(DraftField::Location),
            "linkedin" => Ok(DraftField::Linkedin),
            "website" => Ok(DraftField::Website),
            "summary" => Ok(DraftField::Summary),
            "skills" => Ok(DraftField::Skills),
            other => Err(FieldError::Unknown(other.to_string())),
        }
    }
}

impl Draft {
    /// Replaces one field. List-valued fields take a comma separated string.
    pub fn set_field(&mut self, field: DraftField, value: &str) {
        let slot = match field {
            DraftField::FirstName => &mut self.first_name,
            DraftField::LastName => &mut self.last_name,
            DraftField::Email => &mut self.email,
            DraftField::Phone => &mut self.phone,
            DraftField::Location => &mut self.location,
            DraftField::Linkedin => &mut self.linkedin,
            DraftField::Website => &mut self.website,
            DraftField::Summary => &mut self.summary,
            DraftField::Skills => {
                self.skills = parse_comma_list(value);
                return;
            }
        };
        *slot = value.to_string();
    }

    /// Current value of a field in its form representation.
    pub fn field_value(&self, field: DraftField) -> String {
        match field {
            DraftField::FirstName => self.first_name.clone(),
            DraftField::LastName => self.last_name.clone(),
            DraftField::Email => self.email.clone(),
            DraftField::Phone => self.phone.clone(),
            DraftField::Location => self.location.clone(),
            DraftField::Linkedin => self.linkedin.clone(),
            DraftField::Website => self.website.clone(),
            DraftField::Summary => self.summary.clone(),
            DraftField::Skills => self.skills.join(", "),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Splits a comma separated string into trimmed, non-empty items.
pub fn parse_comma_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
