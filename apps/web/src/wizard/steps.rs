use serde::{Deserialize, Serialize};

/// The fixed, ordered catalog of resume builder steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Personal,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Review,
}

impl Step {
    pub const ALL: [Step; 7] = [
        Step::Personal,
        Step::Summary,
        Step::Experience,
        Step::Education,
        Step::Skills,
        Step::Projects,
        Step::Review,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub const FIRST: Step = Step::Personal;
    pub const LAST: Step = Step::Review;

    /// 1-based position in the catalog.
    pub fn index(self) -> usize {
        match self {
            Step::Personal => 1,
            Step::Summary => 2,
            Step::Experience => 3,
            Step::Education => 4,
            Step::Skills => 5,
            Step::Projects => 6,
            Step::Review => 7,
        }
    }

    pub fn from_index(index: usize) -> Option<Step> {
        index
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Personal => "Personal Information",
            Step::Summary => "Professional Summary",
            Step::Experience => "Experience",
            Step::Education => "Education",
            Step::Skills => "Skills",
            Step::Projects => "Projects",
            Step::Review => "Review & Save",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Step::Personal => "personal",
            Step::Summary => "summary",
            Step::Experience => "experience",
            Step::Education => "education",
            Step::Skills => "skills",
            Step::Projects => "projects",
            Step::Review => "review",
        }
    }

    pub fn next(self) -> Option<Step> {
        Step::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Step> {
        Step::from_index(self.index() - 1)
    }

    pub fn is_last(self) -> bool {
        self == Self::LAST
    }
}
