//! Read-only set of resumes shown on the dashboard before the resume API
//! serves listings.

use chrono::NaiveDate;

use crate::models::resume::{ResumeRecord, ResumeStatus};
use crate::wizard::draft::{Draft, EducationEntry, EntryList, ExperienceEntry};

#[derive(Debug, Clone, Default)]
pub struct ResumeCatalog {
    records: Vec<ResumeRecord>,
}

impl ResumeCatalog {
    pub fn from_records(records: Vec<ResumeRecord>) -> Self {
        Self { records }
    }

    /// The three resumes every account starts with.
    pub fn sample() -> Self {
        let seed = [
            ("1", "Software Engineer Resume", ResumeStatus::Draft, (2024, 1, 15), (2024, 1, 10)),
            ("2", "Product Manager Resume", ResumeStatus::Published, (2024, 1, 10), (2024, 1, 5)),
            ("3", "Data Scientist Resume", ResumeStatus::Draft, (2024, 1, 5), (2024, 1, 1)),
        ];

        let records = seed
            .into_iter()
            .filter_map(|(id, title, status, updated, created)| {
                Some(ResumeRecord {
                    id: id.to_string(),
                    title: title.to_string(),
                    status,
                    updated_at: NaiveDate::from_ymd_opt(updated.0, updated.1, updated.2)?,
                    created_at: NaiveDate::from_ymd_opt(created.0, created.1, created.2)?,
                    content: sample_content(),
                })
            })
            .collect();
        Self::from_records(records)
    }

    pub fn list(&self) -> &[ResumeRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&ResumeRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}

fn sample_content() -> Draft {
    let experience = EntryList::from_entries(vec![
        ExperienceEntry {
            title: "Senior Software Engineer".to_string(),
            company: "Tech Company".to_string(),
            start_date: "2022".to_string(),
            current: true,
            description: "Led development of key features, mentored junior developers, \
                          and improved system performance by 40%."
                .to_string(),
            ..Default::default()
        },
        ExperienceEntry {
            title: "Software Engineer".to_string(),
            company: "Startup Inc".to_string(),
            start_date: "2020".to_string(),
            end_date: "2022".to_string(),
            description: "Built scalable web applications using React, Node.js, and PostgreSQL."
                .to_string(),
            ..Default::default()
        },
    ]);
    let education = EntryList::from_entries(vec![EducationEntry {
        degree: "Bachelor of Science in Computer Science".to_string(),
        institution: "University of Technology".to_string(),
        start_date: "2016".to_string(),
        end_date: "2020".to_string(),
        ..Default::default()
    }]);

    Draft {
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        email: "john.doe@example.com".to_string(),
        phone: "(555) 123-4567".to_string(),
        location: "San Francisco, CA".to_string(),
        experience,
        education,
        skills: ["JavaScript", "React", "Node.js", "Python", "PostgreSQL", "AWS", "Docker", "Git"]
            .into_iter()
            .map(String::from)
            .collect(),
        ..Default::default()
    }
}
