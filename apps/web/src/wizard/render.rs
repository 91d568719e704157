//! Step renderer and preview renderer.
//!
//! `render_step` and `render_preview` are pure functions from wizard state
//! to view models. The templates under `templates/` turn those models into
//! markup.

use std::cmp::Ordering;

use askama::Template;

use crate::models::user::Session;
use crate::views::{Banner, BannerKind};
use crate::wizard::controller::{NoticeKind, WizardController};
use crate::wizard::draft::{Draft, DraftField, EntryId};
use crate::wizard::steps::Step;

/// Prefix for the "new entry" inputs of list steps, so they never collide
/// with draft field names.
pub const ENTRY_PREFIX: &str = "entry.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    TextArea,
    Checkbox,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub name: String,
    pub label: &'static str,
    pub value: String,
    pub placeholder: &'static str,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Experience,
    Education,
    Project,
}

impl EntryKind {
    pub fn add_action(self) -> &'static str {
        match self {
            EntryKind::Experience => "add_experience",
            EntryKind::Education => "add_education",
            EntryKind::Project => "add_project",
        }
    }

    pub fn remove_action(self) -> &'static str {
        match self {
            EntryKind::Experience => "remove_experience",
            EntryKind::Education => "remove_education",
            EntryKind::Project => "remove_project",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            EntryKind::Experience => "Work Experience",
            EntryKind::Education => "Education",
            EntryKind::Project => "Projects",
        }
    }

    fn add_label(self) -> &'static str {
        match self {
            EntryKind::Experience => "Add Experience",
            EntryKind::Education => "Add Education",
            EntryKind::Project => "Add Project",
        }
    }

    fn empty_noun(self) -> &'static str {
        match self {
            EntryKind::Experience => "experience",
            EntryKind::Education => "education",
            EntryKind::Project => "projects",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryCard {
    pub id: EntryId,
    pub heading: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntrySection {
    pub kind: EntryKind,
    pub cards: Vec<EntryCard>,
    pub new_entry: Vec<FieldView>,
}

impl EntrySection {
    pub fn empty_message(&self) -> String {
        format!(
            "No {} added yet. Click \"{}\" to get started.",
            self.kind.empty_noun(),
            self.kind.add_label()
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepBody {
    Fields(Vec<FieldView>),
    Entries(EntrySection),
    Review,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepView {
    pub step: Step,
    pub body: StepBody,
}

fn draft_field(
    draft: &Draft,
    field: DraftField,
    label: &'static str,
    placeholder: &'static str,
    kind: FieldKind,
) -> FieldView {
    FieldView {
        name: field.as_str().to_string(),
        label,
        value: draft.field_value(field),
        placeholder,
        kind,
    }
}

fn entry_field(name: &str, label: &'static str, placeholder: &'static str, kind: FieldKind) -> FieldView {
    FieldView {
        name: format!("{ENTRY_PREFIX}{name}"),
        label,
        value: String::new(),
        placeholder,
        kind,
    }
}

/// Fields and controls for `step`, filled from `draft`.
pub fn render_step(step: Step, draft: &Draft) -> StepView {
    use FieldKind::*;

    let body = match step {
        Step::Personal => StepBody::Fields(vec![
            draft_field(draft, DraftField::FirstName, "First Name", "John", Text),
            draft_field(draft, DraftField::LastName, "Last Name", "Doe", Text),
            draft_field(draft, DraftField::Email, "Email", "john.doe@example.com", Email),
            draft_field(draft, DraftField::Phone, "Phone", "(555) 123-4567", Text),
            draft_field(draft, DraftField::Location, "Location", "San Francisco, CA", Text),
            draft_field(draft, DraftField::Linkedin, "LinkedIn", "linkedin.com/in/johndoe", Text),
            draft_field(draft, DraftField::Website, "Website", "johndoe.com", Text),
        ]),
        Step::Summary => StepBody::Fields(vec![draft_field(
            draft,
            DraftField::Summary,
            "Professional Summary",
            "Experienced software developer with a passion for creating innovative solutions...",
            TextArea,
        )]),
        Step::Skills => StepBody::Fields(vec![draft_field(
            draft,
            DraftField::Skills,
            "Skills (comma separated)",
            "JavaScript, React, Node.js, Python",
            Text,
        )]),
        Step::Experience => StepBody::Entries(EntrySection {
            kind: EntryKind::Experience,
            cards: draft
                .experience
                .iter()
                .map(|e| EntryCard {
                    id: e.id,
                    heading: e.title.clone(),
                    detail: e.company.clone(),
                })
                .collect(),
            new_entry: vec![
                entry_field("title", "Job Title", "Software Engineer", Text),
                entry_field("company", "Company", "Acme Corp", Text),
                entry_field("location", "Location", "San Francisco, CA", Text),
                entry_field("startDate", "Start Date", "2021-01", Text),
                entry_field("endDate", "End Date", "2023-06", Text),
                entry_field("current", "I currently work here", "", Checkbox),
                entry_field("description", "Description", "What you built and its impact", TextArea),
            ],
        }),
        Step::Education => StepBody::Entries(EntrySection {
            kind: EntryKind::Education,
            cards: draft
                .education
                .iter()
                .map(|e| EntryCard {
                    id: e.id,
                    heading: e.degree.clone(),
                    detail: e.institution.clone(),
                })
                .collect(),
            new_entry: vec![
                entry_field("degree", "Degree", "B.S. Computer Science", Text),
                entry_field("institution", "Institution", "State University", Text),
                entry_field("location", "Location", "Boston, MA", Text),
                entry_field("startDate", "Start Date", "2015-09", Text),
                entry_field("endDate", "End Date", "2019-05", Text),
                entry_field("score", "GPA / Score", "3.8", Text),
                entry_field("description", "Description", "Honors, coursework, activities", TextArea),
            ],
        }),
        Step::Projects => StepBody::Entries(EntrySection {
            kind: EntryKind::Project,
            cards: draft
                .projects
                .iter()
                .map(|p| EntryCard {
                    id: p.id,
                    heading: p.title.clone(),
                    detail: p.description.clone(),
                })
                .collect(),
            new_entry: vec![
                entry_field("title", "Project Title", "Open source CLI", Text),
                entry_field("description", "Description", "What it does", TextArea),
                entry_field("technologies", "Technologies (comma separated)", "Rust, Tokio", Text),
                entry_field("url", "URL", "github.com/you/project", Text),
            ],
        }),
        Step::Review => StepBody::Review,
    };

    StepView { step, body }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewExperience {
    pub title: String,
    pub company: String,
    pub description: String,
}

/// Read-only rendition of the parts of a draft shown in the preview pane.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewView {
    pub name: String,
    pub contact: Vec<String>,
    pub summary: Option<String>,
    pub experience: Vec<PreviewExperience>,
    pub skills: Vec<String>,
}

pub fn render_preview(draft: &Draft) -> PreviewView {
    PreviewView {
        name: draft.full_name(),
        contact: [&draft.email, &draft.phone, &draft.location]
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .collect(),
        summary: Some(draft.summary.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        experience: draft
            .experience
            .iter()
            .map(|e| PreviewExperience {
                title: e.title.clone(),
                company: e.company.clone(),
                description: e.description.clone(),
            })
            .collect(),
        skills: draft.skills.clone(),
    }
}

/// One entry of the step indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressItem {
    pub index: usize,
    pub title: &'static str,
    pub state: &'static str,
}

fn progress_items(current: Step) -> Vec<ProgressItem> {
    Step::ALL
        .iter()
        .map(|step| ProgressItem {
            index: step.index(),
            title: step.title(),
            state: match step.index().cmp(&current.index()) {
                Ordering::Less => "done",
                Ordering::Equal => "current",
                Ordering::Greater => "upcoming",
            },
        })
        .collect()
}

/// Button that handles Enter in any input. List steps add the entry being
/// typed; the review step only applies edits.
fn default_action(view: &StepView) -> &'static str {
    match &view.body {
        StepBody::Fields(_) => "next",
        StepBody::Entries(section) => section.kind.add_action(),
        StepBody::Review => "update",
    }
}

#[derive(Template)]
#[template(path = "wizard.html")]
struct WizardPage<'a> {
    session: &'a Session,
    default_action: &'static str,
    progress: Vec<ProgressItem>,
    banners: Vec<Banner>,
    view: StepView,
    busy: bool,
    first_step: bool,
    last_step: bool,
    hint: Option<&'static str>,
    preview: Option<PreviewView>,
}

/// The complete resume builder page. Next is always submittable; a step
/// that cannot be left yet is flagged with `aria-disabled` and a hint, and
/// the controller refuses to advance.
pub fn wizard_page(session: &Session, wizard: &WizardController) -> askama::Result<String> {
    let step = wizard.current_step();
    let view = render_step(step, wizard.draft());

    let banners = wizard
        .notice()
        .map(|n| {
            let kind = match n.kind {
                NoticeKind::Success => BannerKind::Success,
                NoticeKind::Error => BannerKind::Error,
            };
            Banner::new(kind, n.text.as_str())
        })
        .into_iter()
        .collect();

    WizardPage {
        session,
        default_action: default_action(&view),
        progress: progress_items(step),
        banners,
        busy: wizard.is_busy(),
        first_step: step == Step::FIRST,
        last_step: step.is_last(),
        hint: wizard.blocking_reason(),
        preview: wizard
            .preview_visible()
            .then(|| render_preview(wizard.draft())),
        view,
    }
    .render()
}
