//! Wizard state machine: owns the current step, the draft and the submit flag.
//!
//! Pure state transitions live here so they can be exercised without any
//! HTTP plumbing. The only async surface is `submit`, which drives a wizard
//! held in the `SessionStore` through the persistence gateway.

use thiserror::Error;
use tracing::{info, warn};

use crate::gateway::{ApiResult, ResumeGateway};
use crate::models::resume::{ResumePayload, ResumeStatus};
use crate::sessions::SessionStore;
use crate::wizard::draft::{
    Draft, DraftField, EducationEntry, EntryId, ExperienceEntry, FieldError, ProjectEntry,
};
use crate::wizard::steps::Step;

#[derive(Debug, Error, PartialEq)]
pub enum WizardError {
    #[error("{0} is only available on the review step")]
    NotOnReview(&'static str),

    #[error(transparent)]
    Field(#[from] FieldError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitIntent {
    SaveDraft,
    Publish,
}

impl SubmitIntent {
    pub fn status(self) -> ResumeStatus {
        match self {
            SubmitIntent::SaveDraft => ResumeStatus::Draft,
            SubmitIntent::Publish => ResumeStatus::Published,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SubmitIntent::SaveDraft => "Save",
            SubmitIntent::Publish => "Publish",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Outcome message shown above the review step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

/// An in-flight save or publish: the intent plus the full draft snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub intent: SubmitIntent,
    pub payload: ResumePayload,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WizardController {
    current_step: Step,
    draft: Draft,
    busy: bool,
    preview_visible: bool,
    notice: Option<Notice>,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new(Draft::default())
    }
}

impl WizardController {
    pub fn new(draft: Draft) -> Self {
        Self {
            current_step: Step::FIRST,
            draft,
            busy: false,
            preview_visible: false,
            notice: None,
        }
    }

    pub fn current_step(&self) -> Step {
        self.current_step
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn preview_visible(&self) -> bool {
        self.preview_visible
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    // ── Navigation ─────────────────────────────────────────────────────────

    /// Moves one step forward; no-op on the last step.
    pub fn go_next(&mut self) -> Step {
        if let Some(next) = self.current_step.next() {
            self.current_step = next;
        }
        self.current_step
    }

    /// Moves one step back; no-op on the first step.
    pub fn go_previous(&mut self) -> Step {
        if let Some(previous) = self.current_step.previous() {
            self.current_step = previous;
        }
        self.current_step
    }

    /// Whether the Next control is enabled for the current step.
    pub fn can_advance(&self) -> bool {
        !self.current_step.is_last() && missing_required(self.current_step, &self.draft).is_none()
    }

    /// `go_next` gated by `can_advance`. Returns whether the step changed.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        let before = self.current_step;
        self.go_next() != before
    }

    /// Jumps to `target`. Going back is always allowed; going forward is
    /// refused when a step in between still misses a required field.
    pub fn go_to(&mut self, target: Step) -> bool {
        if target.index() > self.current_step.index() {
            let blocked = Step::ALL[self.current_step.index() - 1..target.index() - 1]
                .iter()
                .any(|step| missing_required(*step, &self.draft).is_some());
            if blocked {
                return false;
            }
        }
        self.current_step = target;
        true
    }

    /// Message explaining why Next is disabled, if it is.
    pub fn blocking_reason(&self) -> Option<&'static str> {
        missing_required(self.current_step, &self.draft)
    }

    // ── Editing ────────────────────────────────────────────────────────────

    pub fn update_field(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        let field: DraftField = name.parse()?;
        self.set_field(field, value);
        Ok(())
    }

    pub fn set_field(&mut self, field: DraftField, value: &str) {
        self.draft.set_field(field, value);
    }

    pub fn add_experience(&mut self, entry: ExperienceEntry) -> EntryId {
        let (list, id) = std::mem::take(&mut self.draft.experience).with_added(entry);
        self.draft.experience = list;
        id
    }

    pub fn remove_experience(&mut self, id: EntryId) {
        self.draft.experience = std::mem::take(&mut self.draft.experience).without(id);
    }

    pub fn add_education(&mut self, entry: EducationEntry) -> EntryId {
        let (list, id) = std::mem::take(&mut self.draft.education).with_added(entry);
        self.draft.education = list;
        id
    }

    pub fn remove_education(&mut self, id: EntryId) {
        self.draft.education = std::mem::take(&mut self.draft.education).without(id);
    }

    pub fn add_project(&mut self, entry: ProjectEntry) -> EntryId {
        let (list, id) = std::mem::take(&mut self.draft.projects).with_added(entry);
        self.draft.projects = list;
        id
    }

    pub fn remove_project(&mut self, id: EntryId) {
        self.draft.projects = std::mem::take(&mut self.draft.projects).without(id);
    }

    pub fn toggle_preview(&mut self) -> bool {
        self.preview_visible = !self.preview_visible;
        self.preview_visible
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    // ── Terminal actions ───────────────────────────────────────────────────

    pub fn ensure_review(&self, action: &'static str) -> Result<(), WizardError> {
        if self.current_step.is_last() {
            Ok(())
        } else {
            Err(WizardError::NotOnReview(action))
        }
    }

    /// Marks the wizard busy and snapshots the complete draft for submission.
    /// Overlapping submissions are not serialised.
    pub fn begin_submit(&mut self, intent: SubmitIntent) -> Result<Submission, WizardError> {
        self.ensure_review(intent.label())?;
        self.busy = true;
        self.notice = None;

        info!(
            "{} resume: name='{}', experience={}, education={}, projects={}, skills={}",
            intent.label(),
            self.draft.full_name(),
            self.draft.experience.len(),
            self.draft.education.len(),
            self.draft.projects.len(),
            self.draft.skills.len()
        );

        Ok(Submission {
            intent,
            payload: ResumePayload {
                status: intent.status(),
                content: self.draft.clone(),
            },
        })
    }

    /// Clears the busy flag and records a visible notice for the outcome.
    pub fn finish_submit(&mut self, intent: SubmitIntent, result: &ApiResult) {
        self.busy = false;
        self.notice = Some(if result.success {
            Notice {
                kind: NoticeKind::Success,
                text: match intent {
                    SubmitIntent::SaveDraft => "Resume saved as draft.".to_string(),
                    SubmitIntent::Publish => "Resume published.".to_string(),
                },
            }
        } else {
            let reason = result
                .message
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string());
            Notice {
                kind: NoticeKind::Error,
                text: match intent {
                    SubmitIntent::SaveDraft => format!("Could not save draft: {reason}"),
                    SubmitIntent::Publish => format!("Could not publish resume: {reason}"),
                },
            }
        });
    }

    /// Abandons the draft. There is no confirmation step.
    pub fn discard(self) -> Draft {
        info!("Discarding resume draft '{}'", self.draft.full_name());
        self.draft
    }
}

// ── Submission ─────────────────────────────────────────────────────────────

pub const CANCELLED_MESSAGE: &str = "Request was cancelled";

/// Settles an in-flight submission as failed if it is dropped before the
/// gateway answers, so the wizard never stays busy.
struct InFlight<'a> {
    sessions: &'a SessionStore,
    key: &'a str,
    intent: SubmitIntent,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, result: &ApiResult) {
        self.settled = true;
        self.sessions
            .with_existing_wizard(self.key, |wizard| wizard.finish_submit(self.intent, result));
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!("{} was cancelled before the gateway answered", self.intent.label());
        let cancelled = ApiResult::failure(CANCELLED_MESSAGE);
        self.sessions
            .with_existing_wizard(self.key, |wizard| wizard.finish_submit(self.intent, &cancelled));
    }
}

/// Saves or publishes the wizard stored under `key`, using `key` as the
/// bearer token. The wizard lock is released while the gateway call is
/// pending, and a discard in the meantime drops the outcome.
pub async fn submit(
    sessions: &SessionStore,
    key: &str,
    gateway: &dyn ResumeGateway,
    intent: SubmitIntent,
) -> Result<ApiResult, WizardError> {
    let submission = sessions.with_wizard(key, |wizard| wizard.begin_submit(intent))?;
    let in_flight = InFlight {
        sessions,
        key,
        intent: submission.intent,
        settled: false,
    };
    let result = gateway.submit_resume(&submission.payload, Some(key)).await;
    in_flight.settle(&result);
    Ok(result)
}

/// Per-step required-field rule. Only the personal step is gated.
fn missing_required(step: Step, draft: &Draft) -> Option<&'static str> {
    match step {
        Step::Personal if draft.first_name.trim().is_empty() => Some("First name is required"),
        _ => None,
    }
}
