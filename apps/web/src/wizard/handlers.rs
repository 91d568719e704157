//! Axum route handlers for the resume builder.
//!
//! Every UI event is a POST to `/resume/create` carrying the current step's
//! inputs plus an `action`. Field edits are applied first, then the action,
//! then the browser is redirected back to the page.

use std::collections::HashMap;
use std::str::FromStr;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use tracing::{debug, info};

use crate::auth::guard::CurrentUser;
use crate::errors::AppError;
use crate::state::AppState;
use crate::wizard::controller::{self, SubmitIntent, WizardController};
use crate::wizard::draft::{
    parse_comma_list, DraftField, EducationEntry, EntryId, ExperienceEntry, ProjectEntry,
};
use crate::wizard::render::{wizard_page, EntryKind, ENTRY_PREFIX};
use crate::wizard::steps::Step;

const WIZARD_PATH: &str = "/resume/create";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardAction {
    /// Only apply field edits.
    Update,
    Next,
    Previous,
    GoTo(Step),
    TogglePreview,
    Add(EntryKind),
    Remove(EntryKind, EntryId),
    Submit(SubmitIntent),
    Discard,
}

impl FromStr for WizardAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::Validation(format!("Unknown action: {s}"));
        let kinds = [EntryKind::Experience, EntryKind::Education, EntryKind::Project];

        let action = match s {
            "" | "update" => WizardAction::Update,
            "next" => WizardAction::Next,
            "previous" => WizardAction::Previous,
            "toggle_preview" => WizardAction::TogglePreview,
            "save" => WizardAction::Submit(SubmitIntent::SaveDraft),
            "publish" => WizardAction::Submit(SubmitIntent::Publish),
            "discard" => WizardAction::Discard,
            other => {
                if let Some(index) = other.strip_prefix("goto:") {
                    let step = index
                        .parse()
                        .ok()
                        .and_then(Step::from_index)
                        .ok_or_else(invalid)?;
                    WizardAction::GoTo(step)
                } else if let Some(kind) = kinds.iter().find(|k| k.add_action() == other) {
                    WizardAction::Add(*kind)
                } else {
                    let (name, id) = other.split_once(':').ok_or_else(invalid)?;
                    let kind = kinds
                        .iter()
                        .find(|k| k.remove_action() == name)
                        .ok_or_else(invalid)?;
                    WizardAction::Remove(*kind, id.parse().map_err(|_| invalid())?)
                }
            }
        };
        Ok(action)
    }
}

fn entry_value(form: &HashMap<String, String>, name: &str) -> String {
    form.get(&format!("{ENTRY_PREFIX}{name}"))
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

fn experience_from_form(form: &HashMap<String, String>) -> ExperienceEntry {
    ExperienceEntry {
        title: entry_value(form, "title"),
        company: entry_value(form, "company"),
        location: entry_value(form, "location"),
        start_date: entry_value(form, "startDate"),
        end_date: entry_value(form, "endDate"),
        current: !entry_value(form, "current").is_empty(),
        description: entry_value(form, "description"),
        ..Default::default()
    }
}

fn education_from_form(form: &HashMap<String, String>) -> EducationEntry {
    EducationEntry {
        degree: entry_value(form, "degree"),
        institution: entry_value(form, "institution"),
        location: entry_value(form, "location"),
        start_date: entry_value(form, "startDate"),
        end_date: entry_value(form, "endDate"),
        score: entry_value(form, "score"),
        description: entry_value(form, "description"),
        ..Default::default()
    }
}

fn project_from_form(form: &HashMap<String, String>) -> ProjectEntry {
    ProjectEntry {
        title: entry_value(form, "title"),
        description: entry_value(form, "description"),
        technologies: parse_comma_list(&entry_value(form, "technologies")),
        url: entry_value(form, "url"),
        ..Default::default()
    }
}

/// Applies form edits and a non-terminal action. Returns the submission to
/// send when the action was save or publish. Any event retires the previous
/// save or publish notice.
fn apply_event(
    wizard: &mut WizardController,
    action: WizardAction,
    form: &HashMap<String, String>,
) -> Result<Option<SubmitIntent>, AppError> {
    wizard.clear_notice();
    for (name, value) in form {
        if let Ok(field) = name.parse::<DraftField>() {
            wizard.set_field(field, value);
        }
    }

    match action {
        WizardAction::Update => {}
        WizardAction::Next => {
            wizard.advance();
        }
        WizardAction::Previous => {
            wizard.go_previous();
        }
        WizardAction::GoTo(step) => {
            wizard.go_to(step);
        }
        WizardAction::TogglePreview => {
            wizard.toggle_preview();
        }
        WizardAction::Add(EntryKind::Experience) => {
            wizard.add_experience(experience_from_form(form));
        }
        WizardAction::Add(EntryKind::Education) => {
            wizard.add_education(education_from_form(form));
        }
        WizardAction::Add(EntryKind::Project) => {
            wizard.add_project(project_from_form(form));
        }
        WizardAction::Remove(EntryKind::Experience, id) => wizard.remove_experience(id),
        WizardAction::Remove(EntryKind::Education, id) => wizard.remove_education(id),
        WizardAction::Remove(EntryKind::Project, id) => wizard.remove_project(id),
        WizardAction::Submit(intent) => {
            wizard.ensure_review(intent.label())?;
            return Ok(Some(intent));
        }
        WizardAction::Discard => wizard.ensure_review("Discard")?,
    }
    Ok(None)
}

/// GET /resume/create
pub async fn show_wizard(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<Html<String>, AppError> {
    let html = state
        .sessions
        .with_wizard(&session.access_token, |wizard| wizard_page(&session, wizard))?;
    Ok(Html(html))
}

/// POST /resume/create
pub async fn handle_wizard_event(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let action: WizardAction = form.get("action").map(String::as_str).unwrap_or("").parse()?;
    let key = session.access_token.as_str();
    debug!("Wizard event {:?} for user {}", action, session.user_id);

    let intent = state
        .sessions
        .with_wizard(key, |wizard| apply_event(wizard, action, &form))?;

    if action == WizardAction::Discard {
        if let Some(wizard) = state.sessions.take_wizard(key) {
            wizard.discard();
        }
        return Ok(Redirect::to("/home").into_response());
    }

    if let Some(intent) = intent {
        let result =
            controller::submit(&state.sessions, key, state.gateway.as_ref(), intent).await?;
        info!(
            "Resume {:?} for user {} finished: success={}",
            intent, session.user_id, result.success
        );
    }

    Ok(Redirect::to(WIZARD_PATH).into_response())
}
