use std::collections::HashMap;

use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use tracing::{info, warn};

use crate::auth::guard::CurrentUser;
use crate::errors::AppError;
use crate::onboarding::{OnboardingForm, STEP_COUNT};
use crate::state::AppState;
use crate::views::{Banner, BannerKind};

const ONBOARDING_PATH: &str = "/onboarding";

#[derive(Template)]
#[template(path = "onboarding.html")]
struct OnboardingPage<'a> {
    form: &'a OnboardingForm,
    step_count: u8,
    percent: u8,
    banners: Vec<Banner>,
    default_action: &'static str,
    ready: bool,
    url_name: &'a str,
}

/// Every submit button stays enabled so Enter always submits; the handler
/// rejects an incomplete step and `ready` only styles the primary action.
pub fn onboarding_page(form: &OnboardingForm) -> askama::Result<String> {
    let first_step = form.step() == 1;
    let username = form.username().trim();
    OnboardingPage {
        form,
        step_count: STEP_COUNT,
        percent: form.progress_percent(),
        banners: form
            .error()
            .map(|e| Banner::new(BannerKind::Error, e))
            .into_iter()
            .collect(),
        default_action: if first_step { "next" } else { "submit" },
        ready: if first_step { form.can_advance() } else { form.can_submit() },
        url_name: if username.is_empty() { "username" } else { username },
    }
    .render()
}

/// GET /onboarding
pub async fn show_onboarding(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<Html<String>, AppError> {
    let html = state
        .sessions
        .with_onboarding(&session.access_token, |form| onboarding_page(form))?;
    Ok(Html(html))
}

/// POST /onboarding
pub async fn handle_onboarding(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Form(input): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let key = session.access_token.as_str();
    let action = input.get("action").map(String::as_str).unwrap_or("");

    let update = state.sessions.with_onboarding(key, |form| {
        if let Some(name) = input.get("name") {
            form.set_name(name);
        }
        if let Some(username) = input.get("username") {
            form.set_username(username);
        }
        match action {
            "next" => {
                form.go_next();
                Ok(None)
            }
            "previous" => {
                form.go_previous();
                Ok(None)
            }
            "submit" => match form.profile_update() {
                Ok(update) => Ok(Some(update)),
                Err(message) => {
                    form.set_error(message);
                    Ok(None)
                }
            },
            "" => Ok(None),
            other => Err(AppError::Validation(format!("Unknown action: {other}"))),
        }
    })?;

    let Some(update) = update else {
        return Ok(Redirect::to(ONBOARDING_PATH).into_response());
    };

    let user_id = session.user_id.to_string();
    let result = state.gateway.update_profile(&user_id, &update, Some(key)).await;
    if result.success {
        info!("Onboarding completed for user {}", user_id);
        state.sessions.clear_onboarding(key);
        return Ok(Redirect::to("/home").into_response());
    }

    let message = result
        .message
        .unwrap_or_else(|| "Failed to update profile".to_string());
    warn!("Onboarding failed for user {}: {}", user_id, message);
    state
        .sessions
        .with_onboarding(key, |form| form.set_error(message));
    Ok(Redirect::to(ONBOARDING_PATH).into_response())
}
