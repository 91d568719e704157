//! Login, registration and logout pages.
//!
//! Validation and provider failures are reported by redirecting back to the
//! originating form with the message in `?error=`.

use askama::Template;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::guard::{cleared_session_cookie, session_cookie, session_token};
use crate::auth::validation::{validate_login, validate_signup, Credentials};
use crate::errors::AppError;
use crate::state::AppState;
use crate::views::{flash_banners, Banner};

pub const CONFIRM_EMAIL_MESSAGE: &str = "Please check your email to confirm your account";
pub const SIGNUP_FALLBACK_ERROR: &str = "Something went wrong during signup";

/// `?error=` / `?message=` carried across redirects.
#[derive(Debug, Default, Deserialize)]
pub struct Flash {
    pub error: Option<String>,
    pub message: Option<String>,
}

fn redirect_with(path: &str, key: &str, text: &str) -> Redirect {
    Redirect::to(&format!("{path}?{key}={}", urlencoding::encode(text)))
}

fn signed_in(state: &AppState, token: &str, to: &str) -> Response {
    (
        [(header::SET_COOKIE, session_cookie(token, state.config.cookie_secure))],
        Redirect::to(to),
    )
        .into_response()
}

#[derive(Template)]
#[template(path = "credentials.html")]
struct CredentialsPage<'a> {
    title: &'a str,
    action: &'a str,
    submit: &'a str,
    banners: Vec<Banner>,
    switch_prompt: &'a str,
    switch_href: &'a str,
    switch_label: &'a str,
}

/// GET /login
pub async fn login_page(Query(flash): Query<Flash>) -> Result<Html<String>, AppError> {
    let page = CredentialsPage {
        title: "Sign In",
        action: "/login",
        submit: "Sign In",
        banners: flash_banners(flash.error.as_deref(), flash.message.as_deref()),
        switch_prompt: "Don't have an account?",
        switch_href: "/register",
        switch_label: "Sign up",
    };
    Ok(Html(page.render()?))
}

/// GET /register
pub async fn register_page(Query(flash): Query<Flash>) -> Result<Html<String>, AppError> {
    let page = CredentialsPage {
        title: "Create Account",
        action: "/register",
        submit: "Sign Up",
        banners: flash_banners(flash.error.as_deref(), flash.message.as_deref()),
        switch_prompt: "Already have an account?",
        switch_href: "/login",
        switch_label: "Sign in",
    };
    Ok(Html(page.render()?))
}

/// POST /login
pub async fn login(State(state): State<AppState>, Form(credentials): Form<Credentials>) -> Response {
    if let Err(errors) = validate_login(&credentials) {
        return redirect_with("/login", "error", &errors).into_response();
    }

    match state
        .auth
        .sign_in(credentials.email.trim(), &credentials.password)
        .await
    {
        Ok(session) => {
            info!("User {} signed in", session.user_id);
            signed_in(&state, &session.access_token, "/home")
        }
        Err(e) => {
            warn!("Sign in failed: {e}");
            redirect_with("/login", "error", &e.to_string()).into_response()
        }
    }
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Form(credentials): Form<Credentials>,
) -> Response {
    if let Err(errors) = validate_signup(&credentials) {
        return redirect_with("/register", "error", &errors).into_response();
    }

    let outcome = match state
        .auth
        .sign_up(credentials.email.trim(), &credentials.password)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Sign up failed: {e}");
            return redirect_with("/register", "error", &e.to_string()).into_response();
        }
    };

    match (outcome.user, outcome.session) {
        (_, Some(session)) => {
            info!("User {} signed up", session.user_id);
            signed_in(&state, &session.access_token, "/onboarding")
        }
        (Some(user), None) => {
            info!("User {} signed up, awaiting email confirmation", user.id);
            redirect_with("/register", "message", CONFIRM_EMAIL_MESSAGE).into_response()
        }
        (None, None) => redirect_with("/register", "error", SIGNUP_FALLBACK_ERROR).into_response(),
    }
}

/// POST /logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        if let Err(e) = state.auth.sign_out(&token).await {
            warn!("Sign out failed: {e}");
            return redirect_with("/home", "error", &e.to_string()).into_response();
        }
        state.sessions.end_session(&token);
    }

    (
        [(
            header::SET_COOKIE,
            cleared_session_cookie(state.config.cookie_secure),
        )],
        Redirect::to("/"),
    )
        .into_response()
}
