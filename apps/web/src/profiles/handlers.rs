use askama::Template;
use axum::{
    extract::Path,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::debug;

use crate::errors::AppError;
use crate::models::profile::PublicProfile;
use crate::profiles::{is_valid_username, sample_profile};
use crate::views;

#[derive(Template)]
#[template(path = "profile.html")]
struct ProfilePage<'a> {
    profile: &'a PublicProfile,
}

pub fn profile_page(profile: &PublicProfile) -> askama::Result<String> {
    ProfilePage { profile }.render()
}

/// GET /:username
pub async fn public_profile(Path(username): Path<String>) -> Result<Response, AppError> {
    if !is_valid_username(&username) {
        debug!("Rejected profile lookup for '{}'", username);
        let html = views::not_found(
            "User Not Found",
            "The profile you're looking for doesn't exist.",
            "/",
            "Back to Home",
        )?;
        return Ok((StatusCode::NOT_FOUND, Html(html)).into_response());
    }
    Ok(Html(profile_page(&sample_profile(&username))?).into_response())
}
