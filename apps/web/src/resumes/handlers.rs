use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::auth::guard::CurrentUser;
use crate::auth::handlers::Flash;
use crate::errors::AppError;
use crate::models::resume::{ResumeRecord, ResumeStatus};
use crate::models::user::Session;
use crate::state::AppState;
use crate::views::{self, flash_banners, Banner};
use crate::wizard::render::{render_preview, PreviewView};

fn last_updated(record: &ResumeRecord) -> String {
    format!("Last updated: {}", record.updated_at.format("%b %-d, %Y"))
}

struct ResumeCard<'a> {
    id: String,
    title: &'a str,
    status: ResumeStatus,
    updated: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardPage<'a> {
    session: &'a Session,
    banners: Vec<Banner>,
    cards: Vec<ResumeCard<'a>>,
}

pub fn dashboard_page(
    session: &Session,
    resumes: &[ResumeRecord],
    flash: &Flash,
) -> askama::Result<String> {
    DashboardPage {
        session,
        banners: flash_banners(flash.error.as_deref(), flash.message.as_deref()),
        cards: resumes
            .iter()
            .map(|r| ResumeCard {
                id: urlencoding::encode(&r.id).into_owned(),
                title: &r.title,
                status: r.status,
                updated: last_updated(r),
            })
            .collect(),
    }
    .render()
}

#[derive(Template)]
#[template(path = "resume.html")]
struct ResumePage<'a> {
    session: &'a Session,
    record: &'a ResumeRecord,
    updated: String,
    preview: PreviewView,
}

pub fn resume_page(session: &Session, record: &ResumeRecord) -> askama::Result<String> {
    ResumePage {
        session,
        record,
        updated: last_updated(record),
        preview: render_preview(&record.content),
    }
    .render()
}

fn resume_not_found() -> Result<Response, AppError> {
    let html = views::not_found(
        "Resume Not Found",
        "The resume you're looking for doesn't exist.",
        "/home",
        "Back to Resumes",
    )?;
    Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
}

/// GET /home
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Query(flash): Query<Flash>,
) -> Result<Html<String>, AppError> {
    Ok(Html(dashboard_page(&session, state.resumes.list(), &flash)?))
}

/// GET /resume/:id
pub async fn resume_detail(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    if let Some(record) = state.resumes.get(&id) {
        return Ok(Html(resume_page(&session, record)?).into_response());
    }

    let result = state
        .gateway
        .fetch_resume(&id, Some(&session.access_token))
        .await;
    let record = match result.data {
        Some(data) if result.success => serde_json::from_value::<ResumeRecord>(data),
        _ => {
            debug!("Resume {} not available: {:?}", id, result.message);
            return resume_not_found();
        }
    };

    match record {
        Ok(record) => Ok(Html(resume_page(&session, &record)?).into_response()),
        Err(e) => {
            warn!("Resume {} has an unreadable body: {}", id, e);
            resume_not_found()
        }
    }
}
