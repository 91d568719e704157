pub mod health;

use axum::{
    response::Html,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::errors::AppError;
use crate::onboarding::handlers as onboarding;
use crate::profiles::handlers as profiles;
use crate::resumes::handlers as resumes;
use crate::state::AppState;
use crate::views;

async fn landing() -> Result<Html<String>, AppError> {
    Ok(Html(views::landing()?))
}

async fn fallback() -> AppError {
    AppError::NotFound("The page you're looking for doesn't exist.".to_string())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/", get(landing))
        // Auth
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        // Signed-in pages
        .route(
            "/onboarding",
            get(onboarding::show_onboarding).post(onboarding::handle_onboarding),
        )
        .route("/home", get(resumes::dashboard))
        .route(
            "/resume/create",
            get(crate::wizard::handlers::show_wizard)
                .post(crate::wizard::handlers::handle_wizard_event),
        )
        .route("/resume/:id", get(resumes::resume_detail))
        // Public
        .route("/:username", get(profiles::public_profile))
        .fallback(fallback)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::auth::handlers::CONFIRM_EMAIL_MESSAGE;
    use crate::config::Config;
    use crate::gateway::ResumeGateway;
    use crate::models::resume::ResumeStatus;
    use crate::resumes::ResumeCatalog;
    use crate::sessions::SessionStore;
    use crate::testing::{
        test_user, PendingGateway, StubAuth, StubGateway, TEST_EMAIL, VALID_PASSWORD, VALID_TOKEN,
    };
    use crate::wizard::steps::Step;

    const COOKIE: &str = "session=valid-token";

    fn test_config() -> Config {
        Config {
            auth_url: "http://auth.test".to_string(),
            auth_anon_key: "anon".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            cookie_secure: false,
            session_idle_minutes: 120,
        }
    }

    fn test_state(auth: StubAuth, gateway: Arc<dyn ResumeGateway>) -> AppState {
        AppState {
            config: test_config(),
            auth: Arc::new(auth),
            gateway,
            sessions: SessionStore::default(),
            resumes: Arc::new(ResumeCatalog::sample()),
        }
    }

    fn default_state() -> AppState {
        test_state(StubAuth::default(), Arc::new(StubGateway::succeeding()))
    }

    fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn send(state: &AppState, request: Request<Body>) -> Response {
        build_router(state.clone()).oneshot(request).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    fn set_cookie(response: &Response) -> &str {
        response.headers()[header::SET_COOKIE].to_str().unwrap()
    }

    /// Opening tag of the first `<button` after `<form method="post" action="{action}"`.
    fn first_button_in_form<'a>(html: &'a str, action: &str) -> &'a str {
        let marker = format!("<form method=\"post\" action=\"{action}\"");
        let form = html.find(&marker).unwrap();
        let start = form + html[form..].find("<button").unwrap();
        let end = start + html[start..].find('>').unwrap();
        &html[start..=end]
    }

    // ── Session guard ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_home_without_session_redirects_to_login() {
        let state = default_state();
        let response = send(&state, get_request("/home", None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn test_home_with_rejected_token_redirects_to_login() {
        let state = default_state();
        let response = send(&state, get_request("/home", Some("session=expired"))).await;
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn test_home_shows_email_in_popover() {
        let state = default_state();
        let response = send(&state, get_request("/home", Some(COOKIE))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<div class=\"popover-email\">a@b.com</div>"));
        assert!(html.contains("Software Engineer Resume"));
    }

    #[tokio::test]
    async fn test_every_signed_in_page_is_guarded() {
        let state = default_state();
        for uri in ["/home", "/onboarding", "/resume/create", "/resume/1"] {
            let response = send(&state, get_request(uri, None)).await;
            assert_eq!(location(&response), "/login", "{uri}");
        }
    }

    // ── Auth ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_login_validation_error_redirects_back() {
        let state = default_state();
        let response = send(&state, post_form("/login", "email=nope&password=", None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(location(&response).starts_with("/login?error="));
    }

    #[tokio::test]
    async fn test_login_sets_session_cookie() {
        let state = default_state();
        let body = format!("email={}&password={VALID_PASSWORD}", urlencoding::encode(TEST_EMAIL));
        let response = send(&state, post_form("/login", &body, None)).await;
        assert_eq!(location(&response), "/home");
        assert!(set_cookie(&response).starts_with("session=valid-token;"));
    }

    #[tokio::test]
    async fn test_login_provider_error_is_shown() {
        let state = default_state();
        let body = format!("email={}&password=wrongpass", urlencoding::encode(TEST_EMAIL));
        let response = send(&state, post_form("/login", &body, None)).await;
        assert_eq!(
            location(&response),
            format!("/login?error={}", urlencoding::encode("Invalid login credentials"))
        );
    }

    #[tokio::test]
    async fn test_signup_awaiting_confirmation() {
        let auth = StubAuth {
            sign_up_confirms_by_email: true,
            ..Default::default()
        };
        let state = test_state(auth, Arc::new(StubGateway::succeeding()));
        let body = "email=new%40b.com&password=secret1";
        let response = send(&state, post_form("/register", body, None)).await;
        assert_eq!(
            location(&response),
            format!("/register?message={}", urlencoding::encode(CONFIRM_EMAIL_MESSAGE))
        );
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_signup_with_session_goes_to_onboarding() {
        let state = default_state();
        let body = "email=new%40b.com&password=secret1";
        let response = send(&state, post_form("/register", body, None)).await;
        assert_eq!(location(&response), "/onboarding");
        assert!(set_cookie(&response).starts_with("session="));
    }

    #[tokio::test]
    async fn test_logout_clears_cookie_and_session_state() {
        let state = default_state();
        state.sessions.with_wizard(VALID_TOKEN, |_| ());
        let response = send(&state, post_form("/logout", "", Some(COOKIE))).await;
        assert_eq!(location(&response), "/");
        assert!(set_cookie(&response).contains("Max-Age=0"));
        assert_eq!(state.sessions.with_existing_wizard(VALID_TOKEN, |_| ()), None);
    }

    #[tokio::test]
    async fn test_logout_failure_returns_to_home_with_error() {
        let auth = StubAuth {
            sign_out_error: Some("network down".to_string()),
            ..Default::default()
        };
        let state = test_state(auth, Arc::new(StubGateway::succeeding()));
        let response = send(&state, post_form("/logout", "", Some(COOKIE))).await;
        assert_eq!(location(&response), "/home?error=network%20down");
    }

    // ── Wizard ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_wizard_next_is_gated_on_first_name() {
        let state = default_state();
        let response = send(
            &state,
            post_form("/resume/create", "firstName=&action=next", Some(COOKIE)),
        )
        .await;
        assert_eq!(location(&response), "/resume/create");
        let step = state.sessions.with_wizard(VALID_TOKEN, |w| w.current_step());
        assert_eq!(step, Step::Personal);

        send(
            &state,
            post_form("/resume/create", "firstName=Ada&action=next", Some(COOKIE)),
        )
        .await;
        let step = state.sessions.with_wizard(VALID_TOKEN, |w| w.current_step());
        assert_eq!(step, Step::Summary);

        let html = body_text(send(&state, get_request("/resume/create", Some(COOKIE))).await).await;
        assert!(html.contains("Professional Summary"));
    }

    #[tokio::test]
    async fn test_fresh_wizard_form_submits_on_enter() {
        let state = default_state();
        let html = body_text(send(&state, get_request("/resume/create", Some(COOKIE))).await).await;
        let button = first_button_in_form(&html, "/resume/create");
        assert!(button.contains("value=\"next\""));
        assert!(!button.contains("disabled"));
    }

    #[tokio::test]
    async fn test_cancelled_save_does_not_leave_wizard_busy() {
        let state = test_state(StubAuth::default(), Arc::new(PendingGateway));
        send(
            &state,
            post_form("/resume/create", "firstName=Ada&action=goto%3A7", Some(COOKIE)),
        )
        .await;

        let save = send(&state, post_form("/resume/create", "action=save", Some(COOKIE)));
        assert!(tokio::time::timeout(Duration::from_millis(50), save).await.is_err());

        assert!(!state.sessions.with_wizard(VALID_TOKEN, |w| w.is_busy()));
        let html = body_text(send(&state, get_request("/resume/create", Some(COOKIE))).await).await;
        assert!(html.contains("value=\"save\">Save as Draft"));
        assert!(!html.contains("Saving..."));
    }

    #[tokio::test]
    async fn test_wizard_notice_cleared_by_navigation() {
        let state = test_state(StubAuth::default(), Arc::new(StubGateway::failing("boom")));
        send(
            &state,
            post_form("/resume/create", "firstName=Ada&action=goto%3A7", Some(COOKIE)),
        )
        .await;
        send(&state, post_form("/resume/create", "action=save", Some(COOKIE))).await;
        send(&state, post_form("/resume/create", "action=previous", Some(COOKIE))).await;

        let html = body_text(send(&state, get_request("/resume/create", Some(COOKIE))).await).await;
        assert!(!html.contains("Could not save draft"));
    }

    #[tokio::test]
    async fn test_wizard_save_failure_is_visible() {
        let gateway = Arc::new(StubGateway::failing("boom"));
        let state = test_state(StubAuth::default(), gateway.clone());

        send(
            &state,
            post_form("/resume/create", "firstName=Ada&action=goto%3A7", Some(COOKIE)),
        )
        .await;
        let response = send(&state, post_form("/resume/create", "action=save", Some(COOKIE))).await;
        assert_eq!(location(&response), "/resume/create");

        let (busy, notice) = state.sessions.with_wizard(VALID_TOKEN, |w| {
            (w.is_busy(), w.notice().map(|n| n.text.clone()))
        });
        assert!(!busy);
        assert_eq!(notice.as_deref(), Some("Could not save draft: boom"));
        assert_eq!(gateway.submitted()[0].status, ResumeStatus::Draft);

        let html = body_text(send(&state, get_request("/resume/create", Some(COOKIE))).await).await;
        assert!(html.contains("Could not save draft: boom"));
    }

    #[tokio::test]
    async fn test_wizard_publish_sends_full_draft() {
        let gateway = Arc::new(StubGateway::succeeding());
        let state = test_state(StubAuth::default(), gateway.clone());

        send(
            &state,
            post_form(
                "/resume/create",
                "firstName=Ada&skills=Rust%2C+Go&action=goto%3A7",
                Some(COOKIE),
            ),
        )
        .await;
        send(&state, post_form("/resume/create", "action=publish", Some(COOKIE))).await;

        let submitted = gateway.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].status, ResumeStatus::Published);
        assert_eq!(submitted[0].content.first_name, "Ada");
        assert_eq!(submitted[0].content.skills, vec!["Rust", "Go"]);
    }

    #[tokio::test]
    async fn test_wizard_save_outside_review_is_rejected() {
        let gateway = Arc::new(StubGateway::succeeding());
        let state = test_state(StubAuth::default(), gateway.clone());
        let response = send(&state, post_form("/resume/create", "action=save", Some(COOKIE))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(gateway.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_wizard_discard_drops_draft() {
        let state = default_state();
        send(
            &state,
            post_form("/resume/create", "firstName=Ada&action=goto%3A7", Some(COOKIE)),
        )
        .await;
        let response = send(&state, post_form("/resume/create", "action=discard", Some(COOKIE))).await;
        assert_eq!(location(&response), "/home");
        assert_eq!(state.sessions.with_existing_wizard(VALID_TOKEN, |_| ()), None);
    }

    // ── Onboarding ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_onboarding_submits_profile_for_session_user() {
        let gateway = Arc::new(StubGateway::succeeding());
        let state = test_state(StubAuth::default(), gateway.clone());

        send(&state, post_form("/onboarding", "name=+Ada+&action=next", Some(COOKIE))).await;
        let response = send(
            &state,
            post_form("/onboarding", "name=+Ada+&username=ada&action=submit", Some(COOKIE)),
        )
        .await;
        assert_eq!(location(&response), "/home");

        let profiles = gateway.profiles();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].0, test_user().id.to_string());
        assert_eq!(profiles[0].1.name.as_deref(), Some("Ada"));
        assert_eq!(profiles[0].2.as_deref(), Some(VALID_TOKEN));
    }

    #[tokio::test]
    async fn test_fresh_onboarding_form_submits_on_enter() {
        let state = default_state();
        let html = body_text(send(&state, get_request("/onboarding", Some(COOKIE))).await).await;
        let button = first_button_in_form(&html, "/onboarding");
        assert!(button.contains("value=\"next\""));
        assert!(!button.contains("disabled"));

        let response = send(&state, post_form("/onboarding", "name=&action=next", Some(COOKIE))).await;
        assert_eq!(location(&response), "/onboarding");
        let html = body_text(send(&state, get_request("/onboarding", Some(COOKIE))).await).await;
        assert!(html.contains("Step 1 of 2"));
        assert!(html.contains("Please enter your name to continue"));
    }

    #[tokio::test]
    async fn test_onboarding_completion_frees_session_state() {
        let state = default_state();
        send(&state, post_form("/onboarding", "name=Ada&action=next", Some(COOKIE))).await;
        send(
            &state,
            post_form("/onboarding", "name=Ada&username=ada&action=submit", Some(COOKIE)),
        )
        .await;
        assert_eq!(state.sessions.len(), 0);
    }

    #[tokio::test]
    async fn test_onboarding_failure_shows_banner() {
        let state = test_state(StubAuth::default(), Arc::new(StubGateway::failing("Username taken")));
        send(&state, post_form("/onboarding", "name=Ada&action=next", Some(COOKIE))).await;
        let response = send(
            &state,
            post_form("/onboarding", "name=Ada&username=ada&action=submit", Some(COOKIE)),
        )
        .await;
        assert_eq!(location(&response), "/onboarding");

        let html = body_text(send(&state, get_request("/onboarding", Some(COOKIE))).await).await;
        assert!(html.contains("Username taken"));
        assert!(html.contains("Step 2 of 2"));
    }

    // ── Resumes and profiles ───────────────────────────────────────────────

    #[tokio::test]
    async fn test_resume_detail_from_catalog() {
        let state = default_state();
        let response = send(&state, get_request("/resume/2", Some(COOKIE))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Product Manager Resume"));
    }

    #[tokio::test]
    async fn test_unknown_resume_renders_not_found() {
        let state = default_state();
        let response = send(&state, get_request("/resume/99", Some(COOKIE))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = body_text(response).await;
        assert!(html.contains("Resume Not Found"));
        assert!(html.contains("href=\"/home\""));
    }

    #[tokio::test]
    async fn test_resume_detail_falls_back_to_api() {
        let gateway = StubGateway::succeeding().serving_resume(serde_json::json!({
            "id": "99",
            "title": "Remote Resume",
            "status": "published",
            "updatedAt": "2024-03-01T08:00:00Z",
            "createdAt": "2024-02-01"
        }));
        let state = test_state(StubAuth::default(), Arc::new(gateway));
        let response = send(&state, get_request("/resume/99", Some(COOKIE))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Remote Resume"));
    }

    #[tokio::test]
    async fn test_public_profile_needs_no_session() {
        let state = default_state();
        let response = send(&state, get_request("/ada_l", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("@ada_l"));
    }

    #[tokio::test]
    async fn test_reserved_paths_are_not_profiles() {
        let state = default_state();
        for uri in ["/resume", "/Resume", "/HOME", "/onboarding"] {
            let response = send(&state, get_request(uri, None)).await;
            let status = response.status();
            let html = body_text(response).await;
            assert!(!html.contains("John Doe"), "{uri}");
            assert!(status == StatusCode::NOT_FOUND || status == StatusCode::SEE_OTHER, "{uri}");
        }
        let response = send(&state, get_request("/resume", None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_landing_health_and_fallback() {
        let state = default_state();
        assert_eq!(send(&state, get_request("/", None)).await.status(), StatusCode::OK);
        assert_eq!(send(&state, get_request("/health", None)).await.status(), StatusCode::OK);
        assert_eq!(
            send(&state, get_request("/a/b/c", None)).await.status(),
            StatusCode::NOT_FOUND
        );
    }
}
