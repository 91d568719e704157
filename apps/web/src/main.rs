mod auth;
mod config;
mod errors;
mod gateway;
mod models;
mod onboarding;
mod profiles;
mod resumes;
mod routes;
mod sessions;
mod state;
#[cfg(test)]
mod testing;
mod views;
mod wizard;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::hosted::HostedAuth;
use crate::config::Config;
use crate::gateway::ApiClient;
use crate::resumes::ResumeCatalog;
use crate::routes::build_router;
use crate::sessions::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Unemployed web v{}", env!("CARGO_PKG_VERSION"));

    let auth = Arc::new(HostedAuth::new(
        config.auth_url.clone(),
        config.auth_anon_key.clone(),
    ));
    info!("Auth provider client initialized ({})", config.auth_url);

    // API_URL is resolved per request, so a missing value only fails saves.
    if std::env::var(gateway::API_URL_ENV).is_err() {
        warn!("{} is not set; resume and profile saves will fail", gateway::API_URL_ENV);
    }
    let gateway = Arc::new(ApiClient::from_env());

    let resumes = Arc::new(ResumeCatalog::sample());
    info!("Resume catalog loaded ({} resumes)", resumes.list().len());

    let sessions = SessionStore::default();
    sessions.spawn_sweeper(config.session_idle());
    info!(
        "Session state expires after {} idle minute(s)",
        config.session_idle_minutes
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        auth,
        gateway,
        sessions,
        resumes,
    };

    // Build router
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
