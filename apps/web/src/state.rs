use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::config::Config;
use crate::gateway::ResumeGateway;
use crate::resumes::ResumeCatalog;
use crate::sessions::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Hosted auth provider. Tests swap in a stub.
    pub auth: Arc<dyn AuthProvider>,
    /// Resume/profile REST API.
    pub gateway: Arc<dyn ResumeGateway>,
    pub sessions: SessionStore,
    pub resumes: Arc<ResumeCatalog>,
}
