use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::catalog::Catalog;
use crate::db::session_store::{Session, SessionStore};
use crate::errors::ApiError;
use crate::services::submission::SubmissionChain;

/// Everything request handlers share, handed out through `web::Data`.
pub struct AppState {
    pub config: AppConfig,
    pub catalog: Catalog,
    pub sessions: SessionStore,
    pub submissions: SubmissionChain,
}

impl AppState {
    pub fn new(config: AppConfig, catalog: Catalog, submissions: SubmissionChain) -> Self {
        let sessions = SessionStore::new(config.session_ttl_minutes);
        Self {
            config,
            catalog,
            sessions,
            submissions,
        }
    }

    /// Locks one session for a synchronous mutation.
    pub fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session, &Catalog) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        self.sessions
            .with_session(id, |session| f(session, &self.catalog))
            .map_err(|err: ApiError| err.with_contact(&self.config.contact_email))
    }

    pub fn fail(&self, err: impl Into<ApiError>) -> ApiError {
        err.into().with_contact(&self.config.contact_email)
    }
}
