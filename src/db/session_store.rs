use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::config::MAX_SESSION_TTL_MINUTES;
use crate::models::quote::EstimateId;
use crate::models::selection::Selection;
use crate::services::lead_form_service::LeadForm;

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("Session {0} not found or expired")]
    NotFound(Uuid),
    #[error("Session store is unavailable")]
    Poisoned,
}

/// One visitor's in-memory state: pricing choices, estimate reference and lead form.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub selection: Selection,
    pub estimate_id: Option<EstimateId>,
    pub lead_form: LeadForm,
    pub last_seen: DateTime<Utc>,
}

impl Session {
    pub fn new(id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            selection: Selection::default(),
            estimate_id: None,
            lead_form: LeadForm::new(),
            last_seen: now,
        }
    }

    /// Issued the first time it is needed and kept for the rest of the session.
    pub fn ensure_estimate_id(&mut self) -> EstimateId {
        self.estimate_id
            .get_or_insert_with(|| EstimateId::generate(&mut rand::thread_rng()))
            .clone()
    }
}

pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Session>>,
    ttl: Duration,
}

impl SessionStore {
    /// The TTL is clamped to `1..=MAX_SESSION_TTL_MINUTES`.
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl: Duration::minutes(ttl_minutes.clamp(1, MAX_SESSION_TTL_MINUTES)),
        }
    }

    pub fn create(&self) -> Result<Session, SessionError> {
        let now = Utc::now();
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::Poisoned)?;
        Self::evict(&mut sessions, now, self.ttl);

        let session = Session::new(Uuid::new_v4(), now);
        sessions.insert(session.id, session.clone());
        log::debug!("Created session {} ({} active)", session.id, sessions.len());
        Ok(session)
    }

    pub fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::Poisoned)?;
        sessions
            .remove(&id)
            .map(|_| ())
            .ok_or(SessionError::NotFound(id))
    }

    /// Runs `f` against a live session while holding the lock. Never call this
    /// from inside an await point; copy what you need out instead.
    pub fn with_session<T, E>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<SessionError>,
    {
        let now = Utc::now();
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::Poisoned)?;
        Self::evict(&mut sessions, now, self.ttl);

        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        session.last_seen = now;
        f(session)
    }

    pub fn evict_expired_at(&self, now: DateTime<Utc>) -> Result<usize, SessionError> {
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(Self::evict(&mut sessions, now, self.ttl))
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().map(|sessions| sessions.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn evict(sessions: &mut HashMap<Uuid, Session>, now: DateTime<Utc>, ttl: Duration) -> usize {
        let before = sessions.len();
        sessions.retain(|_, session| now - session.last_seen <= ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            log::info!("Evicted {} expired session(s)", evicted);
        }
        evicted
    }
}
