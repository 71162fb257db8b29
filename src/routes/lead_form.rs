use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::errors::ApiError;
use crate::middleware::session_context::SessionId;
use crate::models::lead::LeadFieldsPatch;
use crate::models::submission::SubmissionOutcome;
use crate::routes::session::session_estimate;
use crate::services::lead_form_service::{LeadForm, LeadFormError, LeadFormView};
use crate::state::AppState;

#[derive(Serialize)]
struct SubmitResponse {
    outcome: SubmissionOutcome,
    /// Absent when the session was closed or expired before delivery finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    form: Option<LeadFormView>,
}

fn apply(
    state: &AppState,
    session_id: SessionId,
    action: impl FnOnce(&mut LeadForm) -> Result<(), LeadFormError>,
) -> Result<HttpResponse, ApiError> {
    let view = state.with_session(session_id.0, |session, _| {
        action(&mut session.lead_form)?;
        Ok(session.lead_form.view())
    })?;
    Ok(HttpResponse::Ok().json(view))
}

// GET /api/session/lead-form
pub async fn get_form(
    state: web::Data<AppState>,
    session_id: SessionId,
) -> Result<HttpResponse, ApiError> {
    apply(&state, session_id, |_| Ok(()))
}

// POST /api/session/lead-form/prefill
pub async fn prefill(
    state: web::Data<AppState>,
    session_id: SessionId,
) -> Result<HttpResponse, ApiError> {
    let view = state.with_session(session_id.0, |session, catalog| {
        let current = session_estimate(session, catalog)?;
        session.lead_form.prefill(
            &current.selection,
            &current.estimate,
            current.estimate_id.as_ref(),
            &catalog.services,
        )?;
        Ok(session.lead_form.view())
    })?;
    Ok(HttpResponse::Ok().json(view))
}

// PATCH /api/session/lead-form/fields
pub async fn update_fields(
    state: web::Data<AppState>,
    session_id: SessionId,
    patch: web::Json<LeadFieldsPatch>,
) -> Result<HttpResponse, ApiError> {
    let patch = patch.into_inner();
    apply(&state, session_id, |form| form.update(patch))
}

// POST /api/session/lead-form/advance
pub async fn advance(
    state: web::Data<AppState>,
    session_id: SessionId,
) -> Result<HttpResponse, ApiError> {
    apply(&state, session_id, |form| form.advance().map(|_| ()))
}

// POST /api/session/lead-form/retreat
pub async fn retreat(
    state: web::Data<AppState>,
    session_id: SessionId,
) -> Result<HttpResponse, ApiError> {
    apply(&state, session_id, |form| form.retreat().map(|_| ()))
}

// POST /api/session/lead-form/simple
pub async fn switch_to_simple(
    state: web::Data<AppState>,
    session_id: SessionId,
) -> Result<HttpResponse, ApiError> {
    apply(&state, session_id, LeadForm::switch_to_simple)
}

// POST /api/session/lead-form/wizard
pub async fn switch_to_wizard(
    state: web::Data<AppState>,
    session_id: SessionId,
) -> Result<HttpResponse, ApiError> {
    apply(&state, session_id, LeadForm::switch_to_wizard)
}

// POST /api/session/lead-form/submit
pub async fn submit(
    state: web::Data<AppState>,
    session_id: SessionId,
) -> Result<HttpResponse, ApiError> {
    let payload = state.with_session(session_id.0, |session, _| {
        Ok(session.lead_form.begin_submission()?)
    })?;

    // Runs detached from the request so a dropped connection cannot leave the
    // form stuck in `Submitting` or cut the fallback chain short.
    let task_state = state.clone();
    let id = session_id.0;
    let delivery = actix_web::rt::spawn(async move {
        let outcome = task_state.submissions.submit(&payload).await;
        let form = task_state.with_session(id, |session, _| {
            session.lead_form.complete_submission(&outcome);
            Ok(session.lead_form.view())
        });
        (outcome, form)
    });

    let (outcome, form) = delivery.await.map_err(|err| {
        log::error!("Submission task for session {} failed: {}", id, err);
        state.fail(ApiError::internal())
    })?;

    let form = match form {
        Ok(view) => Some(view),
        Err(ApiError::SessionNotFound) => {
            log::warn!("Session {} ended while its submission was in flight", id);
            None
        }
        Err(err) => return Err(err),
    };

    Ok(HttpResponse::Ok().json(SubmitResponse { outcome, form }))
}

// POST /api/session/lead-form/acknowledge
pub async fn acknowledge(
    state: web::Data<AppState>,
    session_id: SessionId,
) -> Result<HttpResponse, ApiError> {
    apply(&state, session_id, LeadForm::acknowledge)
}
