use actix_web::{web, HttpResponse};
use serde::Serialize;
use uuid::Uuid;

use crate::db::catalog::Catalog;
use crate::db::session_store::Session;
use crate::errors::ApiError;
use crate::middleware::session_context::SessionId;
use crate::models::quote::EstimateId;
use crate::models::selection::{EstimateResult, Selection};
use crate::services::pricing_service::{EstimateError, PricingService};
use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

#[derive(Serialize)]
pub struct SessionEstimate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate_id: Option<EstimateId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub selection: Selection,
    pub estimate: EstimateResult,
}

/// Recomputes the session's estimate, issuing its estimate id the first time
/// there is something to price.
pub fn session_estimate(
    session: &mut Session,
    catalog: &Catalog,
) -> Result<SessionEstimate, ApiError> {
    let estimate =
        PricingService::compute_estimate(&session.selection, &catalog.services, &catalog.pricing)?;
    if estimate.has_estimate {
        session.ensure_estimate_id();
    }

    Ok(SessionEstimate {
        reference: session.estimate_id.as_ref().map(|id| id.reference()),
        estimate_id: session.estimate_id.clone(),
        selection: session.selection.clone(),
        estimate,
    })
}

// POST /api/sessions
pub async fn create(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let session = state.sessions.create().map_err(|err| state.fail(err))?;
    log::info!("Opened session {}", session.id);
    Ok(HttpResponse::Created().json(SessionCreated {
        session_id: session.id,
    }))
}

// DELETE /api/sessions
pub async fn close(
    state: web::Data<AppState>,
    session_id: SessionId,
) -> Result<HttpResponse, ApiError> {
    state
        .sessions
        .remove(session_id.0)
        .map_err(|err| state.fail(err))?;
    Ok(HttpResponse::NoContent().finish())
}

// GET /api/session/selection
pub async fn get_selection(
    state: web::Data<AppState>,
    session_id: SessionId,
) -> Result<HttpResponse, ApiError> {
    let body = state.with_session(session_id.0, session_estimate)?;
    Ok(HttpResponse::Ok().json(body))
}

// PUT /api/session/selection
pub async fn replace_selection(
    state: web::Data<AppState>,
    session_id: SessionId,
    selection: web::Json<Selection>,
) -> Result<HttpResponse, ApiError> {
    let selection = selection.into_inner();
    let body = state.with_session(session_id.0, |session, catalog| {
        // Reject unknown ids before touching the stored selection.
        PricingService::compute_estimate(&selection, &catalog.services, &catalog.pricing)?;
        session.selection = selection;
        session_estimate(session, catalog)
    })?;
    Ok(HttpResponse::Ok().json(body))
}

// POST /api/session/selection/services/{id}
pub async fn toggle_service(
    state: web::Data<AppState>,
    session_id: SessionId,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let service_id = path.into_inner();
    let body = state.with_session(session_id.0, |session, catalog| {
        if catalog.service(&service_id).is_none() {
            return Err(EstimateError::InvalidServiceId(service_id.clone()).into());
        }
        let selected = session.selection.toggle(&service_id);
        log::debug!("Service {} selected: {}", service_id, selected);
        session_estimate(session, catalog)
    })?;
    Ok(HttpResponse::Ok().json(body))
}

// GET /api/session/estimate
pub async fn get_estimate(
    state: web::Data<AppState>,
    session_id: SessionId,
) -> Result<HttpResponse, ApiError> {
    let body = state.with_session(session_id.0, session_estimate)?;
    Ok(HttpResponse::Ok().json(body))
}
