use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::db::catalog::Catalog;
use crate::db::session_store::Session;
use crate::errors::ApiError;
use crate::middleware::session_context::SessionId;
use crate::models::quote::QuoteDocument;
use crate::routes::session::session_estimate;
use crate::services::pdf_service::PdfService;
use crate::services::quote_service::{QuoteError, QuoteService};
use crate::state::AppState;

fn build_document(
    session: &mut Session,
    catalog: &Catalog,
    contact_email: &str,
) -> Result<QuoteDocument, ApiError> {
    let current = session_estimate(session, catalog)?;
    let estimate_id = current.estimate_id.ok_or(QuoteError::EmptyEstimate)?;

    Ok(QuoteService::render_quote_document(
        &session.selection,
        &current.estimate,
        &estimate_id,
        Utc::now().date_naive(),
        &catalog.services,
        &catalog.pricing,
        contact_email,
    )?)
}

// GET /api/session/quote
pub async fn get_quote(
    state: web::Data<AppState>,
    session_id: SessionId,
) -> Result<HttpResponse, ApiError> {
    let contact_email = state.config.contact_email.clone();
    let document = state.with_session(session_id.0, |session, catalog| {
        build_document(session, catalog, &contact_email)
    })?;
    Ok(HttpResponse::Ok().json(document))
}

// GET /api/session/quote.pdf
pub async fn download_pdf(
    state: web::Data<AppState>,
    session_id: SessionId,
) -> Result<HttpResponse, ApiError> {
    let contact_email = state.config.contact_email.clone();
    let document = state.with_session(session_id.0, |session, catalog| {
        build_document(session, catalog, &contact_email)
    })?;

    let bytes = PdfService::render_quote(&document).map_err(|err| state.fail(err))?;
    log::info!("Generated {} ({} bytes)", document.file_name, bytes.len());

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(document.file_name.clone())],
        })
        .body(bytes))
}
