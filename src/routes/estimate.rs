use actix_web::{web, HttpResponse};

use crate::errors::ApiError;
use crate::models::selection::Selection;
use crate::services::pricing_service::PricingService;
use crate::state::AppState;

// POST /api/estimate
pub async fn compute(
    state: web::Data<AppState>,
    selection: web::Json<Selection>,
) -> Result<HttpResponse, ApiError> {
    let catalog = &state.catalog;
    let estimate =
        PricingService::compute_estimate(&selection, &catalog.services, &catalog.pricing)
            .map_err(|err| state.fail(err))?;

    Ok(HttpResponse::Ok().json(estimate))
}
