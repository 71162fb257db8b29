use actix_web::{web, HttpResponse, Responder};

use crate::models::project::ProjectFilter;
use crate::services::portfolio_service::PortfolioService;
use crate::state::AppState;

// GET /api/portfolio
pub async fn list_projects(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(&state.catalog.projects)
}

// POST /api/portfolio/search
pub async fn search(
    state: web::Data<AppState>,
    criteria: web::Json<ProjectFilter>,
) -> impl Responder {
    let projects = PortfolioService::filter(&state.catalog.projects, &criteria);
    HttpResponse::Ok().json(projects)
}

// GET /api/portfolio/facets
pub async fn facets(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(PortfolioService::facets(&state.catalog.projects))
}
