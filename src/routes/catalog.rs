use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

use crate::models::service::{ComplexityOption, PricingTables, Service, SupportOption, TimelineChoice};
use crate::state::AppState;

#[derive(Serialize)]
struct PricingOption<'a, V> {
    key: &'static str,
    #[serde(flatten)]
    option: &'a V,
}

#[derive(Serialize)]
struct PricingOptions<'a> {
    complexity: Vec<PricingOption<'a, ComplexityOption>>,
    timeline: Vec<PricingOption<'a, TimelineChoice>>,
    support: Vec<PricingOption<'a, SupportOption>>,
}

impl<'a> PricingOptions<'a> {
    fn from_tables(tables: &'a PricingTables) -> Self {
        Self {
            complexity: tables
                .complexity
                .iter()
                .map(|(level, option)| PricingOption {
                    key: level.key(),
                    option,
                })
                .collect(),
            timeline: tables
                .timeline
                .iter()
                .map(|(choice, option)| PricingOption {
                    key: choice.key(),
                    option,
                })
                .collect(),
            support: tables
                .support
                .iter()
                .map(|(level, option)| PricingOption {
                    key: level.key(),
                    option,
                })
                .collect(),
        }
    }
}

// GET /api/services
pub async fn list_services(state: web::Data<AppState>) -> impl Responder {
    let services: &[Service] = &state.catalog.services;
    HttpResponse::Ok().json(services)
}

// GET /api/pricing/options
pub async fn pricing_options(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(PricingOptions::from_tables(&state.catalog.pricing))
}
