use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let catalog_result = check_catalog(&state);
    health
        .services
        .insert("catalog".to_string(), catalog_result.clone());

    let sessions_result = ServiceStatus {
        status: "ok".to_string(),
        details: Some(format!("{} active session(s)", state.sessions.len())),
    };
    health
        .services
        .insert("sessions".to_string(), sessions_result);

    let relay_result = check_relay(&state);
    health
        .services
        .insert("form_relay".to_string(), relay_result);

    // The relay is optional, only the catalog decides overall health.
    if catalog_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

fn check_catalog(state: &AppState) -> ServiceStatus {
    match state.catalog.validate() {
        Ok(()) => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!(
                "{} services, {} projects",
                state.catalog.services.len(),
                state.catalog.projects.len()
            )),
        },
        Err(e) => {
            log::error!("Catalog health check failed: {}", e);
            ServiceStatus {
                status: "error".to_string(),
                details: Some(e.to_string()),
            }
        }
    }
}

fn check_relay(state: &AppState) -> ServiceStatus {
    if state.config.relay_enabled() {
        ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("Relay configured at {}", state.config.form_relay_url)),
        }
    } else {
        ServiceStatus {
            status: "disabled".to_string(),
            details: Some("FORM_RELAY_ACCESS_KEY not configured".to_string()),
        }
    }
}
