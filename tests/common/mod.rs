#![allow(dead_code)]

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App};
use serde_json::{json, Value};

use consultancy_api::config::AppConfig;
use consultancy_api::db::catalog::Catalog;
use consultancy_api::routes;
use consultancy_api::services::submission::SubmissionChain;
use consultancy_api::state::AppState;

pub const SESSION_HEADER: &str = "X-Session-Id";

/// Nothing listens on port 1, so the primary endpoint always fails to connect.
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

pub struct TestApp {
    pub state: web::Data<AppState>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig {
            submission_api_base: UNREACHABLE.to_string(),
            http_timeout_secs: 5,
            ..AppConfig::default()
        })
    }

    pub fn with_config(config: AppConfig) -> Self {
        let catalog = Catalog::embedded().expect("embedded fixtures are valid");
        let submissions = SubmissionChain::from_config(&config).expect("http client builds");
        Self {
            state: web::Data::new(AppState::new(config, catalog, submissions)),
        }
    }

    pub fn create_app(&self) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::configure)
    }
}

/// Fields that pass validation for wizard steps 0 to 3.
pub fn wizard_fields() -> Value {
    json!({
        "project_type": "web-application",
        "budget": "10k-25k",
        "timeline": "1-3-months",
        "platforms": ["web"],
        "business_type": "startup"
    })
}

/// Answers a challenge question of the form "What is a op b?".
pub fn solve(question: &str) -> i64 {
    let expression = question
        .trim_start_matches("What is ")
        .trim_end_matches('?');
    let parts: Vec<&str> = expression.split_whitespace().collect();
    assert_eq!(parts.len(), 3, "unexpected question: {}", question);

    let left: i64 = parts[0].parse().unwrap();
    let right: i64 = parts[2].parse().unwrap();
    match parts[1] {
        "+" => left + right,
        "-" => left - right,
        "×" => left * right,
        other => panic!("unknown operator {}", other),
    }
}
