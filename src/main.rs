use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use consultancy_api::config::AppConfig;
use consultancy_api::db::catalog::Catalog;
use consultancy_api::routes;
use consultancy_api::services::submission::SubmissionChain;
use consultancy_api::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    log::info!("Application starting...");

    let config = AppConfig::from_env();

    let catalog = Catalog::load(config.fixture_dir.as_deref()).map_err(|err| {
        log::error!("Invalid catalog fixtures: {}", err);
        std::io::Error::new(std::io::ErrorKind::InvalidData, err.to_string())
    })?;

    let submissions = SubmissionChain::from_config(&config).map_err(|err| {
        log::error!("Failed to build HTTP client: {}", err);
        std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
    })?;

    let host = config.host.clone();
    let port = config.port;
    let state = web::Data::new(AppState::new(config, catalog, submissions));

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .expose_headers(vec![actix_web::http::header::CONTENT_DISPOSITION])
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
