use actix_web::web;

pub mod catalog;
pub mod estimate;
pub mod health;
pub mod lead_form;
pub mod portfolio;
pub mod quote;
pub mod session;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .route("/services", web::get().to(catalog::list_services))
                .route("/pricing/options", web::get().to(catalog::pricing_options))
                .route("/estimate", web::post().to(estimate::compute))
                .service(
                    web::resource("/sessions")
                        .route(web::post().to(session::create))
                        .route(web::delete().to(session::close)),
                )
                .service(
                    web::scope("/session")
                        .service(
                            web::resource("/selection")
                                .route(web::get().to(session::get_selection))
                                .route(web::put().to(session::replace_selection)),
                        )
                        .route(
                            "/selection/services/{id}",
                            web::post().to(session::toggle_service),
                        )
                        .route("/estimate", web::get().to(session::get_estimate))
                        .route("/quote", web::get().to(quote::get_quote))
                        .route("/quote.pdf", web::get().to(quote::download_pdf))
                        .service(
                            web::scope("/lead-form")
                                .route("", web::get().to(lead_form::get_form))
                                .route("/prefill", web::post().to(lead_form::prefill))
                                .route("/fields", web::patch().to(lead_form::update_fields))
                                .route("/advance", web::post().to(lead_form::advance))
                                .route("/retreat", web::post().to(lead_form::retreat))
                                .route("/simple", web::post().to(lead_form::switch_to_simple))
                                .route("/wizard", web::post().to(lead_form::switch_to_wizard))
                                .route("/submit", web::post().to(lead_form::submit))
                                .route("/acknowledge", web::post().to(lead_form::acknowledge)),
                        ),
                )
                .service(
                    web::scope("/portfolio")
                        .route("", web::get().to(portfolio::list_projects))
                        .route("/search", web::post().to(portfolio::search))
                        .route("/facets", web::get().to(portfolio::facets)),
                ),
        );
}
