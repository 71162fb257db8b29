pub mod challenge_service;
pub mod lead_form_service;
pub mod pdf_service;
pub mod portfolio_service;
pub mod pricing_service;
pub mod quote_service;
pub mod submission;
