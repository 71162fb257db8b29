use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::db::session_store::SessionError;
use crate::services::lead_form_service::{FieldErrors, LeadFormError};
use crate::services::pdf_service::RenderError;
use crate::services::pricing_service::EstimateError;
use crate::services::quote_service::QuoteError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Session not found or expired")]
    SessionNotFound,
    #[error("{message}")]
    Validation { message: String, fields: FieldErrors },
    #[error("{0}")]
    Conflict(String),
    /// Detail is logged where the error is raised, never sent to the client.
    #[error("Something went wrong on our side. Please try again{}", contact_hint(.contact))]
    Internal { contact: Option<String> },
}

fn contact_hint(contact: &Option<String>) -> String {
    contact
        .as_ref()
        .map(|email| format!(" or contact us at {}", email))
        .unwrap_or_default()
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::SessionNotFound => "session_not_found",
            ApiError::Validation { .. } => "validation_error",
            ApiError::Conflict(_) => "invalid_state",
            ApiError::Internal { .. } => "internal_error",
        }
    }

    pub fn internal() -> Self {
        ApiError::Internal { contact: None }
    }

    /// Points internal failures at the fallback contact address.
    pub fn with_contact(self, email: &str) -> Self {
        match self {
            ApiError::Internal { .. } => ApiError::Internal {
                contact: Some(email.to_string()),
            },
            other => other,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::SessionNotFound => StatusCode::NOT_FOUND,
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let fields = match self {
            ApiError::Validation { fields, .. } => Some(fields.clone()),
            _ => None,
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
            fields,
        })
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(_) => ApiError::SessionNotFound,
            SessionError::Poisoned => {
                log::error!("{}", err);
                ApiError::internal()
            }
        }
    }
}

impl From<EstimateError> for ApiError {
    fn from(err: EstimateError) -> Self {
        match err {
            EstimateError::InvalidServiceId(_) => {
                log::error!("Rejected estimate request: {}", err);
                ApiError::BadRequest(err.to_string())
            }
            EstimateError::MissingTableEntry(_) => {
                log::error!("Pricing tables incomplete: {}", err);
                ApiError::internal()
            }
        }
    }
}

impl From<LeadFormError> for ApiError {
    fn from(err: LeadFormError) -> Self {
        match err {
            LeadFormError::Validation(fields) => ApiError::Validation {
                message: "Please correct the highlighted fields".to_string(),
                fields,
            },
            other => ApiError::Conflict(other.to_string()),
        }
    }
}

impl From<QuoteError> for ApiError {
    fn from(err: QuoteError) -> Self {
        ApiError::Validation {
            message: err.to_string(),
            fields: FieldErrors::new(),
        }
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        log::error!("Quote rendering failed: {}", err);
        ApiError::internal()
    }
}
