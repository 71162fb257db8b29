use std::future::{ready, Ready};

use actix_web::{dev::Payload, error::ErrorBadRequest, Error, FromRequest, HttpRequest};
use uuid::Uuid;

pub const SESSION_HEADER: &str = "X-Session-Id";

/// Session id taken from the `X-Session-Id` header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionId(pub Uuid);

impl FromRequest for SessionId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let parsed = req
            .headers()
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value.trim()).ok());

        match parsed {
            Some(id) => ready(Ok(SessionId(id))),
            None => ready(Err(ErrorBadRequest(
                "Missing or malformed X-Session-Id header",
            ))),
        }
    }
}
