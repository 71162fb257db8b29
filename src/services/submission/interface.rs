use async_trait::async_trait;
use thiserror::Error;

use crate::models::submission::{SubmissionPayload, Transport};

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Endpoint rejected the submission with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Relay reported failure: {0}")]
    Relay(String),
    #[error("Invalid recipient address: {0}")]
    InvalidAddress(String),
}

/// A successful hand-off. `mailto_url` is set when the visitor's own mail
/// client still has to send the message.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Delivery {
    pub mailto_url: Option<String>,
}

#[async_trait]
pub trait SubmissionStrategy: Send + Sync {
    fn transport(&self) -> Transport;

    async fn attempt(&self, payload: &SubmissionPayload) -> Result<Delivery, SubmissionError>;
}
