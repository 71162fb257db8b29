use async_trait::async_trait;
use reqwest::Client;

use crate::models::submission::{SubmissionPayload, Transport};
use crate::services::submission::interface::{Delivery, SubmissionError, SubmissionStrategy};

/// Posts the payload as JSON to the site's own contact endpoint. Any 2xx counts.
pub struct ApiStrategy {
    client: Client,
    endpoint: String,
}

impl ApiStrategy {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SubmissionStrategy for ApiStrategy {
    fn transport(&self) -> Transport {
        Transport::Api
    }

    async fn attempt(&self, payload: &SubmissionPayload) -> Result<Delivery, SubmissionError> {
        let response = self.client.post(&self.endpoint).json(payload).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(Delivery::default());
        }

        let body = response.text().await.unwrap_or_default();
        Err(SubmissionError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
