use async_trait::async_trait;
use reqwest::Client;

use crate::models::submission::{RelayPayload, RelayResponse, SubmissionPayload, Transport};
use crate::services::submission::interface::{Delivery, SubmissionError, SubmissionStrategy};

/// Third-party form relay. Only a response body with `success: true` counts,
/// whatever the HTTP status.
pub struct RelayStrategy {
    client: Client,
    url: String,
    access_key: String,
    recipient: String,
}

impl RelayStrategy {
    pub fn new(
        client: Client,
        url: impl Into<String>,
        access_key: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            access_key: access_key.into(),
            recipient: recipient.into(),
        }
    }
}

#[async_trait]
impl SubmissionStrategy for RelayStrategy {
    fn transport(&self) -> Transport {
        Transport::Relay
    }

    async fn attempt(&self, payload: &SubmissionPayload) -> Result<Delivery, SubmissionError> {
        if self.access_key.trim().is_empty() {
            return Err(SubmissionError::NotConfigured("Form relay"));
        }

        let body = RelayPayload {
            access_key: self.access_key.clone(),
            name: payload.name.clone(),
            email: payload.email.clone(),
            subject: payload.subject.clone(),
            message: payload.message.clone(),
            to: self.recipient.clone(),
        };

        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let parsed: RelayResponse = response.json().await.map_err(|err| {
            SubmissionError::Relay(format!("unreadable response ({}): {}", status, err))
        })?;

        if parsed.success {
            Ok(Delivery::default())
        } else {
            Err(SubmissionError::Relay(
                parsed
                    .message
                    .unwrap_or_else(|| format!("status {}", status.as_u16())),
            ))
        }
    }
}
