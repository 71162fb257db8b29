use std::time::Duration;

use reqwest::Client;

use crate::config::AppConfig;
use crate::models::submission::{SubmissionOutcome, SubmissionPayload, Transport};
use crate::services::submission::api::ApiStrategy;
use crate::services::submission::interface::SubmissionStrategy;
use crate::services::submission::mailto::MailtoStrategy;
use crate::services::submission::relay::RelayStrategy;

/// Ordered delivery strategies. The first success wins; each failure is
/// logged and the next strategy is tried.
pub struct SubmissionChain {
    strategies: Vec<Box<dyn SubmissionStrategy>>,
    fallback_email: String,
}

impl SubmissionChain {
    pub fn new(strategies: Vec<Box<dyn SubmissionStrategy>>, fallback_email: impl Into<String>) -> Self {
        Self {
            strategies,
            fallback_email: fallback_email.into(),
        }
    }

    /// Primary API, then the form relay, then a mailto link.
    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        if !config.relay_enabled() {
            log::info!("FORM_RELAY_ACCESS_KEY not set, relay delivery will be skipped");
        }

        Ok(Self::new(
            vec![
                Box::new(ApiStrategy::new(client.clone(), config.submission_endpoint())),
                Box::new(RelayStrategy::new(
                    client,
                    config.form_relay_url.clone(),
                    config.form_relay_access_key.clone(),
                    config.contact_email.clone(),
                )),
                Box::new(MailtoStrategy::new(config.contact_email.clone())),
            ],
            config.contact_email.clone(),
        ))
    }

    pub fn transports(&self) -> Vec<Transport> {
        self.strategies.iter().map(|s| s.transport()).collect()
    }

    pub async fn submit(&self, payload: &SubmissionPayload) -> SubmissionOutcome {
        for strategy in &self.strategies {
            let transport = strategy.transport();
            match strategy.attempt(payload).await {
                Ok(delivery) => {
                    log::info!("Submission delivered via {:?}", transport);
                    return SubmissionOutcome::Success {
                        transport,
                        mailto_url: delivery.mailto_url,
                    };
                }
                Err(err) => {
                    log::warn!("Submission via {:?} failed: {}", transport, err);
                }
            }
        }

        log::error!("All submission transports failed");
        SubmissionOutcome::Failed {
            message: format!(
                "We couldn't send your message. Please email us directly at {}.",
                self.fallback_email
            ),
        }
    }
}
