use async_trait::async_trait;

use crate::models::submission::{SubmissionPayload, Transport};
use crate::services::lead_form_service::is_valid_email;
use crate::services::submission::interface::{Delivery, SubmissionError, SubmissionStrategy};

/// Last resort: hand the visitor a prefilled `mailto:` link to send themselves.
pub struct MailtoStrategy {
    recipient: String,
}

impl MailtoStrategy {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
        }
    }

    pub fn build_url(&self, payload: &SubmissionPayload) -> Result<String, SubmissionError> {
        let recipient = self.recipient.trim();
        if !is_valid_email(recipient) {
            return Err(SubmissionError::InvalidAddress(recipient.to_string()));
        }

        let body = format!(
            "Name: {}\nEmail: {}\n\n{}",
            payload.name, payload.email, payload.message
        );

        Ok(format!(
            "mailto:{}?subject={}&body={}",
            recipient,
            urlencoding::encode(&payload.subject),
            urlencoding::encode(&body)
        ))
    }
}

#[async_trait]
impl SubmissionStrategy for MailtoStrategy {
    fn transport(&self) -> Transport {
        Transport::Mailto
    }

    async fn attempt(&self, payload: &SubmissionPayload) -> Result<Delivery, SubmissionError> {
        Ok(Delivery {
            mailto_url: Some(self.build_url(payload)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> SubmissionPayload {
        SubmissionPayload {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            subject: "New project inquiry: Mobile App".to_string(),
            message: "Budget & timeline?\nThanks".to_string(),
            honeypot: String::new(),
            captcha: "7".to_string(),
            form_type: Some("project_wizard".to_string()),
        }
    }

    #[test]
    fn test_url_is_encoded() {
        let url = MailtoStrategy::new("hello@northwind.dev")
            .build_url(&payload())
            .unwrap();
        assert!(url.starts_with("mailto:hello@northwind.dev?subject=New%20project%20inquiry%3A%20Mobile%20App&body="));
        assert!(url.contains("Budget%20%26%20timeline%3F%0AThanks"));
        assert!(url.contains("Name%3A%20Ada%20Lovelace"));
    }

    #[test]
    fn test_invalid_recipient_fails() {
        let result = MailtoStrategy::new("not-an-address").build_url(&payload());
        assert!(matches!(result, Err(SubmissionError::InvalidAddress(_))));
    }
}
