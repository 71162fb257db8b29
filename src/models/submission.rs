use serde::{Deserialize, Serialize};

/// Body posted to the primary contact endpoint.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SubmissionPayload {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub honeypot: String,
    pub captcha: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_type: Option<String>,
}

/// Shape expected by the third-party form relay.
#[derive(Debug, Serialize, Clone)]
pub struct RelayPayload {
    pub access_key: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub to: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RelayResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    Api,
    Relay,
    Mailto,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Success {
        transport: Transport,
        /// Set when the message still has to be sent from the visitor's mail client.
        #[serde(skip_serializing_if = "Option::is_none")]
        mailto_url: Option<String>,
    },
    Failed {
        message: String,
    },
}
