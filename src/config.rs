use std::path::PathBuf;

use url::Url;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const SUBMISSION_API_BASE: &str = "http://localhost:8080";
const FORM_RELAY_URL: &str = "https://api.web3forms.com/submit";
const CONTACT_EMAIL: &str = "hello@northwind.dev";
const HTTP_TIMEOUT_SECS: u64 = 15;
const SESSION_TTL_MINUTES: i64 = 120;
/// One week.
pub const MAX_SESSION_TTL_MINUTES: i64 = 7 * 24 * 60;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the primary contact endpoint; `/api/submit-contact` is appended.
    pub submission_api_base: String,
    pub form_relay_url: String,
    /// Relay is skipped when empty.
    pub form_relay_access_key: String,
    /// Recipient for relay and mailto deliveries, and the address shown when all else fails.
    pub contact_email: String,
    pub http_timeout_secs: u64,
    pub session_ttl_minutes: i64,
    pub fixture_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: HOST.to_string(),
            port: PORT,
            submission_api_base: SUBMISSION_API_BASE.to_string(),
            form_relay_url: FORM_RELAY_URL.to_string(),
            form_relay_access_key: String::new(),
            contact_email: CONTACT_EMAIL.to_string(),
            http_timeout_secs: HTTP_TIMEOUT_SECS,
            session_ttl_minutes: SESSION_TTL_MINUTES,
            fixture_dir: None,
        }
    }
}

impl AppConfig {
    /// Create config from environment variables or use defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            submission_api_base: url_var("SUBMISSION_API_BASE")
                .unwrap_or(defaults.submission_api_base),
            form_relay_url: url_var("FORM_RELAY_URL").unwrap_or(defaults.form_relay_url),
            form_relay_access_key: std::env::var("FORM_RELAY_ACCESS_KEY")
                .unwrap_or(defaults.form_relay_access_key),
            contact_email: std::env::var("CONTACT_EMAIL").unwrap_or(defaults.contact_email),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.http_timeout_secs),
            session_ttl_minutes: std::env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|minutes: &i64| *minutes > 0)
                .map(|minutes| minutes.min(MAX_SESSION_TTL_MINUTES))
                .unwrap_or(defaults.session_ttl_minutes),
            fixture_dir: std::env::var("FIXTURE_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn submission_endpoint(&self) -> String {
        format!(
            "{}/api/submit-contact",
            self.submission_api_base.trim_end_matches('/')
        )
    }

    pub fn relay_enabled(&self) -> bool {
        !self.form_relay_access_key.trim().is_empty()
    }
}

// Malformed URLs are ignored in favour of the default.
fn url_var(name: &str) -> Option<String> {
    let value = std::env::var(name).ok()?;
    match Url::parse(value.trim()) {
        Ok(_) => Some(value.trim().to_string()),
        Err(err) => {
            log::warn!("Ignoring {}={:?}: {}", name, value, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 9] = [
        "HOST",
        "PORT",
        "SUBMISSION_API_BASE",
        "FORM_RELAY_URL",
        "FORM_RELAY_ACCESS_KEY",
        "CONTACT_EMAIL",
        "HTTP_TIMEOUT_SECS",
        "SESSION_TTL_MINUTES",
        "FIXTURE_DIR",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_env() {
        clear_env();
        let config = AppConfig::from_env();
        assert_eq!(config, AppConfig::default());
        assert!(!config.relay_enabled());
    }

    #[test]
    #[serial]
    fn test_env_overrides_and_bad_numbers() {
        clear_env();
        std::env::set_var("PORT", "9090");
        std::env::set_var("HTTP_TIMEOUT_SECS", "not-a-number");
        std::env::set_var("SESSION_TTL_MINUTES", "-5");
        std::env::set_var("FORM_RELAY_ACCESS_KEY", "abc123");
        std::env::set_var("SUBMISSION_API_BASE", "https://api.example.com/");
        std::env::set_var("FORM_RELAY_URL", "not a url");

        let config = AppConfig::from_env();
        assert_eq!(config.port, 9090);
        assert_eq!(config.http_timeout_secs, HTTP_TIMEOUT_SECS);
        assert_eq!(config.session_ttl_minutes, SESSION_TTL_MINUTES);
        assert!(config.relay_enabled());
        assert_eq!(
            config.submission_endpoint(),
            "https://api.example.com/api/submit-contact"
        );
        assert_eq!(config.form_relay_url, FORM_RELAY_URL);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_huge_session_ttl_is_capped() {
        clear_env();
        std::env::set_var("SESSION_TTL_MINUTES", "9223372036854775807");
        assert_eq!(AppConfig::from_env().session_ttl_minutes, MAX_SESSION_TTL_MINUTES);

        std::env::set_var("SESSION_TTL_MINUTES", "90");
        assert_eq!(AppConfig::from_env().session_ttl_minutes, 90);

        clear_env();
    }
}
