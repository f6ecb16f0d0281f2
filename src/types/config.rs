//! Configuration Types
//!
//! MyInfo client configuration and the environment base URL table.

use secrecy::{ExposeSecret, SecretString};
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigurationError;
use crate::signing::encode_path_segment;

/// MyInfo environment, selecting one of the fixed gateway base URLs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    /// Sandbox gateway with mock persons.
    Development,
    /// Test gateway.
    Staging,
    /// Live gateway.
    #[default]
    Production,
}

impl Environment {
    /// All environments.
    pub const ALL: [Environment; 3] = [Self::Development, Self::Staging, Self::Production];

    /// Base URL of the gateway for this environment.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Development => "https://sandbox.api.myinfo.gov.sg/com/v3",
            Self::Staging => "https://test.api.myinfo.gov.sg/com/v3",
            Self::Production => "https://api.myinfo.gov.sg/com/v3",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "sandbox" => Ok(Self::Development),
            "staging" | "test" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(ConfigurationError::InvalidEnvironment {
                value: s.to_string(),
            }),
        }
    }
}

/// MyInfo client configuration.
///
/// Immutable once built; construct through [`crate::builders::MyInfoConfigBuilder`].
#[derive(Clone)]
pub struct MyInfoConfig {
    /// Client identifier (also the `app_id` of signed requests).
    pub client_id: String,
    /// Client secret sent to the token endpoint.
    pub client_secret: SecretString,
    /// Service provider e-service id (`sp_esvcId`).
    pub service_provider_id: String,
    /// Registered redirect endpoint.
    pub redirect_uri: String,
    /// PEM private key used to sign requests.
    pub private_key: SecretString,
    /// PEM public key of the gateway, used to verify identity tokens.
    pub public_cert: String,
    /// Selected gateway environment.
    pub environment: Environment,
    /// Base URL override.
    pub base_url: Option<String>,
    /// HTTP timeout.
    pub timeout: Duration,
}

impl MyInfoConfig {
    /// Create a configuration builder.
    pub fn builder() -> crate::builders::MyInfoConfigBuilder {
        crate::builders::MyInfoConfigBuilder::new()
    }

    /// Load configuration from `MYINFO_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        crate::builders::MyInfoConfigBuilder::from_env()?.build()
    }

    /// Effective gateway base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
            .trim_end_matches('/')
    }

    /// Browser redirect target for consent.
    pub fn authorise_url(&self) -> String {
        format!("{}/authorise", self.base_url())
    }

    /// Token endpoint.
    pub fn token_url(&self) -> String {
        format!("{}/token", self.base_url())
    }

    /// Person endpoint for a subject identifier.
    pub fn person_url(&self, subject: &str) -> String {
        format!("{}/person/{}/", self.base_url(), encode_path_segment(subject))
    }

    pub(crate) fn private_key_pem(&self) -> &str {
        self.private_key.expose_secret()
    }

    pub(crate) fn client_secret_value(&self) -> &str {
        self.client_secret.expose_secret()
    }
}

impl std::fmt::Debug for MyInfoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MyInfoConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("service_provider_id", &self.service_provider_id)
            .field("redirect_uri", &self.redirect_uri)
            .field("private_key", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Default configuration values.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(environment: Environment, base_url: Option<&str>) -> MyInfoConfig {
        MyInfoConfig {
            client_id: "STG2-MYINFO-SELF-TEST".to_string(),
            client_secret: SecretString::new("secret".to_string()),
            service_provider_id: "MYINFO-CONSENTPLATFORM".to_string(),
            redirect_uri: "http://localhost:3001/callback".to_string(),
            private_key: SecretString::new("key".to_string()),
            public_cert: "cert".to_string(),
            environment,
            base_url: base_url.map(String::from),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    #[test]
    fn test_every_environment_has_distinct_https_url() {
        let urls: std::collections::HashSet<_> =
            Environment::ALL.iter().map(|e| e.base_url()).collect();
        assert_eq!(urls.len(), 3);
        assert!(urls.iter().all(|u| u.starts_with("https://")));
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!("sandbox".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("Staging".parse::<Environment>().unwrap(), Environment::Staging);
        assert_eq!(" PROD ".parse::<Environment>().unwrap(), Environment::Production);
    }

    #[test]
    fn test_unknown_environment_fails() {
        let result = "preprod".parse::<Environment>();
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidEnvironment { value }) if value == "preprod"
        ));
    }

    #[test]
    fn test_endpoints() {
        let config = test_config(Environment::Staging, None);
        assert_eq!(
            config.token_url(),
            "https://test.api.myinfo.gov.sg/com/v3/token"
        );
        assert_eq!(
            config.person_url("S9812381D"),
            "https://test.api.myinfo.gov.sg/com/v3/person/S9812381D/"
        );
        assert_eq!(
            config.authorise_url(),
            "https://test.api.myinfo.gov.sg/com/v3/authorise"
        );
    }

    #[test]
    fn test_base_url_override_strips_trailing_slash() {
        let config = test_config(Environment::Production, Some("http://127.0.0.1:8080/"));
        assert_eq!(config.token_url(), "http://127.0.0.1:8080/token");
    }

    #[test]
    fn test_person_url_encodes_subject() {
        let config = test_config(Environment::Development, None);
        assert!(config.person_url("a/b").ends_with("/person/a%2Fb/"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = test_config(Environment::Development, None);
        let debug = format!("{:?}", config);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("\"secret\""));
    }
}
