//! Configuration Builder
//!
//! Fluent builder for MyInfo configuration.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::error::ConfigurationError;
use crate::types::{Environment, MyInfoConfig, DEFAULT_TIMEOUT_SECS};

/// Environment variable names read by [`MyInfoConfigBuilder::from_env`].
pub mod env_vars {
    pub const CLIENT_ID: &str = "MYINFO_CLIENT_ID";
    pub const CLIENT_SECRET: &str = "MYINFO_CLIENT_SECRET";
    pub const SP_ESVC_ID: &str = "MYINFO_SP_ESVC_ID";
    pub const REDIRECT_URI: &str = "MYINFO_REDIRECT_URI";
    pub const PRIVATE_KEY: &str = "MYINFO_PRIVATE_KEY";
    pub const PUBLIC_CERT: &str = "MYINFO_PUBLIC_CERT";
    pub const ENVIRONMENT: &str = "MYINFO_ENVIRONMENT";
    pub const BASE_URL: &str = "MYINFO_BASE_URL";
    pub const TIMEOUT_SECS: &str = "MYINFO_TIMEOUT_SECS";
}

/// MyInfo configuration builder.
pub struct MyInfoConfigBuilder {
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    service_provider_id: Option<String>,
    redirect_uri: Option<String>,
    private_key: Option<SecretString>,
    public_cert: Option<String>,
    environment: Environment,
    base_url: Option<String>,
    timeout: Duration,
}

impl Default for MyInfoConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MyInfoConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            service_provider_id: None,
            redirect_uri: None,
            private_key: None,
            public_cert: None,
            environment: Environment::default(),
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create a builder populated from `MYINFO_*` environment variables.
    ///
    /// Required values that are unset are left empty and reported by
    /// [`MyInfoConfigBuilder::build`].
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::new();
        builder.client_id = lookup(env_vars::CLIENT_ID);
        builder.client_secret = lookup(env_vars::CLIENT_SECRET).map(SecretString::new);
        builder.service_provider_id = lookup(env_vars::SP_ESVC_ID);
        builder.redirect_uri = lookup(env_vars::REDIRECT_URI);
        // PEM values are commonly stored on one line with escaped newlines.
        builder.private_key = lookup(env_vars::PRIVATE_KEY)
            .map(|v| SecretString::new(v.replace("\\n", "\n")));
        builder.public_cert = lookup(env_vars::PUBLIC_CERT).map(|v| v.replace("\\n", "\n"));
        builder.base_url = lookup(env_vars::BASE_URL).filter(|v| !v.trim().is_empty());

        if let Some(environment) = lookup(env_vars::ENVIRONMENT) {
            builder.environment = environment.parse()?;
        }

        if let Some(secs) = lookup(env_vars::TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| ConfigurationError::Environment {
                message: format!("{} must be a whole number of seconds, got {:?}", env_vars::TIMEOUT_SECS, secs),
            })?;
            builder.timeout = Duration::from_secs(secs);
        }

        Ok(builder)
    }

    /// Set client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(SecretString::new(client_secret.into()));
        self
    }

    /// Set service provider e-service id.
    pub fn service_provider_id(mut self, id: impl Into<String>) -> Self {
        self.service_provider_id = Some(id.into());
        self
    }

    /// Set redirect endpoint.
    pub fn redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    /// Set PEM private signing key.
    pub fn private_key(mut self, pem: impl Into<String>) -> Self {
        self.private_key = Some(SecretString::new(pem.into()));
        self
    }

    /// Set the gateway's PEM public key.
    pub fn public_cert(mut self, pem: impl Into<String>) -> Self {
        self.public_cert = Some(pem.into());
        self
    }

    /// Set environment.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Override the environment base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the MyInfo configuration.
    pub fn build(self) -> Result<MyInfoConfig, ConfigurationError> {
        let client_id = required("client_id", self.client_id)?;
        let client_secret = required(
            "client_secret",
            self.client_secret.map(|s| s.expose_secret().clone()),
        )?;
        let service_provider_id = required("service_provider_id", self.service_provider_id)?;
        let redirect_uri = required("redirect_uri", self.redirect_uri)?;
        let private_key = required(
            "private_key",
            self.private_key.map(|s| s.expose_secret().clone()),
        )?;
        let public_cert = required("public_cert", self.public_cert)?;

        if let Some(base_url) = &self.base_url {
            match url::Url::parse(base_url) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                _ => {
                    return Err(ConfigurationError::InvalidEndpoint {
                        url: base_url.clone(),
                    })
                }
            }
        }

        Ok(MyInfoConfig {
            client_id,
            client_secret: SecretString::new(client_secret),
            service_provider_id,
            redirect_uri,
            private_key: SecretString::new(trim_trailing_newline(private_key)),
            public_cert: trim_trailing_newline(public_cert),
            environment: self.environment,
            base_url: self.base_url,
            timeout: self.timeout,
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, ConfigurationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigurationError::MissingField {
            field: field.to_string(),
        }),
    }
}

fn trim_trailing_newline(mut value: String) -> String {
    if value.ends_with('\n') {
        value.pop();
        if value.ends_with('\r') {
            value.pop();
        }
    }
    value
}

/// Create a new MyInfo configuration builder.
pub fn myinfo_config() -> MyInfoConfigBuilder {
    MyInfoConfigBuilder::new()
}
