//! Callback Types
//!
//! Types for handling the redirect back from the consent page.

use url::Url;

use crate::error::TokenExchangeError;

/// Callback parameters from the consent redirect.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
    /// Authorization code (if consent was given).
    pub code: Option<String>,
    /// Relay state.
    pub state: Option<String>,
    /// Error code (if consent failed).
    pub error: Option<String>,
    /// Error description.
    pub error_description: Option<String>,
}

impl CallbackParams {
    /// Parse callback parameters from URL.
    pub fn from_url(url: &Url) -> Self {
        let mut params = Self::default();

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => params.code = Some(value.into_owned()),
                "state" => params.state = Some(value.into_owned()),
                "error" => params.error = Some(value.into_owned()),
                "error_description" => params.error_description = Some(value.into_owned()),
                _ => {}
            }
        }

        params
    }

    /// Parse callback parameters from URL string.
    pub fn from_url_str(url_str: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(url_str)?;
        Ok(Self::from_url(&url))
    }

    /// Check if callback contains an error.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Check if callback is successful.
    pub fn is_success(&self) -> bool {
        self.code.is_some() && self.error.is_none()
    }

    /// Take the authorization code, failing if consent was refused.
    pub fn into_code(self) -> Result<String, TokenExchangeError> {
        if let Some(error) = self.error {
            return Err(TokenExchangeError::AuthorizationDenied {
                error,
                error_description: self.error_description,
            });
        }

        self.code
            .filter(|c| !c.is_empty())
            .ok_or(TokenExchangeError::MissingCode)
    }
}
