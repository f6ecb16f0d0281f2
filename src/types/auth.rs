//! Authorization Types
//!
//! Types for the consent redirect.

/// Parameters for the consent redirect URL.
#[derive(Clone, Debug, Default)]
pub struct AuthorizationRequest {
    /// Purpose shown to the end user on the consent page.
    pub purpose: String,
    /// Requested attributes, in order. Dotted sub-attribute paths are allowed.
    pub attributes: Vec<String>,
    /// Opaque relay state echoed back on the callback.
    pub state: String,
    /// Service provider id override.
    pub service_provider_id: Option<String>,
    /// Redirect endpoint override.
    pub redirect_uri: Option<String>,
}

impl AuthorizationRequest {
    /// Create a request for the given purpose, attributes and relay state.
    pub fn new<I, S>(purpose: impl Into<String>, attributes: I, state: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            purpose: purpose.into(),
            attributes: attributes.into_iter().map(Into::into).collect(),
            state: state.into(),
            service_provider_id: None,
            redirect_uri: None,
        }
    }

    /// Override the service provider id for this request.
    pub fn with_service_provider_id(mut self, id: impl Into<String>) -> Self {
        self.service_provider_id = Some(id.into());
        self
    }

    /// Override the redirect endpoint for this request.
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }
}

/// Result of consent URL generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationUrl {
    /// The URL to redirect the user to.
    pub url: String,
    /// Relay state sent with the request.
    pub state: String,
}

/// Join attribute scopes into the comma separated form the gateway expects.
pub fn join_attributes<S: AsRef<str>>(attributes: &[S]) -> String {
    attributes
        .iter()
        .map(|a| a.as_ref())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = AuthorizationRequest::new("demo", ["name", "email"], "xyz")
            .with_service_provider_id("SVC2")
            .with_redirect_uri("https://other.example/cb");

        assert_eq!(request.attributes, vec!["name", "email"]);
        assert_eq!(request.service_provider_id.as_deref(), Some("SVC2"));
        assert_eq!(request.redirect_uri.as_deref(), Some("https://other.example/cb"));
    }

    #[test]
    fn test_join_attributes_keeps_order_and_paths() {
        assert_eq!(
            join_attributes(&["uinfin", "name", "regadd.postal"]),
            "uinfin,name,regadd.postal"
        );
        assert_eq!(join_attributes::<&str>(&[]), "");
    }
}
