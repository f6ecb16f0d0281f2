//! MyInfo Error Types
//!
//! One root error per failed operation, with one variant per protocol stage.

use std::time::Duration;
use thiserror::Error;

/// Root error type for MyInfo operations.
///
/// The variant identifies the stage that failed; its `Display` output is
/// prefixed with the stage so a single message reads as a cause chain.
#[derive(Error, Debug)]
pub enum MyInfoError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Request signing failed: {0}")]
    Signing(#[from] SigningError),

    #[error("Token exchange failed: {0}")]
    TokenExchange(#[from] TokenExchangeError),

    #[error("Token verification failed: {0}")]
    TokenVerification(#[from] TokenVerificationError),

    #[error("Malformed token claims: {0}")]
    MalformedClaims(#[from] MalformedClaimsError),

    #[error("Person data retrieval failed: {0}")]
    ResourceFetch(#[from] ResourceFetchError),
}

/// Protocol stage an error originated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Configuration,
    Signing,
    TokenExchange,
    TokenVerification,
    MalformedClaims,
    ResourceFetch,
}

impl MyInfoError {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "MYINFO_CONFIG",
            Self::Signing(_) => "MYINFO_SIGNING",
            Self::TokenExchange(_) => "MYINFO_TOKEN_EXCHANGE",
            Self::TokenVerification(_) => "MYINFO_TOKEN_VERIFICATION",
            Self::MalformedClaims(_) => "MYINFO_MALFORMED_CLAIMS",
            Self::ResourceFetch(_) => "MYINFO_RESOURCE_FETCH",
        }
    }

    /// Get the stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Configuration(_) => Stage::Configuration,
            Self::Signing(_) => Stage::Signing,
            Self::TokenExchange(_) => Stage::TokenExchange,
            Self::TokenVerification(_) => Stage::TokenVerification,
            Self::MalformedClaims(_) => Stage::MalformedClaims,
            Self::ResourceFetch(_) => Stage::ResourceFetch,
        }
    }

    /// Check if the end user must log in again to recover.
    pub fn needs_reauth(&self) -> bool {
        match self {
            Self::TokenVerification(_) | Self::MalformedClaims(_) => true,
            Self::TokenExchange(TokenExchangeError::AuthorizationDenied { .. }) => true,
            Self::TokenExchange(TokenExchangeError::HttpStatus { status, .. })
            | Self::ResourceFetch(ResourceFetchError::HttpStatus { status, .. }) => {
                matches!(status, 400 | 401 | 403)
            }
            _ => false,
        }
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Unknown environment: {value}")]
    InvalidEnvironment { value: String },

    #[error("Invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },

    #[error("Environment variable error: {message}")]
    Environment { message: String },
}

/// Request signing error.
#[derive(Error, Debug)]
pub enum SigningError {
    #[error("Invalid private key: {message}")]
    InvalidPrivateKey { message: String },

    #[error("Invalid public key: {message}")]
    InvalidPublicKey { message: String },

    #[error("Signing failed: {message}")]
    SigningFailed { message: String },

    #[error("Invalid signature: {message}")]
    InvalidSignature { message: String },

    #[error("Malformed authorization header: {message}")]
    MalformedHeader { message: String },
}

/// HTTP transport error.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Unexpected redirect to: {location}")]
    UnexpectedRedirect { location: String },

    #[error("Response too large: {size} bytes")]
    ResponseTooLarge { size: usize },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },
}

/// Authorization code to access token exchange error.
#[derive(Error, Debug)]
pub enum TokenExchangeError {
    #[error("Authorization denied: {error}")]
    AuthorizationDenied {
        error: String,
        error_description: Option<String>,
    },

    #[error("Missing authorization code in callback")]
    MissingCode,

    #[error("State mismatch (expected {expected}, received {received})")]
    StateMismatch { expected: String, received: String },

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    #[error("Response has no access_token")]
    MissingAccessToken,
}

/// Identity token verification error.
#[derive(Error, Debug)]
pub enum TokenVerificationError {
    #[error("Invalid verification key: {0}")]
    InvalidPublicKey(jsonwebtoken::errors::Error),

    #[error("Failed to decode token header: {0}")]
    HeaderDecoding(jsonwebtoken::errors::Error),

    #[error("Unsupported token algorithm: {algorithm:?} (only RS256 is accepted)")]
    UnsupportedAlgorithm { algorithm: jsonwebtoken::Algorithm },

    #[error("Failed to verify token: {0}")]
    Decoding(jsonwebtoken::errors::Error),
}

/// Verified token whose claims do not carry a subject.
#[derive(Error, Debug)]
pub enum MalformedClaimsError {
    #[error("Claims are not a JSON object")]
    NotAnObject,

    #[error("Claims have no string 'sub' field")]
    MissingSubject,

    #[error("Claims could not be decoded: {message}")]
    InvalidPayload { message: String },
}

/// Failure to recover a subject from an identity token.
///
/// Verification and claim-shape failures stay distinct so the orchestration
/// can report them as separate stages.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error(transparent)]
    Verification(#[from] TokenVerificationError),

    #[error(transparent)]
    Claims(#[from] MalformedClaimsError),
}

impl From<IdentityError> for MyInfoError {
    fn from(error: IdentityError) -> Self {
        match error {
            IdentityError::Verification(e) => Self::TokenVerification(e),
            IdentityError::Claims(e) => Self::MalformedClaims(e),
        }
    }
}

/// Protected person endpoint error.
#[derive(Error, Debug)]
pub enum ResourceFetchError {
    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },
}

/// Result type for MyInfo operations.
pub type MyInfoResult<T> = Result<T, MyInfoError>;

/// Error body returned by the MyInfo gateway.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl ErrorResponse {
    /// Best human-readable message in the body.
    pub fn best_message(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.error_description.clone())
            .or_else(|| self.error.clone())
    }
}

/// Parse error response from HTTP body.
pub fn parse_error_response(body: &str) -> Option<ErrorResponse> {
    serde_json::from_str(body).ok()
}

/// Extract a message from a non-success response body.
pub fn error_message_from_body(status: u16, body: &str) -> String {
    if let Some(message) = parse_error_response(body).and_then(|r| r.best_message()) {
        return message;
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.chars().take(512).collect()
    }
}

/// Get user-friendly error message.
pub fn get_user_message(error: &MyInfoError) -> String {
    match error {
        MyInfoError::Configuration(_) | MyInfoError::Signing(_) => {
            "The service is not configured correctly. Please contact support.".to_string()
        }
        MyInfoError::TokenExchange(TokenExchangeError::AuthorizationDenied { .. }) => {
            "Consent was not given. Please try again and approve the request.".to_string()
        }
        MyInfoError::TokenExchange(TokenExchangeError::StateMismatch { .. }) => {
            "Security validation failed. Please restart the sign-in process.".to_string()
        }
        MyInfoError::TokenVerification(_) | MyInfoError::MalformedClaims(_) => {
            "Your identity could not be verified. Please sign in again.".to_string()
        }
        MyInfoError::TokenExchange(TokenExchangeError::Transport(_))
        | MyInfoError::ResourceFetch(ResourceFetchError::Transport(_)) => {
            "The service could not be reached. Please try again later.".to_string()
        }
        _ => "Your information could not be retrieved. Please try again.".to_string(),
    }
}
