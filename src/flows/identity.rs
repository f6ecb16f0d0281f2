//! Identity Token Verification
//!
//! The access token returned by the gateway is an RS256 JWT whose `sub`
//! claim is the subject identifier used to address person data.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{IdentityError, MalformedClaimsError, TokenVerificationError};

/// Recovers the subject identifier from an access token.
pub trait IdentityVerifier: Send + Sync {
    /// Verify the token and return its subject.
    fn extract_subject(&self, token: &str) -> Result<String, IdentityError>;
}

/// JWT verifier pinned to RS256.
pub struct JwtIdentityVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    /// Create a verifier from the gateway's PEM public key.
    pub fn new(public_key_pem: &str) -> Result<Self, TokenVerificationError> {
        let key = DecodingKey::from_rsa_pem(public_key_pem.trim().as_bytes())
            .map_err(TokenVerificationError::InvalidPublicKey)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = vec![Algorithm::RS256];
        // exp and nbf are checked when present but not required.
        validation.required_spec_claims = HashSet::new();
        validation.validate_nbf = true;
        validation.validate_aud = false;

        Ok(Self { key, validation })
    }
}

impl IdentityVerifier for JwtIdentityVerifier {
    fn extract_subject(&self, token: &str) -> Result<String, IdentityError> {
        let header = decode_header(token).map_err(TokenVerificationError::HeaderDecoding)?;

        // Checked before decoding so no other algorithm reaches the library.
        if header.alg != Algorithm::RS256 {
            warn!(algorithm = ?header.alg, "rejected identity token algorithm");
            return Err(TokenVerificationError::UnsupportedAlgorithm {
                algorithm: header.alg,
            }
            .into());
        }

        let data = decode::<Value>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                // Signature already verified; only the claim set failed to parse.
                ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                    IdentityError::from(MalformedClaimsError::InvalidPayload {
                        message: e.to_string(),
                    })
                }
                _ => IdentityError::from(TokenVerificationError::Decoding(e)),
            }
        })?;

        let claims = match data.claims {
            Value::Object(claims) => claims,
            _ => return Err(MalformedClaimsError::NotAnObject.into()),
        };

        let subject = claims
            .get("sub")
            .and_then(Value::as_str)
            .ok_or(MalformedClaimsError::MissingSubject)?;

        debug!("identity token verified");
        Ok(subject.to_string())
    }
}

impl std::fmt::Debug for JwtIdentityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIdentityVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish()
    }
}

/// Outcome a [`MockIdentityVerifier`] produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockIdentity {
    Subject(String),
    UnsupportedAlgorithm(Algorithm),
    NotAnObject,
    MissingSubject,
}

/// Mock identity verifier for testing.
pub struct MockIdentityVerifier {
    outcome: Mutex<MockIdentity>,
    tokens: Mutex<Vec<String>>,
}

impl MockIdentityVerifier {
    /// Verifier that accepts every token as the given subject.
    pub fn with_subject(subject: impl Into<String>) -> Self {
        Self::with_outcome(MockIdentity::Subject(subject.into()))
    }

    pub fn with_outcome(outcome: MockIdentity) -> Self {
        Self {
            outcome: Mutex::new(outcome),
            tokens: Mutex::new(Vec::new()),
        }
    }

    /// Change the outcome of later calls.
    pub fn set_outcome(&self, outcome: MockIdentity) {
        *self
            .outcome
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = outcome;
    }

    /// Tokens seen so far.
    pub fn get_tokens(&self) -> Vec<String> {
        self.tokens
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl IdentityVerifier for MockIdentityVerifier {
    fn extract_subject(&self, token: &str) -> Result<String, IdentityError> {
        self.tokens
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(token.to_string());

        let outcome = self
            .outcome
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();

        match outcome {
            MockIdentity::Subject(subject) => Ok(subject),
            MockIdentity::UnsupportedAlgorithm(algorithm) => {
                Err(TokenVerificationError::UnsupportedAlgorithm { algorithm }.into())
            }
            MockIdentity::NotAnObject => Err(MalformedClaimsError::NotAnObject.into()),
            MockIdentity::MissingSubject => Err(MalformedClaimsError::MissingSubject.into()),
        }
    }
}
