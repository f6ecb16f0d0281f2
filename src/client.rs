//! MyInfo Client
//!
//! High-level client that sequences the protocol stages into the
//! "retrieve person data" operation.

use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::core::{HttpTransport, ReqwestHttpTransport};
use crate::error::{MyInfoError, TokenExchangeError};
use crate::flows::{
    build_authorise_url, IdentityVerifier, JwtIdentityVerifier, PersonFetcher, TokenExchanger,
};
use crate::signing::RequestSigner;
use crate::types::{
    AuthorizationRequest, AuthorizationUrl, CallbackParams, MyInfoConfig, PersonData,
    PersonRecord, TokenResponse,
};

/// MyInfo client.
///
/// Holds only immutable state, so one instance can serve concurrent
/// operations without locking.
pub struct MyInfoClient<
    T: HttpTransport = ReqwestHttpTransport,
    V: IdentityVerifier = JwtIdentityVerifier,
> {
    config: Arc<MyInfoConfig>,
    transport: Arc<T>,
    verifier: Arc<V>,
    signer: Arc<RequestSigner>,
}

impl MyInfoClient<ReqwestHttpTransport, JwtIdentityVerifier> {
    /// Create a client with the reqwest transport and RS256 token verifier.
    pub fn new(config: MyInfoConfig) -> Result<Self, MyInfoError> {
        let transport = ReqwestHttpTransport::new(config.timeout)?;
        let verifier = JwtIdentityVerifier::new(&config.public_cert)?;
        Self::with_components(config, transport, verifier)
    }
}

impl<T: HttpTransport, V: IdentityVerifier> MyInfoClient<T, V> {
    /// Create a client with custom transport and verifier.
    ///
    /// Fails if the configured private key cannot be parsed.
    pub fn with_components(
        config: MyInfoConfig,
        transport: T,
        verifier: V,
    ) -> Result<Self, MyInfoError> {
        let signer = RequestSigner::new(config.client_id.clone(), config.private_key_pem())?;

        Ok(Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
            verifier: Arc::new(verifier),
            signer: Arc::new(signer),
        })
    }

    /// Get the MyInfo configuration.
    pub fn config(&self) -> &MyInfoConfig {
        &self.config
    }

    fn token_exchanger(&self) -> TokenExchanger<T> {
        TokenExchanger::new(
            self.config.clone(),
            self.transport.clone(),
            self.signer.clone(),
        )
    }

    fn person_fetcher(&self) -> PersonFetcher<T> {
        PersonFetcher::new(
            self.config.clone(),
            self.transport.clone(),
            self.signer.clone(),
        )
    }

    /// Build the consent redirect URL.
    pub fn authorise_url(&self, request: &AuthorizationRequest) -> AuthorizationUrl {
        build_authorise_url(&self.config, request)
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, MyInfoError> {
        self.token_exchanger()
            .exchange_code(code)
            .await
            .map_err(|e| stage_failed(e.into()))
    }

    /// Verify an access token and return its subject identifier.
    pub fn extract_subject(&self, access_token: &str) -> Result<String, MyInfoError> {
        self.verifier
            .extract_subject(access_token)
            .map_err(|e| stage_failed(e.into()))
    }

    /// Fetch person data, verifying the token for its subject when none is given.
    pub async fn fetch_person<S: AsRef<str> + Send + Sync>(
        &self,
        access_token: &str,
        attributes: &[S],
        subject: Option<&str>,
    ) -> Result<PersonRecord, MyInfoError> {
        let subject = match subject {
            Some(subject) => subject.to_string(),
            None => self.extract_subject(access_token)?,
        };

        self.person_fetcher()
            .fetch(access_token, &subject, attributes)
            .await
            .map_err(|e| stage_failed(e.into()))
    }

    /// Retrieve person data for an authorization code.
    ///
    /// Runs token exchange, token verification and the person request in
    /// order; the first failing stage aborts the operation.
    #[instrument(skip(self, code, attributes), fields(client_id = %self.config.client_id))]
    pub async fn get_person_data<S: AsRef<str> + Send + Sync>(
        &self,
        code: &str,
        attributes: &[S],
    ) -> Result<PersonData, MyInfoError> {
        let token = self.exchange_code(code).await?;
        debug!("access token obtained");

        let subject = self.extract_subject(&token.access_token)?;
        debug!("subject recovered from access token");

        let data = self
            .fetch_person(&token.access_token, attributes, Some(&subject))
            .await?;
        debug!(attributes = data.len(), "person data retrieved");

        Ok(PersonData {
            access_token: token.access_token,
            subject,
            data,
        })
    }

    /// Retrieve person data from the consent callback.
    ///
    /// When `expected_state` is given, the callback's state must match it.
    pub async fn get_person_data_from_callback<S: AsRef<str> + Send + Sync>(
        &self,
        callback: CallbackParams,
        expected_state: Option<&str>,
        attributes: &[S],
    ) -> Result<PersonData, MyInfoError> {
        if let Some(expected) = expected_state {
            let received = callback.state.as_deref().unwrap_or("");
            if received != expected {
                return Err(stage_failed(
                    TokenExchangeError::StateMismatch {
                        expected: expected.to_string(),
                        received: received.to_string(),
                    }
                    .into(),
                ));
            }
        }

        let code = callback.into_code().map_err(|e| stage_failed(e.into()))?;
        self.get_person_data(&code, attributes).await
    }
}

fn stage_failed(error: MyInfoError) -> MyInfoError {
    warn!(code = error.error_code(), %error, "myinfo operation failed");
    error
}

impl<T: HttpTransport, V: IdentityVerifier> std::fmt::Debug for MyInfoClient<T, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MyInfoClient")
            .field("config", &self.config)
            .field("signer", &self.signer)
            .finish()
    }
}

/// Create a MyInfo client with default components.
pub fn myinfo_client(config: MyInfoConfig) -> Result<MyInfoClient, MyInfoError> {
    MyInfoClient::new(config)
}
