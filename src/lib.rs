//! MyInfo Integration Module
//!
//! Client for the MyInfo person data API: consent redirect, authorization
//! code exchange, identity token verification and PKI-signed person data
//! retrieval.
//!
//! # Features
//!
//! - `PKI_SIGN` request signing (RSA-SHA256 over a canonical base string)
//! - RS256-only identity token verification
//! - Attribute-scoped person data retrieval
//! - Stage-tagged errors for the combined operation
//!
//! # Example
//!
//! ```rust,ignore
//! use myinfo_integration::{myinfo_config, AuthorizationRequest, Environment, MyInfoClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = myinfo_config()
//!         .client_id("STG2-MYINFO-SELF-TEST")
//!         .client_secret(std::env::var("MYINFO_CLIENT_SECRET")?)
//!         .service_provider_id("MYINFO-CONSENTPLATFORM")
//!         .redirect_uri("http://localhost:3001/callback")
//!         .private_key(std::fs::read_to_string("client.pem")?)
//!         .public_cert(std::fs::read_to_string("gateway.pem")?)
//!         .environment(Environment::Staging)
//!         .build()?;
//!
//!     let client = MyInfoClient::new(config)?;
//!
//!     let redirect = client.authorise_url(&AuthorizationRequest::new(
//!         "Account opening",
//!         ["name", "email", "regadd"],
//!         "relay-state",
//!     ));
//!     println!("Send the user to: {}", redirect.url);
//!
//!     // After the user returns with ?code=...
//!     let person = client.get_person_data("auth-code", &["name", "email", "regadd"]).await?;
//!     println!("{:?}", person.data.value_of("name"));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: configuration, request and response types
//! - `error`: stage-tagged error hierarchy
//! - `core`: HTTP transport
//! - `signing`: parameter canonicalization and `PKI_SIGN` headers
//! - `flows`: the protocol stages
//! - `builders`: fluent configuration builder
//! - `client`: high-level client sequencing the stages

pub mod builders;
pub mod client;
pub mod core;
pub mod error;
pub mod flows;
pub mod signing;
pub mod types;

// Re-export main client
pub use client::{myinfo_client, MyInfoClient};

// Re-export builders
pub use builders::{myinfo_config, MyInfoConfigBuilder};

// Re-export errors
pub use error::{
    get_user_message, ConfigurationError, IdentityError, MalformedClaimsError, MyInfoError,
    MyInfoResult, ResourceFetchError, SigningError, Stage, TokenExchangeError,
    TokenVerificationError, TransportError,
};

// Re-export transport
pub use crate::core::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport, ReqwestHttpTransport,
};

// Re-export flows
pub use flows::{IdentityVerifier, JwtIdentityVerifier, MockIdentity, MockIdentityVerifier};

// Re-export signing
pub use signing::{RequestSigner, SignedHeader};

// Re-export types
pub use types::{
    AuthorizationRequest, AuthorizationUrl, CallbackParams, Environment, MyInfoConfig,
    PersonData, PersonRecord, TokenResponse,
};
