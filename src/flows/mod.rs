//! MyInfo Flows
//!
//! The protocol stages, leaf-first:
//!
//! - **Consent redirect**: builds the `/authorise` URL the user is sent to
//! - **Token exchange**: trades the authorization code for an access token
//! - **Identity**: verifies the access token and recovers the subject
//! - **Person**: fetches attribute-scoped person data

pub mod authorise;
pub mod identity;
pub mod person;
pub mod token;

pub use authorise::build_authorise_url;
pub use identity::{IdentityVerifier, JwtIdentityVerifier, MockIdentity, MockIdentityVerifier};
pub use person::PersonFetcher;
pub use token::TokenExchanger;
