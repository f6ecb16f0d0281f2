//! Consent Redirect
//!
//! Builds the `/authorise` URL that starts a login. Pure; no I/O.

use crate::signing::query_string;
use crate::types::{join_attributes, AuthorizationRequest, AuthorizationUrl, MyInfoConfig};

/// Build the consent redirect URL.
///
/// Per-request service provider id and redirect endpoint override the
/// configured defaults. Query parameters are emitted in the order
/// `purpose, attributes, state, client_id, redirect_uri, sp_esvcId`.
pub fn build_authorise_url(
    config: &MyInfoConfig,
    request: &AuthorizationRequest,
) -> AuthorizationUrl {
    let redirect_uri = request
        .redirect_uri
        .as_deref()
        .unwrap_or(&config.redirect_uri);
    let service_provider_id = request
        .service_provider_id
        .as_deref()
        .unwrap_or(&config.service_provider_id);

    let attributes = join_attributes(&request.attributes);
    let params = [
        ("purpose", request.purpose.as_str()),
        ("attributes", attributes.as_str()),
        ("state", request.state.as_str()),
        ("client_id", config.client_id.as_str()),
        ("redirect_uri", redirect_uri),
        ("sp_esvcId", service_provider_id),
    ];

    AuthorizationUrl {
        url: format!("{}?{}", config.authorise_url(), query_string(&params)),
        state: request.state.clone(),
    }
}
