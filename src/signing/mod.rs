//! Request Signing
//!
//! Parameter canonicalization and the `PKI_SIGN` authorization scheme.

mod canonical;
mod pki;

pub use canonical::{canonicalize, encode_canonical, encode_path_segment, percent_encode, query_string};
pub use pki::{
    base_string, current_timestamp, generate_nonce, parse_private_key, parse_public_key,
    verify_signature, RequestSigner, SignedHeader, AUTH_SCHEME, NONCE_BYTES, SIGNATURE_METHOD,
};
