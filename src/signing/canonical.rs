//! Canonical parameter ordering and encoding.
//!
//! Both the signer and the gateway rebuild the signed parameter string from
//! the same inputs, so key order and percent-encoding here are part of the
//! signing contract.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::BTreeMap;

/// Characters left unencoded: the RFC 3986 unreserved set.
///
/// Everything else, including `/`, `,`, `:` and space, is percent-encoded.
/// Space becomes `%20`, never `+`.
const UNRESERVED_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a query key or value.
///
/// # Examples
///
/// ```
/// use myinfo_integration::signing::percent_encode;
///
/// assert_eq!(percent_encode("name,email"), "name%2Cemail");
/// assert_eq!(percent_encode("a b"), "a%20b");
/// ```
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, UNRESERVED_SET).to_string()
}

/// Percent-encode a single URL path segment (slashes included).
pub fn encode_path_segment(input: &str) -> String {
    utf8_percent_encode(input, UNRESERVED_SET).to_string()
}

/// Order parameters by key, ascending by code point.
///
/// Returns a new mapping; the input is not modified. When a key appears more
/// than once the last value wins.
///
/// # Examples
///
/// ```
/// use myinfo_integration::signing::canonicalize;
///
/// let sorted = canonicalize([("nonce", "1"), ("app_id", "APP")]);
/// let keys: Vec<_> = sorted.keys().map(String::as_str).collect();
/// assert_eq!(keys, vec!["app_id", "nonce"]);
/// ```
pub fn canonicalize<I, K, V>(params: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    params
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
        .collect()
}

/// Encode canonical parameters as `key=value&key=value`.
pub fn encode_canonical(params: &BTreeMap<String, String>) -> String {
    encode_pairs(params.iter())
}

/// Encode parameters as a query string, keeping the given order.
pub fn query_string<K: AsRef<str>, V: AsRef<str>>(params: &[(K, V)]) -> String {
    encode_pairs(params.iter().map(|(k, v)| (k, v)))
}

fn encode_pairs<'a, I, K, V>(pairs: I) -> String
where
    I: Iterator<Item = (&'a K, &'a V)>,
    K: AsRef<str> + 'a + ?Sized,
    V: AsRef<str> + 'a + ?Sized,
{
    pairs
        .map(|(k, v)| {
            format!(
                "{}={}",
                percent_encode(k.as_ref()),
                percent_encode(v.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
