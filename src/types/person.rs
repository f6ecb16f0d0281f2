//! Person Types
//!
//! The person endpoint's payload is treated as an opaque JSON object. Callers
//! that carry their own data-shape types can deserialize into them with
//! [`PersonRecord::deserialize_into`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sparse mapping of attribute name to attribute payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonRecord(Map<String, Value>);

impl PersonRecord {
    /// Wrap an already-parsed JSON object.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Raw payload of an attribute.
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.0.get(attribute)
    }

    /// The `value` member of a single-valued attribute.
    pub fn value_of(&self, attribute: &str) -> Option<&Value> {
        self.get(attribute).and_then(|v| v.get("value"))
    }

    /// Whether the attribute is absent or flagged `unavailable`.
    pub fn is_unavailable(&self, attribute: &str) -> bool {
        match self.get(attribute) {
            None | Some(Value::Null) => true,
            Some(v) => v
                .get("unavailable")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }

    /// Attribute names present in the record.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deserialize the record into a caller-provided shape.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Result of the full person data retrieval.
#[derive(Clone, PartialEq)]
pub struct PersonData {
    /// Access token the data was retrieved with.
    pub access_token: String,
    /// Verified subject identifier.
    pub subject: String,
    /// Person payload.
    pub data: PersonRecord,
}

impl std::fmt::Debug for PersonData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonData")
            .field("access_token", &"[REDACTED]")
            .field("subject", &self.subject)
            .field("attributes", &self.data.attribute_names().collect::<Vec<_>>())
            .finish()
    }
}
