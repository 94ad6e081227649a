//! Shipping details collected at the payment step.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Shipping fields in form order.
pub const SHIPPING_FIELDS: [&str; 7] = ["name", "email", "address", "city", "zip", "country", "phone"];

/// Validated, normalized shipping record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
}

/// Raw form input, keyed by field name. Unknown keys are carried but ignored
/// by validation.
///
/// Deserializing keeps string values only. Any other value is dropped, so a
/// known field sent as a number reads as missing and fails per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ShippingForm {
    fields: HashMap<String, String>,
}

impl ShippingForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.fields.insert(field.to_string(), value.into());
    }

    /// Value for `field`, empty when missing.
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }
}

impl<'de> Deserialize<'de> for ShippingForm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(field, value)| match value {
                Value::String(text) => Some((field, text)),
                _ => None,
            })
            .collect())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ShippingForm {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
