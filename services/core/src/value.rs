//! Typed document values in the Firestore wire format.
//!
//! Every value travels as a single-key object naming its type, e.g.
//! `{"stringValue": "Mumbai"}` or `{"integerValue": "5"}`. Integers are
//! string-encoded on the wire; timestamps are RFC 3339.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single document value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    NullValue(()),
    BooleanValue(bool),
    IntegerValue(#[serde(with = "integer_string")] i64),
    DoubleValue(f64),
    TimestampValue(DateTime<Utc>),
    StringValue(String),
    /// Base64-encoded bytes
    BytesValue(String),
    /// Full resource name of another document
    ReferenceValue(String),
    GeoPointValue(LatLng),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

/// Geographic point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

/// Array payload; the key is omitted entirely for an empty array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
}

/// Map payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: Fields,
}

/// Integers are sent as JSON strings but older emulators answer with numbers.
mod integer_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => s.parse().map_err(serde::de::Error::custom),
            serde_json::Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| serde::de::Error::custom(format!("integer out of range: {}", n))),
            other => Err(serde::de::Error::custom(format!(
                "expected integer, found {}",
                other
            ))),
        }
    }
}

impl Value {
    pub fn null() -> Self {
        Value::NullValue(())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::StringValue(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::IntegerValue(i) => Some(*i),
            _ => None,
        }
    }

    /// Doubles, or integers widened to doubles
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::DoubleValue(d) => Some(*d),
            Value::IntegerValue(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::BooleanValue(b) => Some(*b),
            _ => None,
        }
    }

    /// Timestamps, or strings holding an RFC 3339 timestamp
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::TimestampValue(t) => Some(*t),
            Value::StringValue(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::ArrayValue(a) => Some(&a.values),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Fields> {
        match self {
            Value::MapValue(m) => Some(&m.fields),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::BooleanValue(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::IntegerValue(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::IntegerValue(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::IntegerValue(v as i64)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::IntegerValue(v as i64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::IntegerValue(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::DoubleValue(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::StringValue(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::StringValue(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::TimestampValue(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::ArrayValue(ArrayValue { values })
    }
}

impl From<Fields> for Value {
    fn from(fields: Fields) -> Self {
        Value::MapValue(MapValue { fields })
    }
}

/// The named fields of a document or map value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, Value>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Read a field through one of the `Value::as_*` accessors, failing with
    /// a decode error naming the field when it is absent or mistyped.
    pub fn require<'a, T>(
        &'a self,
        key: &str,
        accessor: impl FnOnce(&'a Value) -> Option<T>,
        expected: &str,
    ) -> Result<T, StoreError> {
        self.0.get(key).and_then(accessor).ok_or_else(|| {
            StoreError::Decode(format!(
                "missing or invalid field `{}` (expected {})",
                key, expected
            ))
        })
    }
}

/// Types that can be written as a document body
pub trait ToFields {
    fn to_fields(&self) -> Fields;
}

/// Types that can be read back from a document body
pub trait FromFields: Sized {
    fn from_fields(fields: &Fields) -> Result<Self, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_integer_is_string_encoded() {
        let encoded = serde_json::to_value(Value::from(1299i64)).unwrap();
        assert_eq!(encoded, json!({ "integerValue": "1299" }));

        let decoded: Value = serde_json::from_value(json!({ "integerValue": "42" })).unwrap();
        assert_eq!(decoded, Value::IntegerValue(42));

        let numeric: Value = serde_json::from_value(json!({ "integerValue": 7 })).unwrap();
        assert_eq!(numeric, Value::IntegerValue(7));
    }

    #[test]
    fn test_null_and_empty_containers() {
        assert_eq!(
            serde_json::to_value(Value::null()).unwrap(),
            json!({ "nullValue": null })
        );

        let empty_array: Value = serde_json::from_value(json!({ "arrayValue": {} })).unwrap();
        assert_eq!(empty_array.as_array().map(|a| a.len()), Some(0));

        let empty_map: Value = serde_json::from_value(json!({ "mapValue": {} })).unwrap();
        assert!(empty_map.as_map().unwrap().is_empty());
    }

    #[test]
    fn test_nested_document_shape() {
        let review = Fields::new()
            .with("customerName", "Priya Sharma")
            .with("rating", 5i64)
            .with("verifiedPurchase", true);
        let body = Fields::new()
            .with("reviews", vec![Value::from(review)])
            .with("averageRating", 5.0);

        let encoded = serde_json::to_value(&body).unwrap();
        assert_eq!(
            encoded,
            json!({
                "averageRating": { "doubleValue": 5.0 },
                "reviews": { "arrayValue": { "values": [
                    { "mapValue": { "fields": {
                        "customerName": { "stringValue": "Priya Sharma" },
                        "rating": { "integerValue": "5" },
                        "verifiedPurchase": { "booleanValue": true }
                    } } }
                ] } }
            })
        );

        let decoded: Fields = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, body);
    }

    #[test]
    fn test_timestamp_accessor() {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();
        let decoded: Value =
            serde_json::from_value(json!({ "timestampValue": "2025-03-14T09:30:00Z" })).unwrap();
        assert_eq!(decoded.as_timestamp(), Some(at));

        // Timestamps written by hand as strings still read back
        assert_eq!(Value::from("2025-03-14T09:30:00+00:00").as_timestamp(), Some(at));
    }

    #[test]
    fn test_require_reports_field() {
        let fields = Fields::new().with("rating", "five");
        let err = fields.require("rating", Value::as_i64, "integer").unwrap_err();
        assert!(err.to_string().contains("`rating`"));

        let price = Fields::new().with("price", 899i64);
        assert_eq!(price.require("price", Value::as_f64, "number").unwrap(), 899.0);
    }
}
