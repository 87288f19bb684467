//! # Canonical Value Model
//!
//! [`CanonicalValue`] is the universal, format-agnostic value model the
//! canonicalizer operates on: null, boolean, number, string, ordered
//! sequence, and string-keyed mapping.
//!
//! Mappings are stored as an ordered list of `(key, value)` pairs. Insertion
//! order is kept in memory so that order-independence of the canonical form
//! is observable, and so that a duplicate key coming from any producer is
//! detectable instead of being silently collapsed by a map type.
//!
//! ## Parsing
//!
//! The `Deserialize` impl works with any self-describing serde format
//! (`serde_json`, `serde_yaml`) and rejects duplicate mapping keys at parse
//! time. [`CanonicalValue::from_json_str()`] maps parse failures to
//! [`CanonicalizationError::MalformedValue`].

use std::collections::BTreeSet;
use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{self, SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CanonicalizationError;

/// A JSON-model number.
///
/// Integers that fit in `i64`/`u64` are kept exact. Everything else is an
/// IEEE-754 double. `Float` may hold NaN or an infinity in memory; such a
/// value is rejected when canonicalized or serialized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed integer.
    Int(i64),
    /// Unsigned integer above `i64::MAX`, or any non-negative integer
    /// produced by a `u64` source.
    UInt(u64),
    /// Double-precision value.
    Float(f64),
}

impl Number {
    /// Returns true unless this is a NaN or infinite float.
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Int(_) | Self::UInt(_) => true,
            Self::Float(f) => f.is_finite(),
        }
    }

    /// Returns the value as `u64` if it is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Self::Int(i) => u64::try_from(i).ok(),
            Self::UInt(u) => Some(u),
            Self::Float(_) => None,
        }
    }
}

/// A structured value in the canonical value model.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalValue {
    /// `null`.
    Null,
    /// `true` / `false`.
    Bool(bool),
    /// Integer or decimal number.
    Number(Number),
    /// Sequence of Unicode scalar values.
    String(String),
    /// Ordered sequence; order is significant.
    Array(Vec<CanonicalValue>),
    /// String-keyed mapping in insertion order. Keys must be unique.
    Object(Vec<(String, CanonicalValue)>),
}

impl CanonicalValue {
    /// An empty mapping, `{}`.
    pub fn empty_object() -> Self {
        Self::Object(Vec::new())
    }

    /// Build a mapping from `(key, value)` pairs, keeping their order.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, CanonicalValue)>,
    {
        Self::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Parse a JSON document into the value model.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalizationError::MalformedValue`] for invalid JSON and
    /// for mappings that repeat a key.
    pub fn from_json_str(s: &str) -> Result<Self, CanonicalizationError> {
        serde_json::from_str(s).map_err(|e| CanonicalizationError::MalformedValue(e.to_string()))
    }

    /// Parse a JSON document from raw bytes. See [`Self::from_json_str()`].
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, CanonicalizationError> {
        serde_json::from_slice(bytes)
            .map_err(|e| CanonicalizationError::MalformedValue(e.to_string()))
    }

    /// Look up a mapping entry by key. Returns `None` for non-mappings.
    pub fn get(&self, key: &str) -> Option<&CanonicalValue> {
        match self {
            Self::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// The mapping entries, if this is a mapping.
    pub fn as_object(&self) -> Option<&[(String, CanonicalValue)]> {
        match self {
            Self::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// The string content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The value as `u64`, if this is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    /// Returns true for `{}`.
    pub fn is_empty_object(&self) -> bool {
        matches!(self, Self::Object(entries) if entries.is_empty())
    }
}

impl From<bool> for CanonicalValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for CanonicalValue {
    fn from(i: i64) -> Self {
        Self::Number(Number::Int(i))
    }
}

impl From<i32> for CanonicalValue {
    fn from(i: i32) -> Self {
        Self::Number(Number::Int(i64::from(i)))
    }
}

impl From<u64> for CanonicalValue {
    fn from(u: u64) -> Self {
        match i64::try_from(u) {
            Ok(i) => Self::Number(Number::Int(i)),
            Err(_) => Self::Number(Number::UInt(u)),
        }
    }
}

impl From<f64> for CanonicalValue {
    fn from(f: f64) -> Self {
        Self::Number(Number::Float(f))
    }
}

impl From<&str> for CanonicalValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for CanonicalValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<CanonicalValue>> for CanonicalValue {
    fn from(items: Vec<CanonicalValue>) -> Self {
        Self::Array(items)
    }
}

impl From<serde_json::Value> for CanonicalValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Number(Number::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Self::Number(Number::UInt(u))
                } else {
                    // serde_json numbers are always representable as f64.
                    Self::Number(Number::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

impl Serialize for CanonicalValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(Number::Int(i)) => serializer.serialize_i64(*i),
            Self::Number(Number::UInt(u)) => serializer.serialize_u64(*u),
            Self::Number(Number::Float(f)) => {
                // serde_json would write NaN as `null`; refuse instead.
                if !f.is_finite() {
                    return Err(ser::Error::custom(format!(
                        "non-finite number {f} cannot be serialized"
                    )));
                }
                serializer.serialize_f64(*f)
            }
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for CanonicalValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CanonicalValueVisitor)
    }
}

struct CanonicalValueVisitor;

impl<'de> Visitor<'de> for CanonicalValueVisitor {
    type Value = CanonicalValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON-model value (null, bool, number, string, array, or string-keyed map)")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(CanonicalValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(CanonicalValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        CanonicalValue::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Self::Value, E> {
        Ok(CanonicalValue::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, i: i64) -> Result<Self::Value, E> {
        Ok(CanonicalValue::Number(Number::Int(i)))
    }

    fn visit_u64<E: de::Error>(self, u: u64) -> Result<Self::Value, E> {
        Ok(CanonicalValue::from(u))
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> Result<Self::Value, E> {
        Ok(CanonicalValue::Number(Number::Float(f)))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
        Ok(CanonicalValue::String(s.to_owned()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Self::Value, E> {
        Ok(CanonicalValue::String(s))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(CanonicalValue::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut seen = BTreeSet::new();
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(key) = map.next_key::<String>()? {
            if !seen.insert(key.clone()) {
                return Err(de::Error::custom(format!("duplicate key {key:?}")));
            }
            let value = map.next_value()?;
            entries.push((key, value));
        }
        Ok(CanonicalValue::Object(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_insertion_order() {
        let v = CanonicalValue::from_json_str(r#"{"z":1,"a":2}"#).unwrap();
        let keys: Vec<&str> = v.as_object().unwrap().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn parse_rejects_duplicate_keys() {
        let err = CanonicalValue::from_json_str(r#"{"a":1,"a":2}"#).unwrap_err();
        match err {
            CanonicalizationError::MalformedValue(msg) => assert!(msg.contains("duplicate key")),
            other => panic!("expected MalformedValue, got: {other}"),
        }
    }

    #[test]
    fn parse_rejects_nested_duplicate_keys() {
        let result = CanonicalValue::from_json_str(r#"{"outer":[{"k":true,"k":false}]}"#);
        assert!(matches!(result, Err(CanonicalizationError::MalformedValue(_))));
    }

    #[test]
    fn parse_rejects_invalid_json() {
        assert!(CanonicalValue::from_json_str("{not json").is_err());
        assert!(CanonicalValue::from_json_str("").is_err());
    }

    #[test]
    fn integers_stay_exact() {
        let v = CanonicalValue::from_json_str("[-5, 18446744073709551615]").unwrap();
        assert_eq!(
            v,
            CanonicalValue::Array(vec![
                CanonicalValue::Number(Number::Int(-5)),
                CanonicalValue::Number(Number::UInt(u64::MAX)),
            ])
        );
    }

    #[test]
    fn decimals_parse_as_float() {
        let v = CanonicalValue::from_json_str("100.0").unwrap();
        assert_eq!(v, CanonicalValue::Number(Number::Float(100.0)));
    }

    #[test]
    fn get_looks_up_keys() {
        let v = CanonicalValue::object([("amount", 1000i64.into()), ("source", "simulation".into())]);
        assert_eq!(v.get("amount").and_then(CanonicalValue::as_u64), Some(1000));
        assert_eq!(v.get("source").and_then(CanonicalValue::as_str), Some("simulation"));
        assert!(v.get("missing").is_none());
        assert!(CanonicalValue::Null.get("amount").is_none());
    }

    #[test]
    fn from_serde_json_value() {
        let v: CanonicalValue = serde_json::json!({"a": [1, 2.5, null, "x", true]}).into();
        let items = match v.get("a") {
            Some(CanonicalValue::Array(items)) => items.clone(),
            other => panic!("expected array, got {other:?}"),
        };
        assert_eq!(items[0], CanonicalValue::from(1i64));
        assert_eq!(items[1], CanonicalValue::from(2.5));
        assert_eq!(items[2], CanonicalValue::Null);
    }

    #[test]
    fn serialize_refuses_nan() {
        let v = CanonicalValue::Array(vec![f64::NAN.into()]);
        assert!(serde_json::to_string(&v).is_err());
    }

    #[test]
    fn serialize_preserves_insertion_order() {
        let v = CanonicalValue::object([("b", 1i64.into()), ("a", 2i64.into())]);
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"{"b":1,"a":2}"#);
    }

    #[test]
    fn u64_conversion_prefers_int() {
        assert_eq!(CanonicalValue::from(7u64), CanonicalValue::Number(Number::Int(7)));
        assert_eq!(
            CanonicalValue::from(u64::MAX),
            CanonicalValue::Number(Number::UInt(u64::MAX))
        );
    }

    #[test]
    fn empty_object_helpers() {
        assert!(CanonicalValue::empty_object().is_empty_object());
        assert!(!CanonicalValue::Null.is_empty_object());
    }
}
