//! # Canonical Serialization: RFC 8785-Aligned Byte Production
//!
//! This module defines `CanonicalBytes`, the sole construction path for bytes
//! used in digest computation across the kernel.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through [`CanonicalBytes::new()`] (or its alias
//! [`canonicalize()`]), which walks a [`CanonicalValue`] with an exhaustive
//! match. Any function requiring canonical bytes for digest computation
//! accepts `&CanonicalBytes`, so there is no second serialization path that
//! could disagree with this one.
//!
//! ## Rules
//!
//! 1. **Mappings**: entries sorted by the byte-wise order of their UTF-8
//!    keys, rendered `{"k":v,...}`. A repeated key is `MalformedValue`.
//! 2. **Sequences**: `[v,...]` in input order.
//! 3. **Strings**: quoted; `"` and `\` escaped, the seven short escapes
//!    `\b \f \n \r \t` used where they exist, other control characters below
//!    U+0020 as `\u00xx`. Non-ASCII is written as literal UTF-8.
//! 4. **Numbers**: integers as plain decimal; doubles per ECMAScript
//!    `Number::toString` (see `number.rs`). NaN and infinities are
//!    `NonCanonicalizableNumber`.
//! 5. **Literals**: `true`, `false`, `null`.
//!
//! No insignificant whitespace is emitted anywhere.

use crate::error::CanonicalizationError;
use crate::number::write_number;
use crate::value::CanonicalValue;

/// Bytes produced exclusively by the canonicalizer.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - The bytes are valid UTF-8 and valid JSON.
/// - Parsing the bytes back into a [`CanonicalValue`] and canonicalizing
///   again yields identical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize a value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::MalformedValue` if any mapping repeats
    /// a key, and `CanonicalizationError::NonCanonicalizableNumber` if any
    /// number is NaN or infinite.
    pub fn new(value: &CanonicalValue) -> Result<Self, CanonicalizationError> {
        let mut out = String::new();
        write_value(value, &mut out)?;
        Ok(Self(out.into_bytes()))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The canonical form as text. Always valid UTF-8 by construction.
    pub fn as_str(&self) -> &str {
        // Built from a `String`, so this cannot fail.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Consume and return the inner byte vector.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Canonicalize a value. Same as [`CanonicalBytes::new()`].
pub fn canonicalize(value: &CanonicalValue) -> Result<CanonicalBytes, CanonicalizationError> {
    CanonicalBytes::new(value)
}

fn write_value(value: &CanonicalValue, out: &mut String) -> Result<(), CanonicalizationError> {
    match value {
        CanonicalValue::Null => out.push_str("null"),
        CanonicalValue::Bool(true) => out.push_str("true"),
        CanonicalValue::Bool(false) => out.push_str("false"),
        CanonicalValue::Number(n) => write_number(n, out)?,
        CanonicalValue::String(s) => write_string(s, out),
        CanonicalValue::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out)?;
            }
            out.push(']');
        }
        CanonicalValue::Object(entries) => write_object(entries, out)?,
    }
    Ok(())
}

fn write_object(
    entries: &[(String, CanonicalValue)],
    out: &mut String,
) -> Result<(), CanonicalizationError> {
    let mut sorted: Vec<&(String, CanonicalValue)> = entries.iter().collect();
    // `str` ordering is byte-wise over the UTF-8 encoding.
    sorted.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    if let Some(pair) = sorted.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(CanonicalizationError::MalformedValue(format!(
            "duplicate key {:?}",
            pair[0].0
        )));
    }

    out.push('{');
    for (i, (key, value)) in sorted.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_string(key, out);
        out.push(':');
        write_value(value, out)?;
    }
    out.push('}');
    Ok(())
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    fn canon(json: &str) -> String {
        let v = CanonicalValue::from_json_str(json).expect("valid json");
        CanonicalBytes::new(&v).expect("canonicalizable").as_str().to_owned()
    }

    #[test]
    fn test_simple_object_sorts_keys() {
        assert_eq!(canon(r#"{"z":1,"a":2,"m":3}"#), r#"{"a":2,"m":3,"z":1}"#);
    }

    #[test]
    fn test_nested_objects_sorted_recursively() {
        assert_eq!(
            canon(r#"{"outer":{"z":1,"a":2},"first":true}"#),
            r#"{"first":true,"outer":{"a":2,"z":1}}"#
        );
    }

    #[test]
    fn test_array_order_preserved() {
        assert_eq!(
            canon(r#"[{"b":2,"a":1},{"d":4,"c":3}]"#),
            r#"[{"a":1,"b":2},{"c":3,"d":4}]"#
        );
        assert_eq!(canon("[3,2,1]"), "[3,2,1]");
    }

    #[test]
    fn test_whitespace_removed() {
        assert_eq!(canon("{ \"a\" : [ 1 , 2 ] ,\n\t\"b\" : null }"), r#"{"a":[1,2],"b":null}"#);
    }

    #[test]
    fn test_literals() {
        assert_eq!(canon("null"), "null");
        assert_eq!(canon("true"), "true");
        assert_eq!(canon(r#"{"isTrue":true,"isFalse":false}"#), r#"{"isFalse":false,"isTrue":true}"#);
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(canon("{}"), "{}");
        assert_eq!(canon("[]"), "[]");
    }

    #[test]
    fn test_number_formatting_is_strict() {
        assert_eq!(canon("1.0"), "1");
        assert_eq!(canon("1.230"), "1.23");
        assert_eq!(canon("1E2"), "100");
        assert_eq!(canon("1e-2"), "0.01");
        assert_eq!(canon("-0"), "0");
        assert_eq!(canon("-0.0"), "0");
        assert_eq!(canon("100.0"), "100");
        assert_eq!(canon("100.5"), "100.5");
    }

    #[test]
    fn test_golden_document() {
        let input = r#"{"f":[1,2,3],"e":{"z":1,"y":2},"d":"hello\nworld","c":1e2,"b":0,"a":1}"#;
        assert_eq!(
            canon(input),
            r#"{"a":1,"b":0,"c":100,"d":"hello\nworld","e":{"y":2,"z":1},"f":[1,2,3]}"#
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(canon(r#""quote\" backslash\\""#), r#""quote\" backslash\\""#);
        assert_eq!(canon(r#""\b\f\n\r\t""#), r#""\b\f\n\r\t""#);
        assert_eq!(canon(r#""\u0001\u001f""#), r#""\u0001\u001f""#);
    }

    #[test]
    fn test_solidus_and_del_not_escaped() {
        assert_eq!(canon(r#""a\/b""#), r#""a/b""#);
        assert_eq!(canon("\"\u{7f}\""), "\"\u{7f}\"");
    }

    #[test]
    fn test_non_ascii_emitted_as_utf8() {
        assert_eq!(canon(r#""é""#), "\"\u{e9}\"");
        assert_eq!(canon("\"\u{1F600}\""), "\"\u{1F600}\"");
        let bytes = CanonicalBytes::new(&CanonicalValue::from("\u{e9}")).unwrap();
        assert_eq!(bytes.as_bytes(), &[b'"', 0xC3, 0xA9, b'"']);
    }

    #[test]
    fn test_keys_sorted_bytewise_not_utf16() {
        // U+FF61 encodes as EF BD A1; U+1F600 encodes as F0 9F 98 80.
        // UTF-16 order would put the emoji (surrogate D83D) first.
        let v = CanonicalValue::object([
            ("\u{1F600}", CanonicalValue::from(1i64)),
            ("\u{FF61}", CanonicalValue::from(2i64)),
        ]);
        let out = CanonicalBytes::new(&v).unwrap();
        assert_eq!(out.as_str(), "{\"\u{FF61}\":2,\"\u{1F600}\":1}");
    }

    #[test]
    fn test_uppercase_sorts_before_lowercase() {
        assert_eq!(canon(r#"{"b":1,"B":2,"a":3}"#), r#"{"B":2,"a":3,"b":1}"#);
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let v = CanonicalValue::object([
            ("a", CanonicalValue::from(1i64)),
            ("a", CanonicalValue::from(1i64)),
        ]);
        assert!(matches!(
            CanonicalBytes::new(&v),
            Err(CanonicalizationError::MalformedValue(_))
        ));
    }

    #[test]
    fn test_nested_duplicate_keys_rejected() {
        let inner = CanonicalValue::object([
            ("x", CanonicalValue::Null),
            ("x", CanonicalValue::Bool(true)),
        ]);
        let v = CanonicalValue::Array(vec![CanonicalValue::object([("inner", inner)])]);
        assert!(CanonicalBytes::new(&v).is_err());
    }

    #[test]
    fn test_nan_and_infinity_rejected() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let v = CanonicalValue::object([("amount", CanonicalValue::from(bad))]);
            match CanonicalBytes::new(&v) {
                Err(CanonicalizationError::NonCanonicalizableNumber(_)) => {}
                other => panic!("expected NonCanonicalizableNumber, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_integer_and_float_forms_agree() {
        let int = CanonicalValue::Number(Number::Int(100));
        let float = CanonicalValue::Number(Number::Float(100.0));
        assert_eq!(CanonicalBytes::new(&int).unwrap(), CanonicalBytes::new(&float).unwrap());
    }

    #[test]
    fn test_float_ties_match_ecmascript() {
        let v = CanonicalValue::Number(Number::Float(-1691530053556934.25));
        assert_eq!(CanonicalBytes::new(&v).unwrap().as_str(), "-1691530053556934.2");
        assert_eq!(canon("[1691530053556934.25]"), "[1691530053556934.2]");
    }

    #[test]
    fn test_len_and_is_empty() {
        let cb = CanonicalBytes::new(&CanonicalValue::empty_object()).unwrap();
        assert_eq!(cb.len(), 2);
        assert!(!cb.is_empty());
        assert_eq!(cb.clone().into_bytes(), b"{}".to_vec());
    }
}
