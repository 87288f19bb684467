//! Number rendering for the canonical form.
//!
//! Integers render as plain decimal. Doubles follow the ECMAScript
//! `Number::toString` algorithm that RFC 8785 §3.2.2.3 references, as
//! implemented by `ryu-js`: shortest round-trip digits with ties broken to
//! even, fixed notation when the decimal exponent is in `(-6, 21]` and
//! `d.ddde±x` notation otherwise.

use crate::error::CanonicalizationError;
use crate::value::Number;

pub(crate) fn write_number(n: &Number, out: &mut String) -> Result<(), CanonicalizationError> {
    match *n {
        Number::Int(i) => out.push_str(&i.to_string()),
        Number::UInt(u) => out.push_str(&u.to_string()),
        Number::Float(f) => write_f64(f, out)?,
    }
    Ok(())
}

fn write_f64(value: f64, out: &mut String) -> Result<(), CanonicalizationError> {
    if !value.is_finite() {
        return Err(CanonicalizationError::NonCanonicalizableNumber(value));
    }
    // Covers -0.0 as well.
    if value == 0.0 {
        out.push('0');
        return Ok(());
    }
    let mut buffer = ryu_js::Buffer::new();
    out.push_str(buffer.format_finite(value));
    Ok(())
}
