//! Scalar conversions shared by the engines

use bigdecimal::{BigDecimal, ToPrimitive};
use serde_json::{Number, Value};

/// Arbitrary-precision decimals are reported as `f64` so they stay numbers in JSON
pub fn decimal_value(value: BigDecimal) -> Value {
    // The textual form parses to the nearest float
    let number = value
        .to_string()
        .parse::<f64>()
        .ok()
        .or_else(|| value.to_f64());

    number.map(float_value).unwrap_or(Value::Null)
}

/// Finite floats become numbers; NaN and infinities become `null`
pub fn float_value(value: f64) -> Value {
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
