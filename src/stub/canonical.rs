use std::collections::BTreeMap;

use serde_json::{Number, Map, Value};

// 2^63 and 2^64; integral floats below these convert to i64/u64 exactly.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
const U64_BOUND: f64 = 18_446_744_073_709_551_616.0;

fn normalize_number(n: &Number) -> Number {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.is_finite() && f.fract() == 0.0 {
                if (-I64_BOUND..I64_BOUND).contains(&f) {
                    return Number::from(f as i64);
                }
                if (0.0..U64_BOUND).contains(&f) {
                    return Number::from(f as u64);
                }
            }
        }
    }
    n.clone()
}

/// Rewrites a JSON value into its canonical form: object keys sorted and
/// integral floats collapsed to integers, so `{"b": 1.0, "a": 2}` and
/// `{"a": 2, "b": 1}` become identical.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Number(n) => Value::Number(normalize_number(n)),
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        Value::Object(map) => {
            let sorted: BTreeMap<&String, Value> =
                map.iter().map(|(k, v)| (k, canonicalize(v))).collect();
            let mut out = Map::with_capacity(sorted.len());
            for (k, v) in sorted {
                out.insert(k.clone(), v);
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

pub fn to_canonical_string(value: &Value) -> String {
    canonicalize(value).to_string()
}

pub fn canonical_eq(a: &Value, b: &Value) -> bool {
    to_canonical_string(a) == to_canonical_string(b)
}
