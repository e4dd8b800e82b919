//! Node identity values

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Scalar identity key of a node.
///
/// Compared by strict equality: the number `1` and the string `"1"` are different values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeValue {
    Bool(bool),
    Number(Number),
    Text(String),
}

impl NodeValue {
    /// Converts a JSON scalar; arrays, objects and `null` are rejected.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(NodeValue::Bool(*b)),
            Value::Number(n) => Some(NodeValue::Number(n.clone())),
            Value::String(s) => Some(NodeValue::Text(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Interprets free-form text the way a command line argument is meant:
    /// integers and floats become numbers, `true`/`false` become booleans,
    /// anything else stays text.
    ///
    /// Exponent notation without a decimal point (`1e3`) that lands on a whole
    /// number is read as that integer, so it matches a record value of `1000`.
    pub fn parse_lenient(raw: &str) -> Self {
        if let Ok(i) = raw.parse::<i64>() {
            return NodeValue::Number(Number::from(i));
        }
        if let Ok(u) = raw.parse::<u64>() {
            return NodeValue::Number(Number::from(u));
        }
        if let Ok(f) = raw.parse::<f64>() {
            if let Some(n) = integral_exponent(raw, f).or_else(|| Number::from_f64(f)) {
                return NodeValue::Number(n);
            }
        }
        match raw {
            "true" => NodeValue::Bool(true),
            "false" => NodeValue::Bool(false),
            _ => NodeValue::Text(raw.to_string()),
        }
    }
}

fn integral_exponent(raw: &str, f: f64) -> Option<Number> {
    if raw.contains('.') || f.fract() != 0.0 {
        return None;
    }
    if f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(Number::from(f as i64))
    } else if f >= 0.0 && f < u64::MAX as f64 {
        Some(Number::from(f as u64))
    } else {
        None
    }
}

impl From<&str> for NodeValue {
    fn from(s: &str) -> Self {
        NodeValue::Text(s.to_string())
    }
}

impl From<String> for NodeValue {
    fn from(s: String) -> Self {
        NodeValue::Text(s)
    }
}

impl From<i64> for NodeValue {
    fn from(i: i64) -> Self {
        NodeValue::Number(Number::from(i))
    }
}

impl fmt::Display for NodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeValue::Bool(b) => write!(f, "{}", b),
            NodeValue::Number(n) => write!(f, "{}", n),
            NodeValue::Text(s) => f.write_str(s),
        }
    }
}
