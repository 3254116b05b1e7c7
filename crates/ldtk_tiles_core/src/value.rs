//! Typed field value for raw editor data (JSON-like but typed)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

static UNDEFINED: FieldValue = FieldValue::Undefined;
static EMPTY_OBJECT: BTreeMap<String, FieldValue> = BTreeMap::new();

/// Field value as stored in the editor's save data.
///
/// Every accessor comes in two flavours: `as_*` returns `None` when the kind
/// does not match, and the bare name (`int`, `float`, ...) is total and falls
/// back to the kind's default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(untagged)]
pub enum FieldValue {
    /// Missing field or JSON `null`
    #[default]
    Undefined,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<FieldValue>),
    Object(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Get value as string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get value as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            FieldValue::Float(f) => Some(*f as i64),
            _ => None,
        }
    }

    /// Get value as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get value as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get value as array slice
    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get value as object reference
    pub fn as_object(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Integer value, `0` for any other kind
    pub fn int(&self) -> i64 {
        self.as_int().unwrap_or_default()
    }

    /// Float value, `0.0` for any other kind
    pub fn float(&self) -> f64 {
        self.as_float().unwrap_or_default()
    }

    /// Boolean value, `false` for any other kind
    pub fn bool(&self) -> bool {
        self.as_bool().unwrap_or_default()
    }

    /// String value, `""` for any other kind
    pub fn str(&self) -> &str {
        self.as_str().unwrap_or_default()
    }

    /// Array items, empty for any other kind
    pub fn array(&self) -> &[FieldValue] {
        self.as_array().unwrap_or_default()
    }

    /// Object entries, empty for any other kind
    pub fn object(&self) -> &BTreeMap<String, FieldValue> {
        self.as_object().unwrap_or(&EMPTY_OBJECT)
    }

    /// Look up an object member. Non-objects and missing keys yield `Undefined`.
    pub fn get(&self, key: &str) -> &FieldValue {
        match self {
            FieldValue::Object(o) => o.get(key).unwrap_or(&UNDEFINED),
            _ => &UNDEFINED,
        }
    }

    /// Check if value is undefined
    pub fn is_undefined(&self) -> bool {
        matches!(self, FieldValue::Undefined)
    }

    /// Convert from serde_json::Value
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => FieldValue::Undefined,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Int(i)
                } else if let Some(f) = n.as_f64() {
                    FieldValue::Float(f)
                } else {
                    FieldValue::Undefined
                }
            }
            serde_json::Value::String(s) => FieldValue::String(s),
            serde_json::Value::Array(arr) => {
                FieldValue::Array(arr.into_iter().map(FieldValue::from_json).collect())
            }
            serde_json::Value::Object(obj) => FieldValue::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, FieldValue::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}
