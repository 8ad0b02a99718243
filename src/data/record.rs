use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;

/// A single cell value inside a record.
///
/// Values are duck-typed: the collection carries whatever the source file
/// contained, and no schema is enforced beyond what the column specs declare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl CellValue {
    /// Parse a raw text field into the most specific value it can hold.
    pub fn infer(raw: &str) -> Self {
        if raw.is_empty() || raw.eq_ignore_ascii_case("null") {
            return CellValue::Null;
        }
        if raw.eq_ignore_ascii_case("true") {
            return CellValue::Boolean(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return CellValue::Boolean(false);
        }
        if let Ok(i) = raw.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return CellValue::Float(f);
        }
        CellValue::String(raw.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Integer(_) | CellValue::Float(_))
    }

    /// Numeric view of the value, when it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn from_json(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => CellValue::Null,
            JsonValue::Bool(b) => CellValue::Boolean(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CellValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    CellValue::Float(f)
                } else {
                    CellValue::String(n.to_string())
                }
            }
            JsonValue::String(s) => CellValue::String(s.clone()),
            // Nested structures are kept as their JSON text so they still
            // display and match substring searches.
            JsonValue::Array(_) | JsonValue::Object(_) => CellValue::String(json.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Float(fl) => write!(f, "{}", fl),
            CellValue::Boolean(b) => write!(f, "{}", b),
            CellValue::Null => write!(f, ""),
        }
    }
}

/// One row of the browsed collection: an opaque key to value mapping.
///
/// Records are immutable once loaded; any edit produces a new collection
/// supplied by the caller. A key absent from a record reads as [`CellValue::Null`]
/// and displays as the empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    values: HashMap<String, CellValue>,
}

impl Record {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: CellValue) -> &mut Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.values.get(key)
    }

    /// Stringified value at `key`; missing keys render as "".
    pub fn display_value(&self, key: &str) -> String {
        self.values
            .get(key)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build a record from a JSON object. Non-object values yield a record
    /// with a single "value" key so odd payloads still display.
    pub fn from_json(json: &JsonValue) -> Self {
        let mut record = Record::new();
        match json.as_object() {
            Some(obj) => {
                for (key, value) in obj {
                    record.set(key.clone(), CellValue::from_json(value));
                }
            }
            None => {
                record.set("value", CellValue::from_json(json));
            }
        }
        record
    }

    /// Serialize back to a JSON object, used by the clipboard yank path.
    pub fn to_json(&self) -> JsonValue {
        let mut map = serde_json::Map::new();
        for (key, value) in &self.values {
            let json = match value {
                CellValue::String(s) => JsonValue::String(s.clone()),
                CellValue::Integer(i) => JsonValue::from(*i),
                CellValue::Float(f) => {
                    serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number)
                }
                CellValue::Boolean(b) => JsonValue::Bool(*b),
                CellValue::Null => JsonValue::Null,
            };
            map.insert(key.clone(), json);
        }
        JsonValue::Object(map)
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, CellValue)>>(iter: T) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.set(key, value);
        }
        record
    }
}
