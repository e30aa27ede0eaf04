use super::model::Record;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A dynamically typed field value inside a [`Record`].
///
/// JSON numbers are always held as `f64`, so an integer literal `1` compares
/// equal to `1.0`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    DateTime(DateTime<Utc>),
    Array(Vec<Value>),
    Document(Record),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Record> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or_default()),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Document(Record::from(map)),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::Document(value)
    }
}

// Temporal values are written in extended-JSON form so they survive a
// round trip through another import.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::DateTime(dt) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$date", &dt.to_rfc3339_opts(SecondsFormat::Millis, true))?;
                map.end()
            }
            Value::Array(items) => items.serialize(serializer),
            Value::Document(doc) => doc.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_integer_literal_becomes_float() {
        let value = Value::from(serde_json::json!(1));
        assert_eq!(value, Value::Number(1.0));
        assert_eq!(value.as_f64(), Some(1.0));
    }

    #[test]
    fn test_nested_object_becomes_document() {
        let value = Value::from(serde_json::json!({"inner": {"flag": true}, "tags": ["a", null]}));
        let doc = value.as_document().unwrap();
        let inner = doc.get("inner").and_then(Value::as_document).unwrap();
        assert_eq!(inner.get("flag"), Some(&Value::Bool(true)));
        assert_eq!(
            doc.get("tags"),
            Some(&Value::Array(vec![Value::from("a"), Value::Null]))
        );
    }

    #[test]
    fn test_datetime_serializes_as_date_marker() {
        let dt = Utc.with_ymd_and_hms(2024, 5, 22, 16, 4, 35).unwrap();
        let json = serde_json::to_value(Value::DateTime(dt)).unwrap();
        assert_eq!(json, serde_json::json!({"$date": "2024-05-22T16:04:35.000Z"}));
    }
}
