//! Export request and result types.

use std::fmt;

use serde::Deserialize;

/// Opaque primary-key value used to select records.
///
/// JSON numbers deserialize to [`Identifier::Int`], JSON strings to
/// [`Identifier::Text`]. Each is bound as a query parameter of the matching
/// SQL type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Int(i64),
    Text(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Int(v) => write!(f, "{}", v),
            Identifier::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Identifier {
    fn from(v: i64) -> Self {
        Identifier::Int(v)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier::Text(s.to_string())
    }
}

/// Body of `POST /api/export-ads`.
///
/// A missing `ids` field deserializes to an empty list and is rejected by
/// the pipeline like an explicit empty list.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub ids: Vec<Identifier>,
}

/// A single scalar cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Renders the cell the way it appears in CSV output; `Null` is empty.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(s) => f.write_str(s),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
        }
    }
}

/// One exported row: output field names paired with their values, in the
/// profile's output order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, value: Value) {
        self.fields.push((field.into(), value));
    }

    /// Looks up a field by its internal (unlabelled) name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }
}

/// Merged output of all batches, ready for tabular serialization.
#[derive(Clone, Debug)]
pub struct ExportResult {
    /// Internal field names, in output order
    pub fields: Vec<String>,
    /// Header labels, parallel to `fields`
    pub headers: Vec<String>,
    pub records: Vec<Record>,
    /// Number of lookup queries issued
    pub batches: usize,
}

impl ExportResult {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_deserialize_mixed() {
        let request: ExportRequest =
            serde_json::from_str(r#"{"ids": [101, "205", -3]}"#).expect("valid body");
        assert_eq!(
            request.ids,
            vec![
                Identifier::Int(101),
                Identifier::Text("205".to_string()),
                Identifier::Int(-3)
            ]
        );
    }

    #[test]
    fn test_missing_ids_is_empty() {
        let request: ExportRequest = serde_json::from_str("{}").expect("valid body");
        assert!(request.ids.is_empty());
    }

    #[test]
    fn test_float_identifier_rejected() {
        let result: Result<ExportRequest, _> = serde_json::from_str(r#"{"ids": [1.5]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::Text("CAD".into()).to_string(), "CAD");
    }

    #[test]
    fn test_record_lookup_by_field() {
        let mut record = Record::new();
        record.push("id", Value::Integer(7));
        record.push("funder_name", Value::Text("Acme".into()));

        assert_eq!(record.get("id"), Some(&Value::Integer(7)));
        assert_eq!(
            record.get("funder_name").and_then(Value::as_str),
            Some("Acme")
        );
        assert!(record.get("page_name").is_none());
    }
}
