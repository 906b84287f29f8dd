use serde::Serialize;

/// One SQLite value as read from a result row, or bound as a query parameter.
///
/// ```rust
/// use cookie_hosts::types::CellValue;
///
/// let host = CellValue::Text(".example.com".into());
/// assert_eq!(host.as_text(), Some(".example.com"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Binary data
    Blob(Vec<u8>),
    /// NULL value
    Null,
}

impl CellValue {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let CellValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }
}

impl From<rusqlite::types::Value> for CellValue {
    fn from(value: rusqlite::types::Value) -> Self {
        match value {
            rusqlite::types::Value::Null => CellValue::Null,
            rusqlite::types::Value::Integer(i) => CellValue::Int(i),
            rusqlite::types::Value::Real(f) => CellValue::Float(f),
            rusqlite::types::Value::Text(s) => CellValue::Text(s),
            rusqlite::types::Value::Blob(b) => CellValue::Blob(b),
        }
    }
}

impl From<&CellValue> for rusqlite::types::Value {
    fn from(value: &CellValue) -> Self {
        match value {
            CellValue::Int(i) => rusqlite::types::Value::Integer(*i),
            CellValue::Float(f) => rusqlite::types::Value::Real(*f),
            CellValue::Text(s) => rusqlite::types::Value::Text(s.clone()),
            CellValue::Blob(bytes) => rusqlite::types::Value::Blob(bytes.clone()),
            CellValue::Null => rusqlite::types::Value::Null,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}
