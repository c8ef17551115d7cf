//! Log record data structures

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single buffered log record.
///
/// Records are free-form JSON objects; no schema is enforced beyond the
/// best-effort numeric coercion in [`LogRecord::numeric_field`]. The wrapper
/// is transparent so records round-trip through the queue and the analyze
/// response exactly as they were written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogRecord {
    fields: Map<String, Value>,
}

impl LogRecord {
    /// Create a record from raw JSON fields.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Look up a field and coerce it to a floating-point number.
    ///
    /// An absent field reads as `0.0`. Numbers are taken as-is and numeric
    /// strings are parsed; any other value is malformed and fails the caller.
    pub fn numeric_field(&self, name: &str) -> Result<f64> {
        match self.fields.get(name) {
            None => Ok(0.0),
            Some(Value::Number(n)) => n
                .as_f64()
                .with_context(|| format!("field `{name}` does not fit in an f64")),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .with_context(|| format!("field `{name}` is not numeric: {s:?}")),
            Some(other) => bail!("field `{name}` is not numeric: {other}"),
        }
    }

    /// Whether the record carries the named field.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Raw field access.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Number of fields in the record.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> LogRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_numeric_field_coercion() {
        let rec = record(json!({
            "metric": 1.5,
            "error_rate": "0.25",
            "latency": 50,
        }));

        assert_eq!(rec.numeric_field("metric").unwrap(), 1.5);
        assert_eq!(rec.numeric_field("error_rate").unwrap(), 0.25);
        assert_eq!(rec.numeric_field("latency").unwrap(), 50.0);
    }

    #[test]
    fn test_absent_field_reads_zero() {
        let rec = record(json!({ "metric": 1.0 }));
        assert_eq!(rec.numeric_field("latency").unwrap(), 0.0);
    }

    #[test]
    fn test_malformed_field_fails() {
        let rec = record(json!({ "metric": [1, 2], "latency": "fast" }));
        assert!(rec.numeric_field("metric").is_err());
        assert!(rec.numeric_field("latency").is_err());
    }

    #[test]
    fn test_record_round_trip() {
        let raw = r#"{"metric":1,"service":"api","tags":["a","b"]}"#;
        let rec: LogRecord = serde_json::from_str(raw).unwrap();

        // Extra non-numeric fields survive untouched.
        assert_eq!(rec.get("service"), Some(&json!("api")));
        assert_eq!(serde_json::to_string(&rec).unwrap(), raw);
    }
}
