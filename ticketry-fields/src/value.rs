//! Field value shapes.
//!
//! The stored representation is plain JSON — a bare string, array or boolean
//! — so that search predicates can run `json_extract`/`json_each` directly
//! against the value column. The typed enum exists in memory only;
//! reconstruction needs the field type because text and selection keys share
//! the same JSON shape.

use crate::definition::FieldType;
use crate::error::FieldsError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A dynamic field value. Set is whole-value replace; there are no partial
/// updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Scalar text (text and textarea backends).
    Text(String),
    /// Calendar date, no time of day.
    Date(NaiveDate),
    /// Date and time, host-local, no zone.
    DateTime(NaiveDateTime),
    /// A single selection key (dropdown backend).
    Key(String),
    /// Multiple selection keys (multiselect backend).
    Keys(Vec<String>),
    /// Checked / unchecked (checkbox backend).
    Flag(bool),
}

impl FieldValue {
    /// The stored JSON form of this value.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Text(s) | Self::Key(s) => serde_json::Value::String(s.clone()),
            Self::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
            Self::DateTime(dt) => {
                serde_json::Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string())
            }
            Self::Keys(keys) => {
                serde_json::Value::Array(keys.iter().cloned().map(serde_json::Value::String).collect())
            }
            Self::Flag(b) => serde_json::Value::Bool(*b),
        }
    }

    /// Reconstructs a value from its stored JSON form.
    ///
    /// The field type decides how to read ambiguous shapes (a bare string is
    /// text, a date or a selection key depending on the backend).
    pub fn from_json(field_type: FieldType, json: &serde_json::Value) -> Result<Self, FieldsError> {
        let mismatch = |expected: &str| FieldsError::InvalidValue {
            field: field_type.tag().to_string(),
            reason: format!("expected {expected}, got {json}"),
        };

        match field_type {
            FieldType::Text | FieldType::TextArea => json
                .as_str()
                .map(|s| Self::Text(s.to_string()))
                .ok_or_else(|| mismatch("string")),
            FieldType::Date => {
                let s = json.as_str().ok_or_else(|| mismatch("date string"))?;
                let date = s.parse::<NaiveDate>().map_err(|e| FieldsError::InvalidValue {
                    field: field_type.tag().to_string(),
                    reason: format!("bad date {s:?}: {e}"),
                })?;
                Ok(Self::Date(date))
            }
            FieldType::DateTime => {
                let s = json.as_str().ok_or_else(|| mismatch("datetime string"))?;
                let dt = s
                    .parse::<NaiveDateTime>()
                    .map_err(|e| FieldsError::InvalidValue {
                        field: field_type.tag().to_string(),
                        reason: format!("bad datetime {s:?}: {e}"),
                    })?;
                Ok(Self::DateTime(dt))
            }
            FieldType::Dropdown => json
                .as_str()
                .map(|s| Self::Key(s.to_string()))
                .ok_or_else(|| mismatch("selection key")),
            FieldType::Multiselect => {
                let arr = json.as_array().ok_or_else(|| mismatch("key array"))?;
                let keys = arr
                    .iter()
                    .map(|v| v.as_str().map(str::to_string).ok_or_else(|| mismatch("key array")))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Keys(keys))
            }
            FieldType::Checkbox => json.as_bool().map(Self::Flag).ok_or_else(|| mismatch("boolean")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_roundtrip() {
        let value = FieldValue::Text("needs replacement".into());
        let stored = value.to_json();
        assert_eq!(stored, json!("needs replacement"));
        assert_eq!(FieldValue::from_json(FieldType::Text, &stored).unwrap(), value);
    }

    #[test]
    fn date_roundtrip_is_iso() {
        let value = FieldValue::Date(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        let stored = value.to_json();
        assert_eq!(stored, json!("2024-03-07"));
        assert_eq!(FieldValue::from_json(FieldType::Date, &stored).unwrap(), value);
    }

    #[test]
    fn datetime_roundtrip() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let value = FieldValue::DateTime(dt);
        let stored = value.to_json();
        assert_eq!(stored, json!("2024-03-07T09:30:00"));
        assert_eq!(
            FieldValue::from_json(FieldType::DateTime, &stored).unwrap(),
            value
        );
    }

    #[test]
    fn keys_roundtrip() {
        let value = FieldValue::Keys(vec!["hw".into(), "sw".into()]);
        let stored = value.to_json();
        assert_eq!(stored, json!(["hw", "sw"]));
        assert_eq!(
            FieldValue::from_json(FieldType::Multiselect, &stored).unwrap(),
            value
        );
    }

    #[test]
    fn flag_roundtrip() {
        let stored = FieldValue::Flag(true).to_json();
        assert_eq!(stored, json!(true));
        assert_eq!(
            FieldValue::from_json(FieldType::Checkbox, &stored).unwrap(),
            FieldValue::Flag(true)
        );
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        assert!(FieldValue::from_json(FieldType::Checkbox, &json!("yes")).is_err());
        assert!(FieldValue::from_json(FieldType::Date, &json!("03/07/2024")).is_err());
        assert!(FieldValue::from_json(FieldType::Multiselect, &json!("single")).is_err());
        assert!(FieldValue::from_json(FieldType::Text, &json!(5)).is_err());
    }
}
