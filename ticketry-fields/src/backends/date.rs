//! Date backends: calendar date and date-time.
//!
//! Values are stored as ISO strings, which compare lexicographically in
//! chronological order, so range predicates are plain string comparisons.

use crate::backend::{
    DisplayRender, EditRender, FieldBackend, InputSpec, SearchTerm, SortKind, SortKey, SqlParam,
    SqlPredicate,
};
use crate::definition::{FieldDefinition, FieldType};
use crate::error::FieldsError;
use crate::value::FieldValue;
use chrono::NaiveDateTime;

const YEAR_RANGE_DEFAULT: u32 = 5;

fn range_predicate(
    term: &SearchTerm,
    format: impl Fn(&NaiveDateTime) -> String,
) -> Option<SqlPredicate> {
    let SearchTerm::Range { from, to } = term else {
        return None;
    };
    if from.is_none() && to.is_none() {
        return None;
    }

    let mut clauses = Vec::new();
    let mut params = Vec::new();
    if let Some(from) = from {
        clauses.push("json_extract(value, '$') >= ?");
        params.push(SqlParam::Text(format(from)));
    }
    if let Some(to) = to {
        clauses.push("json_extract(value, '$') <= ?");
        params.push(SqlParam::Text(format(to)));
    }
    Some(SqlPredicate {
        sql: clauses.join(" AND "),
        params,
    })
}

fn date_selector(def: &FieldDefinition, value: Option<String>, with_time: bool) -> EditRender {
    EditRender {
        label: def.label.clone(),
        mandatory: def.mandatory,
        input: InputSpec::DateSelector {
            value,
            with_time,
            years_in_past: def.config.years_in_past.unwrap_or(YEAR_RANGE_DEFAULT),
            years_in_future: def.config.years_in_future.unwrap_or(YEAR_RANGE_DEFAULT),
        },
    }
}

fn datetime_sort(_def: &FieldDefinition) -> SortKey {
    SortKey {
        expr: "json_extract(value, '$')".to_string(),
        kind: SortKind::Datetime,
    }
}

/// Calendar date field (no time of day).
#[derive(Debug, Default)]
pub struct DateBackend;

impl FieldBackend for DateBackend {
    fn field_type(&self) -> FieldType {
        FieldType::Date
    }

    fn render_edit(&self, def: &FieldDefinition, current: Option<&FieldValue>) -> EditRender {
        let value = match current {
            Some(FieldValue::Date(d)) => Some(d.format("%Y-%m-%d").to_string()),
            _ => None,
        };
        date_selector(def, value, false)
    }

    fn render_display(&self, def: &FieldDefinition, value: Option<&FieldValue>) -> DisplayRender {
        let text = match value {
            Some(FieldValue::Date(d)) => d.format("%Y-%m-%d").to_string(),
            _ => String::new(),
        };
        DisplayRender {
            label: def.label.clone(),
            text,
            link: None,
        }
    }

    fn validate(&self, def: &FieldDefinition, value: &FieldValue) -> Result<(), FieldsError> {
        match value {
            FieldValue::Date(_) => Ok(()),
            other => Err(FieldsError::InvalidValue {
                field: def.name.clone(),
                reason: format!("expected date, got {other:?}"),
            }),
        }
    }

    fn search_predicate(&self, _def: &FieldDefinition, term: &SearchTerm) -> Option<SqlPredicate> {
        // Bounds arrive as datetimes; dates compare on the day component.
        range_predicate(term, |dt| dt.format("%Y-%m-%d").to_string())
    }

    fn sort_key(&self, def: &FieldDefinition) -> SortKey {
        datetime_sort(def)
    }
}

/// Date-time field, host-local, second precision.
#[derive(Debug, Default)]
pub struct DateTimeBackend;

impl FieldBackend for DateTimeBackend {
    fn field_type(&self) -> FieldType {
        FieldType::DateTime
    }

    fn render_edit(&self, def: &FieldDefinition, current: Option<&FieldValue>) -> EditRender {
        let value = match current {
            Some(FieldValue::DateTime(dt)) => Some(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            _ => None,
        };
        date_selector(def, value, true)
    }

    fn render_display(&self, def: &FieldDefinition, value: Option<&FieldValue>) -> DisplayRender {
        let text = match value {
            Some(FieldValue::DateTime(dt)) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            _ => String::new(),
        };
        DisplayRender {
            label: def.label.clone(),
            text,
            link: None,
        }
    }

    fn validate(&self, def: &FieldDefinition, value: &FieldValue) -> Result<(), FieldsError> {
        match value {
            FieldValue::DateTime(_) => Ok(()),
            other => Err(FieldsError::InvalidValue {
                field: def.name.clone(),
                reason: format!("expected datetime, got {other:?}"),
            }),
        }
    }

    fn search_predicate(&self, _def: &FieldDefinition, term: &SearchTerm) -> Option<SqlPredicate> {
        range_predicate(term, |dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
    }

    fn sort_key(&self, def: &FieldDefinition) -> SortKey {
        datetime_sort(def)
    }
}
