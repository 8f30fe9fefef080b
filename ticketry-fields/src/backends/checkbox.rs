//! Checkbox backend: a single boolean flag.

use crate::backend::{
    DisplayRender, EditRender, FieldBackend, InputSpec, SearchTerm, SortKind, SortKey, SqlParam,
    SqlPredicate,
};
use crate::definition::{FieldDefinition, FieldType};
use crate::error::FieldsError;
use crate::value::FieldValue;

#[derive(Debug, Default)]
pub struct CheckboxBackend;

impl FieldBackend for CheckboxBackend {
    fn field_type(&self) -> FieldType {
        FieldType::Checkbox
    }

    fn render_edit(&self, def: &FieldDefinition, current: Option<&FieldValue>) -> EditRender {
        let checked = match current {
            Some(FieldValue::Flag(b)) => *b,
            // "1" is the conventional checked default in field configs.
            _ => def.config.default_value.as_deref() == Some("1"),
        };
        EditRender {
            label: def.label.clone(),
            mandatory: def.mandatory,
            input: InputSpec::Checkbox { checked },
        }
    }

    fn render_display(&self, def: &FieldDefinition, value: Option<&FieldValue>) -> DisplayRender {
        let text = match value {
            Some(FieldValue::Flag(true)) => "Checked".to_string(),
            Some(FieldValue::Flag(false)) => "Unchecked".to_string(),
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
            FieldValue::Flag(_) => Ok(()),
            other => Err(FieldsError::InvalidValue {
                field: def.name.clone(),
                reason: format!("expected flag, got {other:?}"),
            }),
        }
    }

    fn search_predicate(&self, _def: &FieldDefinition, term: &SearchTerm) -> Option<SqlPredicate> {
        match term {
            // json_extract yields 0/1 for stored JSON booleans.
            SearchTerm::Flag(b) => Some(SqlPredicate {
                sql: "json_extract(value, '$') = ?".to_string(),
                params: vec![SqlParam::Int(i64::from(*b))],
            }),
            _ => None,
        }
    }

    fn sort_key(&self, _def: &FieldDefinition) -> SortKey {
        SortKey {
            expr: "json_extract(value, '$')".to_string(),
            kind: SortKind::Numeric,
        }
    }
}
