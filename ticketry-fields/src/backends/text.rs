//! Text backends: single-line text and textarea.
//!
//! Both store scalar text and share search behavior; they differ only in the
//! edit-mask input they render.

use crate::backend::{
    like_pattern, DisplayRender, EditRender, FieldBackend, InputSpec, SearchTerm, SqlParam,
    SqlPredicate,
};
use crate::definition::{FieldDefinition, FieldType};
use crate::error::FieldsError;
use crate::value::FieldValue;

const TEXTAREA_ROWS_DEFAULT: u32 = 5;
const TEXTAREA_COLS_DEFAULT: u32 = 60;

fn current_text(def: &FieldDefinition, current: Option<&FieldValue>) -> Option<String> {
    match current {
        Some(FieldValue::Text(s)) => Some(s.clone()),
        _ => def.config.default_value.clone(),
    }
}

fn display_text(def: &FieldDefinition, value: Option<&FieldValue>) -> DisplayRender {
    let text = match value {
        Some(FieldValue::Text(s)) => s.clone(),
        _ => String::new(),
    };
    let link = def
        .config
        .link
        .as_ref()
        .map(|template| template.replace("{value}", &text));
    DisplayRender {
        label: def.label.clone(),
        text,
        link,
    }
}

fn validate_text(def: &FieldDefinition, value: &FieldValue) -> Result<(), FieldsError> {
    match value {
        FieldValue::Text(_) => Ok(()),
        other => Err(FieldsError::InvalidValue {
            field: def.name.clone(),
            reason: format!("expected text, got {other:?}"),
        }),
    }
}

fn text_predicate(term: &SearchTerm) -> Option<SqlPredicate> {
    match term {
        SearchTerm::Pattern(p) if !p.trim().is_empty() => Some(SqlPredicate {
            sql: "json_extract(value, '$') LIKE ?".to_string(),
            params: vec![SqlParam::Text(like_pattern(p))],
        }),
        _ => None,
    }
}

/// Single-line text field.
#[derive(Debug, Default)]
pub struct TextBackend;

impl FieldBackend for TextBackend {
    fn field_type(&self) -> FieldType {
        FieldType::Text
    }

    fn render_edit(&self, def: &FieldDefinition, current: Option<&FieldValue>) -> EditRender {
        EditRender {
            label: def.label.clone(),
            mandatory: def.mandatory,
            input: InputSpec::TextLine {
                value: current_text(def, current),
            },
        }
    }

    fn render_display(&self, def: &FieldDefinition, value: Option<&FieldValue>) -> DisplayRender {
        display_text(def, value)
    }

    fn validate(&self, def: &FieldDefinition, value: &FieldValue) -> Result<(), FieldsError> {
        validate_text(def, value)
    }

    fn search_predicate(&self, _def: &FieldDefinition, term: &SearchTerm) -> Option<SqlPredicate> {
        text_predicate(term)
    }
}

/// Multi-line text field.
#[derive(Debug, Default)]
pub struct TextAreaBackend;

impl FieldBackend for TextAreaBackend {
    fn field_type(&self) -> FieldType {
        FieldType::TextArea
    }

    fn render_edit(&self, def: &FieldDefinition, current: Option<&FieldValue>) -> EditRender {
        EditRender {
            label: def.label.clone(),
            mandatory: def.mandatory,
            input: InputSpec::TextArea {
                value: current_text(def, current),
                rows: def.config.rows.unwrap_or(TEXTAREA_ROWS_DEFAULT),
                cols: def.config.cols.unwrap_or(TEXTAREA_COLS_DEFAULT),
            },
        }
    }

    fn render_display(&self, def: &FieldDefinition, value: Option<&FieldValue>) -> DisplayRender {
        display_text(def, value)
    }

    fn validate(&self, def: &FieldDefinition, value: &FieldValue) -> Result<(), FieldsError> {
        validate_text(def, value)
    }

    fn search_predicate(&self, _def: &FieldDefinition, term: &SearchTerm) -> Option<SqlPredicate> {
        text_predicate(term)
    }
}
