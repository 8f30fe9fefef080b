//! Selection backends: dropdown (single key) and multiselect (key set).
//!
//! Keys must come from the definition's `possible_values`; labels are what
//! the display mask shows. An empty `possible_values` map skips membership
//! checking (free-form keys, used by fields whose options are synchronized
//! from an external source).

use crate::backend::{
    DisplayRender, EditRender, FieldBackend, InputSpec, SearchTerm, SelectOption, SqlParam,
    SqlPredicate,
};
use crate::definition::{FieldDefinition, FieldType};
use crate::error::FieldsError;
use crate::value::FieldValue;

fn options_for(def: &FieldDefinition) -> Vec<SelectOption> {
    def.config
        .possible_values
        .iter()
        .map(|(key, label)| SelectOption {
            key: key.clone(),
            label: label.clone(),
        })
        .collect()
}

fn check_key(def: &FieldDefinition, key: &str) -> Result<(), FieldsError> {
    if def.config.possible_values.is_empty() || def.config.possible_values.contains_key(key) {
        Ok(())
    } else {
        Err(FieldsError::InvalidValue {
            field: def.name.clone(),
            reason: format!("key {key:?} is not among the possible values"),
        })
    }
}

fn label_for<'a>(def: &'a FieldDefinition, key: &'a str) -> &'a str {
    def.config
        .possible_values
        .get(key)
        .map_or(key, String::as_str)
}

/// Single-selection field.
#[derive(Debug, Default)]
pub struct DropdownBackend;

impl FieldBackend for DropdownBackend {
    fn field_type(&self) -> FieldType {
        FieldType::Dropdown
    }

    fn render_edit(&self, def: &FieldDefinition, current: Option<&FieldValue>) -> EditRender {
        let selected = match current {
            Some(FieldValue::Key(k)) => vec![k.clone()],
            _ => def
                .config
                .default_value
                .clone()
                .map(|k| vec![k])
                .unwrap_or_default(),
        };
        EditRender {
            label: def.label.clone(),
            mandatory: def.mandatory,
            input: InputSpec::Select {
                options: options_for(def),
                selected,
                multiple: false,
            },
        }
    }

    fn render_display(&self, def: &FieldDefinition, value: Option<&FieldValue>) -> DisplayRender {
        let text = match value {
            Some(FieldValue::Key(k)) => label_for(def, k).to_string(),
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

    fn validate(&self, def: &FieldDefinition, value: &FieldValue) -> Result<(), FieldsError> {
        match value {
            FieldValue::Key(k) => check_key(def, k),
            other => Err(FieldsError::InvalidValue {
                field: def.name.clone(),
                reason: format!("expected selection key, got {other:?}"),
            }),
        }
    }

    fn search_predicate(&self, _def: &FieldDefinition, term: &SearchTerm) -> Option<SqlPredicate> {
        match term {
            SearchTerm::Keys(keys) if !keys.is_empty() => {
                let placeholders = vec!["?"; keys.len()].join(", ");
                Some(SqlPredicate {
                    sql: format!("json_extract(value, '$') IN ({placeholders})"),
                    params: keys.iter().cloned().map(SqlParam::Text).collect(),
                })
            }
            _ => None,
        }
    }
}

/// Multi-selection field.
#[derive(Debug, Default)]
pub struct MultiselectBackend;

impl FieldBackend for MultiselectBackend {
    fn field_type(&self) -> FieldType {
        FieldType::Multiselect
    }

    fn render_edit(&self, def: &FieldDefinition, current: Option<&FieldValue>) -> EditRender {
        let selected = match current {
            Some(FieldValue::Keys(keys)) => keys.clone(),
            _ => def
                .config
                .default_value
                .clone()
                .map(|k| vec![k])
                .unwrap_or_default(),
        };
        EditRender {
            label: def.label.clone(),
            mandatory: def.mandatory,
            input: InputSpec::Select {
                options: options_for(def),
                selected,
                multiple: true,
            },
        }
    }

    fn render_display(&self, def: &FieldDefinition, value: Option<&FieldValue>) -> DisplayRender {
        let text = match value {
            Some(FieldValue::Keys(keys)) => keys
                .iter()
                .map(|k| label_for(def, k))
                .collect::<Vec<_>>()
                .join(", "),
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
            FieldValue::Keys(keys) => {
                for key in keys {
                    check_key(def, key)?;
                }
                Ok(())
            }
            other => Err(FieldsError::InvalidValue {
                field: def.name.clone(),
                reason: format!("expected selection keys, got {other:?}"),
            }),
        }
    }

    fn search_predicate(&self, _def: &FieldDefinition, term: &SearchTerm) -> Option<SqlPredicate> {
        match term {
            SearchTerm::Keys(keys) if !keys.is_empty() => {
                let placeholders = vec!["?"; keys.len()].join(", ");
                Some(SqlPredicate {
                    // Stored as a JSON array; match any selected key.
                    sql: format!(
                        "EXISTS (SELECT 1 FROM json_each(dynamic_field_value.value) \
                         WHERE json_each.value IN ({placeholders}))"
                    ),
                    params: keys.iter().cloned().map(SqlParam::Text).collect(),
                })
            }
            _ => None,
        }
    }
}
