//! The field backend capability trait and its operation types.
//!
//! One backend exists per concrete field type. Backends never talk to the
//! dispatcher's callers directly — the dispatcher validates and resolves,
//! then delegates here. Value persistence goes through the generic value
//! store; the default `value_get`/`value_set` implementations cover every
//! backend that stores its value as plain JSON (all built-ins do).

use crate::definition::{FieldDefinition, FieldType};
use crate::error::FieldsError;
use crate::value::FieldValue;
use chrono::NaiveDateTime;
use rusqlite::types::ToSqlOutput;
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};
use ticketry_store::ValueStore;
use ticketry_types::ObjectId;

/// A single option offered by a selection input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub key: String,
    pub label: String,
}

/// The input control a template renders for editing a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum InputSpec {
    TextLine {
        value: Option<String>,
    },
    TextArea {
        value: Option<String>,
        rows: u32,
        cols: u32,
    },
    Checkbox {
        checked: bool,
    },
    DateSelector {
        value: Option<String>,
        with_time: bool,
        years_in_past: u32,
        years_in_future: u32,
    },
    Select {
        options: Vec<SelectOption>,
        selected: Vec<String>,
        multiple: bool,
    },
}

/// Structured data for a field's edit mask. Templating itself happens
/// elsewhere; backends only supply what the template consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRender {
    pub label: String,
    pub mandatory: bool,
    pub input: InputSpec,
}

/// Structured data for a field's display (read-only) view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRender {
    pub label: String,
    /// The formatted value, empty when no value is stored.
    pub text: String,
    /// Link template with the value substituted, if configured.
    pub link: Option<String>,
}

/// A search input, shaped by what the caller's search mask collected.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchTerm {
    /// Substring pattern; `*` wildcards are translated to SQL `%`.
    Pattern(String),
    /// One or more selection keys.
    Keys(Vec<String>),
    /// Checkbox state.
    Flag(bool),
    /// Inclusive time range; either bound may be open.
    Range {
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
    },
}

impl SearchTerm {
    /// An empty term produces no predicate; the dispatcher short-circuits
    /// before delegating.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Pattern(p) => p.trim().is_empty(),
            Self::Keys(keys) => keys.is_empty(),
            Self::Flag(_) => false,
            Self::Range { from, to } => from.is_none() && to.is_none(),
        }
    }
}

/// A bind parameter for a predicate fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Self::Text(s) => s.to_sql(),
            Self::Int(i) => i.to_sql(),
        }
    }
}

/// A backend-specific WHERE fragment against the `dynamic_field_value`
/// table. Parameters use bare `?` placeholders so callers can prepend their
/// own binds (field ID scoping) before the fragment's.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlPredicate {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

/// How a field's sort expression orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKind {
    Alphanumeric,
    Numeric,
    Datetime,
}

/// The ORDER BY expression for a field column.
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub expr: String,
    pub kind: SortKind,
}

/// The capability surface implemented once per concrete field type.
///
/// `render_edit`, `render_display`, `validate`, `search_predicate` and
/// `sort_key` are pure; `value_get`/`value_set` touch the store. The default
/// store implementations read and write the value's plain JSON form.
pub trait FieldBackend: Send + Sync {
    /// The registry key this backend serves.
    fn field_type(&self) -> FieldType;

    /// Produces the edit-mask data for this field.
    fn render_edit(&self, def: &FieldDefinition, current: Option<&FieldValue>) -> EditRender;

    /// Produces the display data for this field.
    fn render_display(&self, def: &FieldDefinition, value: Option<&FieldValue>) -> DisplayRender;

    /// Checks a candidate value's shape and options against the definition.
    fn validate(&self, def: &FieldDefinition, value: &FieldValue) -> Result<(), FieldsError>;

    /// Reads the stored value, if any.
    fn value_get(
        &self,
        def: &FieldDefinition,
        object_id: &ObjectId,
        store: &ValueStore,
    ) -> Result<Option<FieldValue>, FieldsError> {
        match store.get(&def.id, object_id)? {
            Some(json) => Ok(Some(FieldValue::from_json(self.field_type(), &json)?)),
            None => Ok(None),
        }
    }

    /// Writes (or clears) the stored value. Whole-value replace.
    fn value_set(
        &self,
        def: &FieldDefinition,
        object_id: &ObjectId,
        value: Option<&FieldValue>,
        store: &ValueStore,
    ) -> Result<(), FieldsError> {
        match value {
            Some(v) => store.set(&def.id, object_id, &v.to_json())?,
            None => store.delete(&def.id, object_id)?,
        }
        Ok(())
    }

    /// Produces a WHERE fragment for this field, or `None` when the term's
    /// shape does not apply to this backend.
    fn search_predicate(&self, def: &FieldDefinition, term: &SearchTerm) -> Option<SqlPredicate>;

    /// Produces the ORDER BY expression for this field.
    fn sort_key(&self, def: &FieldDefinition) -> SortKey {
        let _ = def;
        SortKey {
            expr: "json_extract(value, '$')".to_string(),
            kind: SortKind::Alphanumeric,
        }
    }
}

/// Translates a user pattern into a SQL LIKE pattern: `*` becomes `%`, and
/// the result is wrapped for substring matching when no wildcard was given.
pub(crate) fn like_pattern(pattern: &str) -> String {
    let trimmed = pattern.trim();
    if trimmed.contains('*') {
        trimmed.replace('*', "%")
    } else {
        format!("%{trimmed}%")
    }
}
