//! Field definitions — the schema side of dynamic fields.
//!
//! Definitions are loaded from configuration and immutable for the duration
//! of a request. They carry everything a backend needs to render, validate
//! and store a value: the type tag, the object kind the field attaches to,
//! and backend-specific hints (label, possible values, year ranges).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use ticketry_types::FieldId;

/// The kind of object a field (or event) attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ObjectKind {
    Ticket,
    Article,
    CustomerUser,
    CustomerCompany,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ticket => "Ticket",
            Self::Article => "Article",
            Self::CustomerUser => "CustomerUser",
            Self::CustomerCompany => "CustomerCompany",
        };
        f.write_str(s)
    }
}

impl FromStr for ObjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ticket" => Ok(Self::Ticket),
            "Article" => Ok(Self::Article),
            "CustomerUser" => Ok(Self::CustomerUser),
            "CustomerCompany" => Ok(Self::CustomerCompany),
            other => Err(format!("unknown object kind: {other}")),
        }
    }
}

/// The declared type of a field — the registry key that selects a backend.
///
/// The serde representation keeps the lowercase tag strings used in
/// configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    #[serde(rename = "textarea")]
    TextArea,
    Checkbox,
    Date,
    #[serde(rename = "datetime")]
    DateTime,
    Dropdown,
    Multiselect,
}

impl FieldType {
    /// The configuration tag string for this type.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::TextArea => "textarea",
            Self::Checkbox => "checkbox",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Dropdown => "dropdown",
            Self::Multiselect => "multiselect",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Backend-specific configuration carried by a field definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Value preselected in the edit mask when no value is stored yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// Allowed selection keys mapped to their display labels
    /// (dropdown/multiselect only).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub possible_values: BTreeMap<String, String>,

    /// URL template shown with the displayed value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Edit-mask rows (textarea only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,

    /// Edit-mask columns (textarea only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols: Option<u32>,

    /// Whether selection labels go through the translation layer.
    #[serde(default)]
    pub translatable_values: bool,

    /// Year-range hint for date selectors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_in_past: Option<u32>,

    /// Year-range hint for date selectors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_in_future: Option<u32>,
}

/// A dynamic field definition.
///
/// Owned by the external configuration store; this crate treats it as
/// read-only input on every operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: FieldId,
    /// Internal name, used in events, history and search.
    pub name: String,
    /// Human-readable label shown in edit and display masks.
    pub label: String,
    pub object_kind: ObjectKind,
    pub field_type: FieldType,
    /// Whether the field must carry a value on the edit mask.
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub config: FieldConfig,
}

impl FieldDefinition {
    /// Creates a definition with a fresh ID and empty config.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        object_kind: ObjectKind,
        field_type: FieldType,
    ) -> Self {
        Self {
            id: FieldId::new(),
            name: name.into(),
            label: label.into(),
            object_kind,
            field_type,
            mandatory: false,
            config: FieldConfig::default(),
        }
    }

    /// Marks the field mandatory.
    #[must_use]
    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    /// Attaches backend configuration.
    #[must_use]
    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    /// A definition is well-formed when its name and label are non-empty.
    ///
    /// Definitions come from configuration, so this is checked on every
    /// dispatcher operation rather than trusted.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.name.trim().is_empty() && !self.label.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_type_tags() {
        assert_eq!(FieldType::TextArea.tag(), "textarea");
        assert_eq!(FieldType::DateTime.to_string(), "datetime");
    }

    #[test]
    fn field_type_serde_uses_tags() {
        let json = serde_json::to_string(&FieldType::Multiselect).unwrap();
        assert_eq!(json, "\"multiselect\"");
        let parsed: FieldType = serde_json::from_str("\"textarea\"").unwrap();
        assert_eq!(parsed, FieldType::TextArea);
    }

    #[test]
    fn object_kind_roundtrip() {
        for kind in [
            ObjectKind::Ticket,
            ObjectKind::Article,
            ObjectKind::CustomerUser,
            ObjectKind::CustomerCompany,
        ] {
            assert_eq!(kind.to_string().parse::<ObjectKind>().unwrap(), kind);
        }
        assert!("Queue".parse::<ObjectKind>().is_err());
    }

    #[test]
    fn well_formedness() {
        let def = FieldDefinition::new("severity", "Severity", ObjectKind::Ticket, FieldType::Text);
        assert!(def.is_well_formed());

        let mut blank = def.clone();
        blank.name = "  ".into();
        assert!(!blank.is_well_formed());

        let mut unlabeled = def;
        unlabeled.label = String::new();
        assert!(!unlabeled.is_well_formed());
    }

    #[test]
    fn definition_deserializes_with_defaults() {
        let json = r#"{
            "id": "018f2f44-0000-7000-8000-000000000000",
            "name": "approved",
            "label": "Approved",
            "object_kind": "Article",
            "field_type": "checkbox"
        }"#;
        let def: FieldDefinition = serde_json::from_str(json).unwrap();
        assert!(!def.mandatory);
        assert_eq!(def.config, FieldConfig::default());
    }
}
