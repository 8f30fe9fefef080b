//! The configuration-supplied column mapping for the company table.
//!
//! Column names come exclusively from this map, never from caller input —
//! assembled SQL only ever interpolates identifiers the map declared at
//! startup.

use serde::{Deserialize, Serialize};

fn default_table() -> String {
    "customer_company".to_string()
}

fn default_key_column() -> String {
    "customer_id".to_string()
}

/// One attribute → column binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Attribute name used by callers.
    pub attr: String,
    /// Column name in the table.
    pub column: String,
    /// Whether `search` scans this column.
    #[serde(default)]
    pub searchable: bool,
    /// Whether `add` requires this attribute.
    #[serde(default)]
    pub required: bool,
}

impl ColumnSpec {
    fn new(attr: &str, column: &str, searchable: bool, required: bool) -> Self {
        Self {
            attr: attr.to_string(),
            column: column.to_string(),
            searchable,
            required,
        }
    }
}

/// Table layout for customer company records, loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyMap {
    /// Table name.
    #[serde(default = "default_table")]
    pub table: String,

    /// Primary key column (holds the company ID).
    #[serde(default = "default_key_column")]
    pub key_column: String,

    /// Attribute → column bindings, key column excluded.
    pub columns: Vec<ColumnSpec>,

    /// Display-name attribute used by `list` and `search` results.
    #[serde(default)]
    pub name_attr: Option<String>,
}

impl CompanyMap {
    /// The stock mapping shipped with a fresh installation.
    #[must_use]
    pub fn default_map() -> Self {
        Self {
            table: default_table(),
            key_column: default_key_column(),
            columns: vec![
                ColumnSpec::new("name", "name", true, true),
                ColumnSpec::new("street", "street", false, false),
                ColumnSpec::new("zip", "zip", false, false),
                ColumnSpec::new("city", "city", true, false),
                ColumnSpec::new("country", "country", false, false),
                ColumnSpec::new("url", "url", false, false),
                ColumnSpec::new("comments", "comments", false, false),
            ],
            name_attr: Some("name".to_string()),
        }
    }

    /// Resolves an attribute to its column spec.
    #[must_use]
    pub fn column_for(&self, attr: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|spec| spec.attr == attr)
    }

    /// The columns `search` scans.
    pub fn searchable_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|spec| spec.searchable)
    }

    /// The attributes `add` requires.
    pub fn required_attrs(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|spec| spec.required)
            .map(|spec| spec.attr.as_str())
    }

    /// The column holding the display name, falling back to the key column.
    #[must_use]
    pub fn name_column(&self) -> &str {
        self.name_attr
            .as_deref()
            .and_then(|attr| self.column_for(attr))
            .map_or(self.key_column.as_str(), |spec| spec.column.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_shape() {
        let map = CompanyMap::default_map();
        assert_eq!(map.table, "customer_company");
        assert_eq!(map.key_column, "customer_id");
        assert!(map.column_for("name").unwrap().required);
        assert!(map.column_for("street").is_some());
        assert!(map.column_for("bogus").is_none());
    }

    #[test]
    fn searchable_and_required_filters() {
        let map = CompanyMap::default_map();
        let searchable: Vec<_> = map.searchable_columns().map(|s| s.attr.as_str()).collect();
        assert_eq!(searchable, ["name", "city"]);
        let required: Vec<_> = map.required_attrs().collect();
        assert_eq!(required, ["name"]);
    }

    #[test]
    fn map_deserializes_from_config_json() {
        let json = r#"{
            "table": "org_units",
            "key_column": "org_id",
            "columns": [
                {"attr": "name", "column": "org_name", "searchable": true, "required": true},
                {"attr": "region", "column": "region"}
            ],
            "name_attr": "name"
        }"#;
        let map: CompanyMap = serde_json::from_str(json).unwrap();
        assert_eq!(map.table, "org_units");
        assert_eq!(map.name_column(), "org_name");
        assert!(!map.column_for("region").unwrap().searchable);
    }

    #[test]
    fn name_column_falls_back_to_key() {
        let map = CompanyMap {
            name_attr: None,
            ..CompanyMap::default_map()
        };
        assert_eq!(map.name_column(), "customer_id");
    }
}
