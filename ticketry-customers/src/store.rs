//! CRUD over the company table, with SQL assembled from the column map.

use crate::map::CompanyMap;
use crate::{CustomersError, CustomersResult};
use rusqlite::{params, Connection, OptionalExtension, ToSql};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// A customer company record: its ID plus the mapped attributes that carry
/// a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub id: String,
    pub attrs: BTreeMap<String, String>,
}

/// Store for customer company records.
///
/// Every statement is built from the [`CompanyMap`] supplied at
/// construction; caller input only ever appears as bind parameters.
pub struct CompanyStore {
    conn: Arc<Mutex<Connection>>,
    map: CompanyMap,
}

impl CompanyStore {
    /// Opens (or creates) a company store at the given path.
    pub fn open(path: impl AsRef<Path>, map: CompanyMap) -> CustomersResult<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn, map)
    }

    /// Opens an in-memory company store (for testing).
    pub fn open_in_memory(map: CompanyMap) -> CustomersResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, map)
    }

    fn with_connection(conn: Connection, map: CompanyMap) -> CustomersResult<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            map,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> CustomersResult<()> {
        let mut columns = vec![format!("{} TEXT PRIMARY KEY", self.map.key_column)];
        columns.extend(
            self.map
                .columns
                .iter()
                .map(|spec| format!("{} TEXT", spec.column)),
        );
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.map.table,
            columns.join(", ")
        );
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(&sql)?;
        Ok(())
    }

    /// The column map this store was built with.
    #[must_use]
    pub fn map(&self) -> &CompanyMap {
        &self.map
    }

    fn check_attrs(&self, attrs: &BTreeMap<String, String>) -> CustomersResult<()> {
        for attr in attrs.keys() {
            if self.map.column_for(attr).is_none() {
                return Err(CustomersError::UnknownAttribute { attr: attr.clone() });
            }
        }
        Ok(())
    }

    /// Creates a company record. All attributes the map marks required must
    /// be present.
    pub fn add(&self, id: &str, attrs: &BTreeMap<String, String>) -> CustomersResult<()> {
        self.check_attrs(attrs)?;
        for required in self.map.required_attrs() {
            if !attrs.contains_key(required) {
                return Err(CustomersError::MissingAttribute {
                    attr: required.to_string(),
                });
            }
        }

        let mut columns = vec![self.map.key_column.as_str()];
        let mut binds: Vec<&dyn ToSql> = vec![&id];
        for spec in &self.map.columns {
            if let Some(value) = attrs.get(&spec.attr) {
                columns.push(spec.column.as_str());
                binds.push(value);
            }
        }
        let placeholders = vec!["?"; binds.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.map.table,
            columns.join(", "),
            placeholders
        );

        let conn = self.conn.lock().unwrap();
        conn.execute(&sql, binds.as_slice())?;
        debug!(table = %self.map.table, id, "added customer company");
        Ok(())
    }

    /// Updates the given attributes of an existing record. Attributes not
    /// named are left untouched.
    pub fn update(&self, id: &str, attrs: &BTreeMap<String, String>) -> CustomersResult<()> {
        self.check_attrs(attrs)?;
        if attrs.is_empty() {
            return Ok(());
        }

        let mut assignments = Vec::new();
        let mut binds: Vec<&dyn ToSql> = Vec::new();
        for spec in &self.map.columns {
            if let Some(value) = attrs.get(&spec.attr) {
                assignments.push(format!("{} = ?", spec.column));
                binds.push(value);
            }
        }
        binds.push(&id);
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            self.map.table,
            assignments.join(", "),
            self.map.key_column
        );

        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(&sql, binds.as_slice())?;
        if changed == 0 {
            return Err(CustomersError::NotFound { id: id.to_string() });
        }
        Ok(())
    }

    /// Changes a record's ID (the original "company rename" operation).
    pub fn rename(&self, old_id: &str, new_id: &str) -> CustomersResult<()> {
        let sql = format!(
            "UPDATE {} SET {} = ?1 WHERE {} = ?2",
            self.map.table, self.map.key_column, self.map.key_column
        );
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(&sql, params![new_id, old_id])?;
        if changed == 0 {
            return Err(CustomersError::NotFound {
                id: old_id.to_string(),
            });
        }
        Ok(())
    }

    /// Reads a company record, if present.
    pub fn get(&self, id: &str) -> CustomersResult<Option<Company>> {
        let column_list: Vec<&str> = self
            .map
            .columns
            .iter()
            .map(|spec| spec.column.as_str())
            .collect();
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1",
            column_list.join(", "),
            self.map.table,
            self.map.key_column
        );

        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(&sql, params![id], |row| {
                let mut attrs = BTreeMap::new();
                for (idx, spec) in self.map.columns.iter().enumerate() {
                    if let Some(value) = row.get::<_, Option<String>>(idx)? {
                        attrs.insert(spec.attr.clone(), value);
                    }
                }
                Ok(attrs)
            })
            .optional()?;
        Ok(row.map(|attrs| Company {
            id: id.to_string(),
            attrs,
        }))
    }

    /// Removes a company record.
    pub fn delete(&self, id: &str) -> CustomersResult<()> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?1",
            self.map.table, self.map.key_column
        );
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(&sql, params![id])?;
        if changed == 0 {
            return Err(CustomersError::NotFound { id: id.to_string() });
        }
        Ok(())
    }

    /// Lists every company as `(id, display name)`, ordered by name.
    pub fn list(&self) -> CustomersResult<Vec<(String, String)>> {
        let sql = format!(
            "SELECT {key}, COALESCE({name}, {key}) FROM {table} ORDER BY 2",
            key = self.map.key_column,
            name = self.map.name_column(),
            table = self.map.table
        );
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Searches companies by substring over the key column and every
    /// searchable mapped column. `*` wildcards translate to SQL `%`.
    pub fn search(&self, term: &str) -> CustomersResult<Vec<(String, String)>> {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            return self.list();
        }
        let pattern = if trimmed.contains('*') {
            trimmed.replace('*', "%")
        } else {
            format!("%{trimmed}%")
        };

        let mut clauses = vec![format!("{} LIKE ?", self.map.key_column)];
        clauses.extend(
            self.map
                .searchable_columns()
                .map(|spec| format!("{} LIKE ?", spec.column)),
        );
        let sql = format!(
            "SELECT {key}, COALESCE({name}, {key}) FROM {table} WHERE {clauses} ORDER BY 2",
            key = self.map.key_column,
            name = self.map.name_column(),
            table = self.map.table,
            clauses = clauses.join(" OR ")
        );
        let binds: Vec<&dyn ToSql> = clauses.iter().map(|_| &pattern as &dyn ToSql).collect();

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(binds.as_slice(), |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

impl std::fmt::Debug for CompanyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompanyStore")
            .field("table", &self.map.table)
            .finish_non_exhaustive()
    }
}
