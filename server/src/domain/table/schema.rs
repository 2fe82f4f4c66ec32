//! Resource schema model
//!
//! Column metadata for a viewable resource, as reported by the datastore.
//! A schema is immutable for the duration of one view request.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Declared type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Numeric,
    Boolean,
    Timestamp,
}

fn default_sortable() -> bool {
    true
}

/// One column of a tabular resource
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct Column {
    /// Column name, unique within a resource
    pub name: String,
    #[serde(rename = "type")]
    pub ctype: ColumnType,
    /// Whether the datastore accepts this column in an ORDER BY
    #[serde(default = "default_sortable")]
    pub sortable: bool,
    /// Whether distinct-value facets are computed for this column
    #[serde(default)]
    pub facetable: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, ctype: ColumnType) -> Self {
        Self {
            name: name.into(),
            ctype,
            sortable: true,
            facetable: false,
        }
    }
}

/// Ordered column list for one resource snapshot.
///
/// Column order is the display order and drives the deterministic ordering of
/// filter clauses and payload cells.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TableSchema {
    columns: Vec<Column>,
}

impl TableSchema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_lookup_preserves_declared_order() {
        let schema = TableSchema::new(vec![
            Column::new("city", ColumnType::Text),
            Column::new("price", ColumnType::Numeric),
        ]);

        assert_eq!(schema.len(), 2);
        assert_eq!(schema.columns()[0].name, "city");
        assert_eq!(schema.column("price").unwrap().ctype, ColumnType::Numeric);
        assert!(schema.column("country").is_none());
    }

    #[test]
    fn column_flags_default_on_deserialize() {
        let col: Column = serde_json::from_str(r#"{"name": "city", "type": "text"}"#).unwrap();
        assert!(col.sortable);
        assert!(!col.facetable);
    }

    #[test]
    fn column_flags_honored_on_deserialize() {
        let col: Column = serde_json::from_str(
            r#"{"name": "id", "type": "numeric", "sortable": false, "facetable": true}"#,
        )
        .unwrap();
        assert!(!col.sortable);
        assert!(col.facetable);
    }
}
