//! Datastore wire types
//!
//! Request and response shapes of the datastore's `datastore_search` action
//! API, and their conversion to the domain schema model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::table::{Column, ColumnType, QueryDescriptor};

/// Body of a `datastore_search` action request
#[derive(Debug, Serialize)]
pub struct SearchAction {
    pub resource_id: String,
    /// Column name to permitted values; a row matches when each filtered
    /// column equals any of its listed values
    pub filters: serde_json::Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    pub limit: u32,
    pub offset: u64,
}

impl SearchAction {
    pub fn from_descriptor(descriptor: &QueryDescriptor) -> Self {
        let mut filters = serde_json::Map::new();
        for clause in &descriptor.clauses {
            let values: Vec<Value> = clause
                .values
                .iter()
                .filter_map(|v| serde_json::to_value(v).ok())
                .collect();
            filters.insert(clause.column.clone(), Value::Array(values));
        }

        Self {
            resource_id: descriptor.resource_id.clone(),
            filters,
            sort: descriptor.sort.as_ref().map(|s| s.as_order_clause()),
            limit: descriptor.page.limit,
            offset: descriptor.page.offset,
        }
    }

    /// Schema-only probe: no rows, no filters
    pub fn schema_probe(resource_id: &str) -> Self {
        Self {
            resource_id: resource_id.to_string(),
            filters: serde_json::Map::new(),
            sort: None,
            limit: 0,
            offset: 0,
        }
    }
}

/// Action API response envelope
#[derive(Debug, Deserialize)]
pub struct SearchEnvelope {
    pub success: bool,
    #[serde(default)]
    pub result: Option<SearchResultBody>,
    #[serde(default)]
    pub error: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResultBody {
    pub fields: Vec<FieldDef>,
    pub records: Vec<serde_json::Map<String, Value>>,
    pub total: u64,
}

/// Column descriptor as the datastore reports it
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDef {
    pub id: String,
    #[serde(rename = "type")]
    pub ftype: String,
    #[serde(default)]
    pub sortable: Option<bool>,
    #[serde(default)]
    pub facetable: Option<bool>,
}

impl From<FieldDef> for Column {
    fn from(field: FieldDef) -> Self {
        Self {
            name: field.id,
            ctype: map_field_type(&field.ftype),
            sortable: field.sortable.unwrap_or(true),
            facetable: field.facetable.unwrap_or(false),
        }
    }
}

/// Map the datastore's storage type names onto the view's declared types.
/// Unrecognized types display as text, which is always safe.
fn map_field_type(ftype: &str) -> ColumnType {
    match ftype.to_ascii_lowercase().as_str() {
        "numeric" | "int" | "int4" | "int8" | "float" | "float4" | "float8"
        | "double precision" => ColumnType::Numeric,
        "bool" | "boolean" => ColumnType::Boolean,
        "timestamp" | "timestamptz" | "date" => ColumnType::Timestamp,
        _ => ColumnType::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::{FilterClause, PageWindow, SortDirective, build_query, TableSchema};

    fn schema() -> TableSchema {
        TableSchema::new(vec![
            Column::new("city", ColumnType::Text),
            Column::new("price", ColumnType::Numeric),
        ])
    }

    #[test]
    fn field_types_map_onto_declared_types() {
        assert_eq!(map_field_type("text"), ColumnType::Text);
        assert_eq!(map_field_type("int8"), ColumnType::Numeric);
        assert_eq!(map_field_type("BOOL"), ColumnType::Boolean);
        assert_eq!(map_field_type("timestamptz"), ColumnType::Timestamp);
        assert_eq!(map_field_type("jsonb"), ColumnType::Text);
    }

    #[test]
    fn field_def_converts_with_flag_defaults() {
        let field: FieldDef = serde_json::from_str(r#"{"id": "city", "type": "text"}"#).unwrap();
        let column = Column::from(field);
        assert!(column.sortable);
        assert!(!column.facetable);
        assert_eq!(column.ctype, ColumnType::Text);
    }

    #[test]
    fn action_body_carries_descriptor_unmodified() {
        let clauses = [
            FilterClause {
                column: "city".to_string(),
                values: vec!["NYC".to_string(), "LA".to_string()],
            },
            FilterClause {
                column: "price".to_string(),
                values: vec!["10.5".to_string()],
            },
        ];
        let sort = SortDirective::parse("price:desc").unwrap();
        let page = PageWindow::clamped(20, 50, 500);
        let (descriptor, _) = build_query("res-1", &clauses, Some(&sort), page, &schema()).unwrap();

        let action = SearchAction::from_descriptor(&descriptor);
        let json = serde_json::to_value(&action).unwrap();

        assert_eq!(json["resource_id"], "res-1");
        assert_eq!(json["filters"]["city"], serde_json::json!(["NYC", "LA"]));
        assert_eq!(json["filters"]["price"], serde_json::json!([10.5]));
        assert_eq!(json["sort"], "price desc");
        assert_eq!(json["limit"], 50);
        assert_eq!(json["offset"], 20);
    }

    #[test]
    fn schema_probe_requests_no_rows() {
        let action = SearchAction::schema_probe("res-1");
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["limit"], 0);
        assert!(json.get("sort").is_none());
    }
}
