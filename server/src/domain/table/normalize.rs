//! Result normalization
//!
//! Turns raw datastore rows into a display-ready payload: cells reordered to
//! schema display order, missing cells filled with null, and per-column
//! distinct-value facets for the filter UI. Pure function of its inputs.

use std::collections::BTreeMap;
use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::query::PageWindow;
use super::schema::{Column, TableSchema};
use super::warnings::ViewWarning;

/// One distinct value observed in a facetable column
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FacetValue {
    pub value: String,
    pub count: u64,
}

/// Distinct-value facet for one column
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Facet {
    pub values: Vec<FacetValue>,
    /// True when the column held more distinct values than the configured cap
    pub truncated: bool,
}

/// Display-ready view payload
#[derive(Debug, Serialize)]
pub struct ResultPayload {
    /// Columns in display order
    pub columns: Vec<Column>,
    /// Rows with cells keyed by column name, in display order
    pub records: Vec<serde_json::Map<String, Value>>,
    /// Total matching row count, independent of the page window
    pub total: u64,
    pub facets: BTreeMap<String, Facet>,
}

/// Normalize raw rows into a [`ResultPayload`].
///
/// A raw row missing a declared column yields a null cell rather than
/// failing the row; undeclared cells are not carried through.
pub fn normalize(
    rows: Vec<serde_json::Map<String, Value>>,
    schema: &TableSchema,
    total: u64,
    page: PageWindow,
    max_facet_values: usize,
) -> (ResultPayload, Vec<ViewWarning>) {
    let mut warnings = Vec::new();
    if total > 0 && page.offset >= total && rows.is_empty() {
        warnings.push(ViewWarning::PageOutOfRange {
            offset: page.offset,
            total,
        });
    }

    let records: Vec<serde_json::Map<String, Value>> = rows
        .iter()
        .map(|raw| {
            let mut row = serde_json::Map::with_capacity(schema.len());
            for column in schema.columns() {
                let cell = raw.get(&column.name).cloned().unwrap_or(Value::Null);
                row.insert(column.name.clone(), cell);
            }
            row
        })
        .collect();

    let facets = compute_facets(&rows, schema, max_facet_values);

    let payload = ResultPayload {
        columns: schema.columns().to_vec(),
        records,
        total,
        facets,
    };
    (payload, warnings)
}

/// Compute distinct-value facets for the facetable columns of the schema,
/// capped at `max_facet_values` per column.
pub fn compute_facets(
    rows: &[serde_json::Map<String, Value>],
    schema: &TableSchema,
    max_facet_values: usize,
) -> BTreeMap<String, Facet> {
    let mut facets = BTreeMap::new();

    for column in schema.columns() {
        if !column.facetable {
            continue;
        }

        let mut counts: HashMap<String, u64> = HashMap::new();
        for row in rows {
            if let Some(value) = row.get(&column.name).and_then(facet_key) {
                *counts.entry(value).or_insert(0) += 1;
            }
        }

        let distinct = counts.len();
        let mut values: Vec<FacetValue> = counts
            .into_iter()
            .map(|(value, count)| FacetValue { value, count })
            .collect();
        values.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
        values.truncate(max_facet_values);

        facets.insert(
            column.name.clone(),
            Facet {
                values,
                truncated: distinct > max_facet_values,
            },
        );
    }

    facets
}

fn facet_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
