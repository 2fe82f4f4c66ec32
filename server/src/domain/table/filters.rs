//! Filter parsing
//!
//! Parses the raw `filters` query parameter, a JSON object mapping column
//! names to one or more permitted values, into validated filter clauses.
//!
//! Unknown columns are dropped with a warning rather than failing the
//! request. Values stay strings at this stage; type coercion happens in the
//! query builder, which knows each column's declared type.

use serde_json::Value;
use thiserror::Error;

use super::schema::TableSchema;
use super::warnings::ViewWarning;

/// Maximum number of values allowed in a single clause
pub const MAX_FILTER_VALUES: usize = 500;

/// One column-scoped filter constraint.
///
/// A row matches the clause when the column value equals any of the listed
/// values. Clauses on different columns are combined with AND.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    pub column: String,
    pub values: Vec<String>,
}

/// Fatal filter input errors. Everything recoverable is a [`ViewWarning`].
#[derive(Debug, Error)]
pub enum FilterInputError {
    #[error("filters must be a JSON object mapping column names to values: {0}")]
    InvalidJson(String),
    #[error("filters must be a JSON object mapping column names to values")]
    NotAnObject,
    #[error("too many filter values for column {column} (maximum {max})")]
    TooManyValues { column: String, max: usize },
}

/// Parse the raw `filters` query parameter string.
pub fn parse_filters_param(
    raw: &str,
    schema: &TableSchema,
) -> Result<(Vec<FilterClause>, Vec<ViewWarning>), FilterInputError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| FilterInputError::InvalidJson(e.to_string()))?;
    let map = value.as_object().ok_or(FilterInputError::NotAnObject)?;
    parse_filters(map, schema)
}

/// Parse a decoded filter mapping into clauses.
///
/// Output clause order follows schema column order, not request order, so
/// equivalent requests produce identical clause lists.
pub fn parse_filters(
    raw: &serde_json::Map<String, Value>,
    schema: &TableSchema,
) -> Result<(Vec<FilterClause>, Vec<ViewWarning>), FilterInputError> {
    let mut clauses = Vec::new();
    let mut warnings = Vec::new();

    for column in schema.columns() {
        let Some(value) = raw.get(&column.name) else {
            continue;
        };
        let Some(values) = collect_values(value) else {
            warnings.push(ViewWarning::UnsupportedValue {
                column: column.name.clone(),
            });
            continue;
        };
        if values.len() > MAX_FILTER_VALUES {
            return Err(FilterInputError::TooManyValues {
                column: column.name.clone(),
                max: MAX_FILTER_VALUES,
            });
        }
        // An empty value set imposes no constraint
        if !values.is_empty() {
            clauses.push(FilterClause {
                column: column.name.clone(),
                values,
            });
        }
    }

    for name in raw.keys() {
        if schema.column(name).is_none() {
            warnings.push(ViewWarning::UnknownColumn {
                column: name.clone(),
            });
        }
    }

    Ok((clauses, warnings))
}

/// Extract the value set of one filter entry, deduplicated in first-seen
/// order. Scalars are accepted as single-element sets. Returns `None` for
/// shapes the view does not support (nested objects or arrays).
fn collect_values(value: &Value) -> Option<Vec<String>> {
    let raw = match value {
        Value::Null => vec![],
        Value::Array(items) => items.iter().map(scalar_to_string).collect::<Option<_>>()?,
        scalar => vec![scalar_to_string(scalar)?],
    };

    let mut values: Vec<String> = Vec::with_capacity(raw.len());
    for v in raw {
        if !values.contains(&v) {
            values.push(v);
        }
    }
    Some(values)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
