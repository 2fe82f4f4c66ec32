//! Query building
//!
//! Composes parsed filter clauses, a sort directive, and a page window into
//! an immutable query descriptor for the datastore. String filter values are
//! coerced to each column's declared type here; values that fail coercion are
//! dropped with a warning, and a clause whose value set empties out is
//! dropped entirely.
//!
//! Building is deterministic: identical inputs always produce an identical
//! descriptor.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use super::filters::FilterClause;
use super::schema::{ColumnType, TableSchema};
use super::warnings::ViewWarning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Single-column sort directive, parsed from `col`, `col:asc`, or `col:desc`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortDirective {
    pub column: String,
    pub direction: SortDirection,
}

#[derive(Debug, Error)]
#[error("invalid sort format: use 'column', 'column:asc', or 'column:desc'")]
pub struct SortParseError;

impl SortDirective {
    pub fn parse(s: &str) -> Result<Self, SortParseError> {
        let parts: Vec<&str> = s.split(':').collect();
        let (column, direction) = match parts.as_slice() {
            [col] => (*col, SortDirection::Asc),
            [col, "asc"] => (*col, SortDirection::Asc),
            [col, "desc"] => (*col, SortDirection::Desc),
            _ => return Err(SortParseError),
        };
        if column.is_empty() {
            return Err(SortParseError);
        }
        Ok(Self {
            column: column.to_string(),
            direction,
        })
    }

    /// Render as the datastore's `sort` expression (e.g. `city asc`)
    pub fn as_order_clause(&self) -> String {
        format!("{} {}", self.column, self.direction.as_str())
    }
}

/// Pagination window. Construction clamps instead of rejecting: the limit is
/// forced into `[1, max_page_size]` and negative offsets become 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u32,
}

impl PageWindow {
    pub fn clamped(offset: i64, limit: i64, max_page_size: u32) -> Self {
        Self {
            offset: offset.max(0) as u64,
            limit: limit.clamp(1, i64::from(max_page_size)) as u32,
        }
    }
}

/// A filter value after coercion to its column's declared type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

/// A filter clause with coerced values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedClause {
    pub column: String,
    pub values: Vec<TypedValue>,
}

/// Immutable query descriptor, passed unmodified to the datastore client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryDescriptor {
    pub resource_id: String,
    pub clauses: Vec<TypedClause>,
    pub sort: Option<SortDirective>,
    pub page: PageWindow,
}

#[derive(Debug, Error)]
pub enum QueryBuildError {
    #[error("cannot sort by column: {column}")]
    InvalidSort { column: String },
}

/// Build a query descriptor from parsed request pieces.
///
/// Fails only when the sort column is unknown or flagged non-sortable; the
/// caller is expected to drop the sort and rebuild.
pub fn build_query(
    resource_id: &str,
    clauses: &[FilterClause],
    sort: Option<&SortDirective>,
    page: PageWindow,
    schema: &TableSchema,
) -> Result<(QueryDescriptor, Vec<ViewWarning>), QueryBuildError> {
    if let Some(sort) = sort {
        let sortable = schema.column(&sort.column).is_some_and(|c| c.sortable);
        if !sortable {
            return Err(QueryBuildError::InvalidSort {
                column: sort.column.clone(),
            });
        }
    }

    let mut warnings = Vec::new();
    let mut typed = Vec::with_capacity(clauses.len());

    for clause in clauses {
        // Parsing already validated the column against the schema
        let Some(column) = schema.column(&clause.column) else {
            continue;
        };

        let mut values = Vec::with_capacity(clause.values.len());
        for raw in &clause.values {
            match coerce(raw, column.ctype) {
                Some(v) => values.push(v),
                None => warnings.push(ViewWarning::TypeCoercion {
                    column: clause.column.clone(),
                    value: raw.clone(),
                }),
            }
        }

        // A clause emptied by coercion imposes no constraint
        if !values.is_empty() {
            typed.push(TypedClause {
                column: clause.column.clone(),
                values,
            });
        }
    }

    let descriptor = QueryDescriptor {
        resource_id: resource_id.to_string(),
        clauses: typed,
        sort: sort.cloned(),
        page,
    };
    Ok((descriptor, warnings))
}

fn coerce(raw: &str, ctype: ColumnType) -> Option<TypedValue> {
    let trimmed = raw.trim();
    match ctype {
        ColumnType::Text => Some(TypedValue::Text(raw.to_string())),
        ColumnType::Numeric => trimmed.parse::<f64>().ok().map(TypedValue::Number),
        ColumnType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "on" | "1" => Some(TypedValue::Bool(true)),
            "false" | "f" | "no" | "off" | "0" => Some(TypedValue::Bool(false)),
            _ => None,
        },
        ColumnType::Timestamp => DateTime::parse_from_rfc3339(trimmed)
            .ok()
            .map(|dt| TypedValue::Timestamp(dt.with_timezone(&Utc))),
    }
}
