//! Non-fatal warnings accumulated while serving a view request
//!
//! A warning records a filter piece that was dropped so the rest of the
//! table could still be served. Warnings are returned to the caller in the
//! response body and are never fatal on their own.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ViewWarning {
    /// A filter referenced a column the schema does not declare
    UnknownColumn { column: String },
    /// A filter value could not be coerced to the column's declared type
    TypeCoercion { column: String, value: String },
    /// A filter entry carried a value shape the view does not support
    UnsupportedValue { column: String },
    /// The sort directive was dropped and the query retried without it
    SortDropped { column: String },
    /// The requested offset lies beyond the last matching row
    PageOutOfRange { offset: u64, total: u64 },
}

impl fmt::Display for ViewWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownColumn { column } => write!(f, "unknown column: {}", column),
            Self::TypeCoercion { column, value } => {
                write!(f, "value {:?} not valid for column {}", value, column)
            }
            Self::UnsupportedValue { column } => {
                write!(f, "unsupported filter value for column {}", column)
            }
            Self::SortDropped { column } => {
                write!(f, "cannot sort by column {}, sort dropped", column)
            }
            Self::PageOutOfRange { offset, total } => {
                write!(f, "offset {} is beyond total row count {}", offset, total)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_serializes_with_code_tag() {
        let w = ViewWarning::UnknownColumn {
            column: "country".to_string(),
        };
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["code"], "unknown_column");
        assert_eq!(json["column"], "country");
    }

    #[test]
    fn warning_display_names_the_column() {
        let w = ViewWarning::SortDropped {
            column: "id".to_string(),
        };
        assert_eq!(w.to_string(), "cannot sort by column id, sort dropped");
    }
}
