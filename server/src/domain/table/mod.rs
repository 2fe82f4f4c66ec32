//! Table view engine
//!
//! Converts user-supplied column filters, sort order, and page requests into
//! a query descriptor for the external datastore, and raw result rows back
//! into a display-ready payload.
//!
//! Everything in this module is a pure function of its inputs. Invalid filter
//! pieces are dropped with a warning instead of failing the request, so a
//! partially bad filter set still renders the rest of the table.

pub mod filters;
pub mod normalize;
pub mod query;
pub mod schema;
pub mod warnings;

pub use filters::{FilterClause, FilterInputError, parse_filters, parse_filters_param};
pub use normalize::{Facet, FacetValue, ResultPayload, compute_facets, normalize};
pub use query::{
    PageWindow, QueryBuildError, QueryDescriptor, SortDirection, SortDirective, SortParseError,
    TypedClause, TypedValue, build_query,
};
pub use schema::{Column, ColumnType, TableSchema};
pub use warnings::ViewWarning;
