//! Datastore client trait
//!
//! Unified interface to the external tabular datastore. The HTTP
//! implementation lives in [`super::http`]; tests substitute their own.

use async_trait::async_trait;
use serde_json::Value;

use crate::data::error::DataError;
use crate::domain::table::{QueryDescriptor, TableSchema};

/// Raw result of one datastore search.
///
/// Carries no schema: the schema of record is the one from
/// [`DatastoreClient::fetch_schema`], fetched before the search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Matching rows within the requested page window
    pub rows: Vec<serde_json::Map<String, Value>>,
    /// Total matching row count, independent of the page window
    pub total: u64,
}

/// Client for the external datastore holding resource rows and schema.
///
/// Both methods are single suspension points: dropping the returned future
/// mid-flight releases the underlying connection.
#[async_trait]
pub trait DatastoreClient: Send + Sync {
    /// Fetch the column schema of a resource
    async fn fetch_schema(&self, resource_id: &str) -> Result<TableSchema, DataError>;

    /// Execute a search described by the descriptor
    async fn search(&self, descriptor: &QueryDescriptor) -> Result<SearchOutcome, DataError>;
}
