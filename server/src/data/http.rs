//! HTTP datastore client
//!
//! Talks to the host platform's datastore action API. Each call is one
//! scoped request: the connection is released on success, fault, or when the
//! caller drops the future mid-flight.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::core::config::DatastoreConfig;
use crate::data::error::DataError;
use crate::data::traits::{DatastoreClient, SearchOutcome};
use crate::data::types::{SearchAction, SearchEnvelope, SearchResultBody};
use crate::domain::table::{Column, QueryDescriptor, TableSchema};

const SEARCH_ACTION_PATH: &str = "/api/3/action/datastore_search";

pub struct HttpDatastore {
    client: reqwest::Client,
    search_url: String,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl HttpDatastore {
    pub fn new(config: &DatastoreConfig) -> Result<Self, DataError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("filterview/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(DataError::Http)?;

        Ok(Self {
            client,
            search_url: format!("{}{}", config.url.trim_end_matches('/'), SEARCH_ACTION_PATH),
            api_key: config.api_key.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    async fn call_search(&self, action: &SearchAction) -> Result<SearchResultBody, DataError> {
        let mut request = self.client.post(&self.search_url).json(action);
        if let Some(key) = &self.api_key {
            request = request.header(reqwest::header::AUTHORIZATION, key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DataError::from_transport(e, self.timeout_secs))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DataError::ResourceNotFound(action.resource_id.clone()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::Backend(format!("{}: {}", status, body)));
        }

        let envelope: SearchEnvelope = response
            .json()
            .await
            .map_err(|e| DataError::Decode(e.to_string()))?;

        if !envelope.success {
            let detail = envelope
                .error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no error detail".to_string());
            return Err(DataError::Backend(detail));
        }
        envelope
            .result
            .ok_or_else(|| DataError::Decode("missing result in successful response".to_string()))
    }
}

#[async_trait]
impl DatastoreClient for HttpDatastore {
    async fn fetch_schema(&self, resource_id: &str) -> Result<TableSchema, DataError> {
        let action = SearchAction::schema_probe(resource_id);
        let result = self.call_search(&action).await?;

        let columns: Vec<Column> = result.fields.into_iter().map(Column::from).collect();
        tracing::debug!(resource_id, columns = columns.len(), "Fetched schema");
        Ok(TableSchema::new(columns))
    }

    async fn search(&self, descriptor: &QueryDescriptor) -> Result<SearchOutcome, DataError> {
        let action = SearchAction::from_descriptor(descriptor);
        let result = self.call_search(&action).await?;

        tracing::debug!(
            resource_id = %descriptor.resource_id,
            rows = result.records.len(),
            total = result.total,
            "Search completed"
        );

        Ok(SearchOutcome {
            rows: result.records,
            total: result.total,
        })
    }
}
