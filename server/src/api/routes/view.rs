//! Resource view endpoints
//!
//! The controller for one view request: parse filters, build the query,
//! call the datastore, normalize the rows. Invalid filter pieces degrade to
//! warnings in the response; only datastore faults fail the request.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, header};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::api::extractors::{ResourcePath, ValidatedQuery};
use crate::api::types::ApiError;
use crate::core::config::ViewConfig;
use crate::core::constants::MAX_FILTER_PARAM_SIZE;
use crate::data::traits::DatastoreClient;
use crate::domain::table::{
    Column, Facet, FilterClause, FilterInputError, PageWindow, QueryBuildError, SortDirective,
    TableSchema, ViewWarning, build_query, compute_facets, normalize, parse_filters_param,
};

#[derive(Clone)]
pub struct ViewApiState {
    pub datastore: Arc<dyn DatastoreClient>,
    pub view: ViewConfig,
}

/// Validator function for the filters parameter size
fn validate_filters_size(filters: &str) -> Result<(), ValidationError> {
    if filters.len() as u64 > MAX_FILTER_PARAM_SIZE {
        return Err(ValidationError::new("filters_too_large").with_message(
            format!(
                "filters must be at most {} bytes",
                MAX_FILTER_PARAM_SIZE
            )
            .into(),
        ));
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ViewQuery {
    /// JSON object mapping column names to one or more permitted values
    #[validate(custom(function = "validate_filters_size"))]
    pub filters: Option<String>,
    /// Sort directive: `column`, `column:asc`, or `column:desc`
    pub sort: Option<String>,
    /// Row offset; negative values are clamped to 0
    pub offset: Option<i64>,
    /// Rows per page; clamped to the configured maximum
    pub limit: Option<i64>,
}

/// Display-ready table payload for one view request
#[derive(Debug, Serialize, ToSchema)]
pub struct ViewResponse {
    /// Columns in display order
    pub columns: Vec<Column>,
    /// Rows with cells keyed by column name, in display order
    #[schema(value_type = Vec<Object>)]
    pub records: Vec<serde_json::Map<String, serde_json::Value>>,
    /// Total matching row count, independent of the page window
    pub total: u64,
    pub facets: BTreeMap<String, Facet>,
    pub offset: u64,
    pub limit: u32,
    /// Filter pieces that were dropped while serving the request
    pub warnings: Vec<ViewWarning>,
}

/// Render a resource as a filterable, sortable, paginated table
#[utoipa::path(
    get,
    path = "/api/v1/resource/{resource_id}/view",
    tag = "view",
    params(
        ("resource_id" = String, Path, description = "Resource ID"),
        ("filters" = Option<String>, Query, description = "JSON object mapping column names to permitted values"),
        ("sort" = Option<String>, Query, description = "Sort directive (e.g. price:desc)"),
        ("offset" = Option<i64>, Query, description = "Row offset"),
        ("limit" = Option<i64>, Query, description = "Rows per page")
    ),
    responses(
        (status = 200, description = "Table payload with warnings for dropped filter pieces", body = ViewResponse),
        (status = 404, description = "Resource not found")
    )
)]
pub async fn get_view(
    State(state): State<ViewApiState>,
    path: ResourcePath,
    ValidatedQuery(query): ValidatedQuery<ViewQuery>,
) -> Result<(HeaderMap, Json<ViewResponse>), ApiError> {
    let resource_id = &path.resource_id;
    let schema = state
        .datastore
        .fetch_schema(resource_id)
        .await
        .map_err(ApiError::from_data)?;

    let mut warnings = Vec::new();

    let clauses: Vec<FilterClause> = match &query.filters {
        Some(raw) => {
            let (clauses, filter_warnings) =
                parse_filters_param(raw, &schema).map_err(filter_input_error)?;
            warnings.extend(filter_warnings);
            clauses
        }
        None => vec![],
    };

    let sort = query
        .sort
        .as_deref()
        .map(SortDirective::parse)
        .transpose()
        .map_err(|e| ApiError::bad_request("INVALID_SORT", e.to_string()))?;

    let page = PageWindow::clamped(
        query.offset.unwrap_or(0),
        query
            .limit
            .unwrap_or(i64::from(state.view.default_page_size)),
        state.view.max_page_size,
    );

    let (descriptor, coercion_warnings) =
        match build_query(resource_id, &clauses, sort.as_ref(), page, &schema) {
            Ok(built) => built,
            Err(QueryBuildError::InvalidSort { column }) => {
                // Degrade instead of failing: drop the sort and rebuild once
                tracing::debug!(column = %column, "Sort dropped, rebuilding without sort");
                warnings.push(ViewWarning::SortDropped { column });
                build_query(resource_id, &clauses, None, page, &schema)
                    .map_err(|e| ApiError::internal(e.to_string()))?
            }
        };
    warnings.extend(coercion_warnings);

    let outcome = state
        .datastore
        .search(&descriptor)
        .await
        .map_err(ApiError::from_data)?;

    let (payload, page_warnings) = normalize(
        outcome.rows,
        &schema,
        outcome.total,
        page,
        state.view.max_facet_values,
    );
    warnings.extend(page_warnings);

    if !warnings.is_empty() {
        tracing::debug!(
            resource_id,
            dropped = warnings.len(),
            "View served with dropped filter pieces"
        );
    }

    let mut headers = HeaderMap::new();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

    Ok((
        headers,
        Json(ViewResponse {
            columns: payload.columns,
            records: payload.records,
            total: payload.total,
            facets: payload.facets,
            offset: page.offset,
            limit: page.limit,
            warnings,
        }),
    ))
}

fn filter_input_error(e: FilterInputError) -> ApiError {
    let code = match e {
        FilterInputError::InvalidJson(_) | FilterInputError::NotAnObject => "INVALID_FILTER_JSON",
        FilterInputError::TooManyValues { .. } => "TOO_MANY_FILTER_VALUES",
    };
    ApiError::bad_request(code, e.to_string())
}

// --- Facet options ---

#[derive(Debug, Default, Deserialize, Validate)]
pub struct FacetsQuery {
    /// Comma-separated list of columns to compute facets for
    /// (default: all facetable columns)
    pub columns: Option<String>,
}

/// Facet values for the filter UI controls
#[derive(Debug, Serialize, ToSchema)]
pub struct FacetsResponse {
    pub facets: BTreeMap<String, Facet>,
    /// Number of rows the facets were computed from
    pub sample_size: u64,
    /// Total matching row count
    pub total: u64,
}

/// Get distinct values with counts for facetable columns.
///
/// Facets are computed from the first page of rows (up to the configured
/// maximum page size), not the whole table.
#[utoipa::path(
    get,
    path = "/api/v1/resource/{resource_id}/view/facets",
    tag = "view",
    params(
        ("resource_id" = String, Path, description = "Resource ID"),
        ("columns" = Option<String>, Query, description = "Comma-separated list of columns")
    ),
    responses(
        (status = 200, description = "Facet values per column", body = FacetsResponse),
        (status = 404, description = "Resource not found")
    )
)]
pub async fn get_view_facets(
    State(state): State<ViewApiState>,
    path: ResourcePath,
    ValidatedQuery(query): ValidatedQuery<FacetsQuery>,
) -> Result<(HeaderMap, Json<FacetsResponse>), ApiError> {
    let resource_id = &path.resource_id;
    let schema = state
        .datastore
        .fetch_schema(resource_id)
        .await
        .map_err(ApiError::from_data)?;

    let requested: Option<Vec<&str>> = query
        .columns
        .as_deref()
        .map(|s| s.split(',').map(str::trim).collect());

    let selected = TableSchema::new(
        schema
            .columns()
            .iter()
            .filter(|c| c.facetable)
            .filter(|c| {
                requested
                    .as_ref()
                    .is_none_or(|names| names.contains(&c.name.as_str()))
            })
            .cloned()
            .collect(),
    );

    let page = PageWindow::clamped(
        0,
        i64::from(state.view.max_page_size),
        state.view.max_page_size,
    );
    let (descriptor, _) = build_query(resource_id, &[], None, page, &schema)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let outcome = state
        .datastore
        .search(&descriptor)
        .await
        .map_err(ApiError::from_data)?;

    let facets = compute_facets(&outcome.rows, &selected, state.view.max_facet_values);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("private, max-age=30"),
    );

    Ok((
        headers,
        Json(FacetsResponse {
            facets,
            sample_size: outcome.rows.len() as u64,
            total: outcome.total,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    use crate::data::error::DataError;
    use crate::data::traits::SearchOutcome;
    use crate::domain::table::{ColumnType, QueryDescriptor};

    struct MockDatastore {
        schema: TableSchema,
        rows: Vec<serde_json::Map<String, serde_json::Value>>,
        total: u64,
        fail_search: bool,
        searches: Mutex<Vec<QueryDescriptor>>,
    }

    impl MockDatastore {
        fn new(schema: TableSchema, rows: Vec<serde_json::Value>, total: u64) -> Self {
            Self {
                schema,
                rows: rows
                    .into_iter()
                    .map(|v| v.as_object().unwrap().clone())
                    .collect(),
                total,
                fail_search: false,
                searches: Mutex::new(Vec::new()),
            }
        }

        fn searches(&self) -> Vec<QueryDescriptor> {
            self.searches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DatastoreClient for MockDatastore {
        async fn fetch_schema(&self, _resource_id: &str) -> Result<TableSchema, DataError> {
            Ok(self.schema.clone())
        }

        async fn search(&self, descriptor: &QueryDescriptor) -> Result<SearchOutcome, DataError> {
            self.searches.lock().unwrap().push(descriptor.clone());
            if self.fail_search {
                return Err(DataError::Timeout { timeout_secs: 30 });
            }
            Ok(SearchOutcome {
                rows: self.rows.clone(),
                total: self.total,
            })
        }
    }

    fn schema() -> TableSchema {
        let mut city = Column::new("city", ColumnType::Text);
        city.facetable = true;
        let mut id = Column::new("id", ColumnType::Numeric);
        id.sortable = false;
        TableSchema::new(vec![city, Column::new("price", ColumnType::Numeric), id])
    }

    fn state_with(mock: Arc<MockDatastore>) -> ViewApiState {
        ViewApiState {
            datastore: mock,
            view: ViewConfig {
                max_page_size: 500,
                default_page_size: 50,
                max_facet_values: 50,
            },
        }
    }

    fn resource() -> ResourcePath {
        ResourcePath {
            resource_id: "res-1".to_string(),
        }
    }

    async fn call(state: ViewApiState, query: ViewQuery) -> Result<ViewResponse, ApiError> {
        get_view(State(state), resource(), ValidatedQuery(query)).await.map(|(_, Json(body))| body)
    }

    #[tokio::test]
    async fn serves_table_with_valid_filters() {
        let mock = Arc::new(MockDatastore::new(
            schema(),
            vec![json!({"city": "NYC", "price": 10, "id": 1})],
            1,
        ));
        let body = call(
            state_with(mock.clone()),
            ViewQuery {
                filters: Some(r#"{"city": ["NYC", "LA"]}"#.to_string()),
                ..ViewQuery::default()
            },
        )
        .await
        .unwrap();

        assert!(body.warnings.is_empty());
        assert_eq!(body.total, 1);
        assert_eq!(body.records[0]["city"], json!("NYC"));

        let searches = mock.searches();
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].clauses[0].column, "city");
        assert_eq!(searches[0].clauses[0].values.len(), 2);
    }

    #[tokio::test]
    async fn unknown_filter_column_warned_and_rest_served() {
        let mock = Arc::new(MockDatastore::new(schema(), vec![], 0));
        let body = call(
            state_with(mock.clone()),
            ViewQuery {
                filters: Some(r#"{"city": ["NYC"], "country": ["US"]}"#.to_string()),
                ..ViewQuery::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(
            body.warnings,
            vec![ViewWarning::UnknownColumn {
                column: "country".to_string()
            }]
        );
        let searches = mock.searches();
        assert_eq!(searches[0].clauses.len(), 1);
        assert_eq!(searches[0].clauses[0].column, "city");
    }

    #[tokio::test]
    async fn columns_and_cells_follow_the_fetched_schema() {
        let mock = Arc::new(MockDatastore::new(
            schema(),
            vec![json!({"price": 10, "id": 1, "_rank": 0.5})],
            1,
        ));
        let body = call(state_with(mock), ViewQuery::default()).await.unwrap();

        let names: Vec<&str> = body.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["city", "price", "id"]);
        assert_eq!(body.records[0]["city"], serde_json::Value::Null);
        assert!(!body.records[0].contains_key("_rank"));
    }

    #[tokio::test]
    async fn non_sortable_sort_dropped_and_query_retried_without_it() {
        let mock = Arc::new(MockDatastore::new(schema(), vec![], 0));
        let body = call(
            state_with(mock.clone()),
            ViewQuery {
                sort: Some("id:desc".to_string()),
                ..ViewQuery::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(
            body.warnings,
            vec![ViewWarning::SortDropped {
                column: "id".to_string()
            }]
        );
        let searches = mock.searches();
        assert_eq!(searches.len(), 1);
        assert!(searches[0].sort.is_none());
    }

    #[tokio::test]
    async fn backend_fault_fails_the_request() {
        let mut mock = MockDatastore::new(schema(), vec![], 0);
        mock.fail_search = true;
        let mock = Arc::new(mock);

        let err = call(state_with(mock.clone()), ViewQuery::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::ServiceUnavailable { .. }));
        assert_eq!(mock.searches().len(), 1);
    }

    #[tokio::test]
    async fn page_window_clamped_before_the_datastore_sees_it() {
        let mock = Arc::new(MockDatastore::new(schema(), vec![], 0));
        call(
            state_with(mock.clone()),
            ViewQuery {
                offset: Some(-5),
                limit: Some(10_000),
                ..ViewQuery::default()
            },
        )
        .await
        .unwrap();

        let searches = mock.searches();
        assert_eq!(searches[0].page.offset, 0);
        assert_eq!(searches[0].page.limit, 500);
    }

    #[tokio::test]
    async fn offset_beyond_total_yields_warning_and_empty_rows() {
        let mock = Arc::new(MockDatastore::new(schema(), vec![], 7));
        let body = call(
            state_with(mock),
            ViewQuery {
                offset: Some(100),
                ..ViewQuery::default()
            },
        )
        .await
        .unwrap();

        assert!(body.records.is_empty());
        assert_eq!(body.total, 7);
        assert_eq!(
            body.warnings,
            vec![ViewWarning::PageOutOfRange {
                offset: 100,
                total: 7
            }]
        );
    }

    #[tokio::test]
    async fn malformed_filters_json_is_a_bad_request() {
        let mock = Arc::new(MockDatastore::new(schema(), vec![], 0));
        let err = call(
            state_with(mock.clone()),
            ViewQuery {
                filters: Some("not json".to_string()),
                ..ViewQuery::default()
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::BadRequest { .. }));
        assert!(mock.searches().is_empty());
    }

    #[tokio::test]
    async fn facets_endpoint_reports_facetable_columns_only() {
        let mock = Arc::new(MockDatastore::new(
            schema(),
            vec![
                json!({"city": "NYC", "price": 1, "id": 1}),
                json!({"city": "NYC", "price": 2, "id": 2}),
                json!({"city": "LA", "price": 3, "id": 3}),
            ],
            3,
        ));
        let (_, Json(body)) = get_view_facets(
            State(state_with(mock)),
            resource(),
            ValidatedQuery(FacetsQuery::default()),
        )
        .await
        .unwrap();

        assert_eq!(body.sample_size, 3);
        assert!(body.facets.contains_key("city"));
        assert!(!body.facets.contains_key("price"));
        assert_eq!(body.facets["city"].values[0].value, "NYC");
        assert_eq!(body.facets["city"].values[0].count, 2);
    }
}
