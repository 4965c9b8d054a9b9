//! Query HTTP Routes
//!
//! Session management, table listing, table slices, structured queries and
//! raw SELECT pass-through. Every route except `/connect` addresses its
//! session through the `x-session-token` header.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ApiError, ApiResult};
use crate::config::DatabaseConfig;
use crate::executor::{ConnectionParams, Connector, MySqlConnector};
use crate::query::{
    GeneratedStatement, PipelineOptions, QueryPipeline, QueryResponse, RowsResponse,
};
use crate::session::{Session, SessionError, SessionRegistry};

/// Header carrying the session token
pub const SESSION_HEADER: &str = "x-session-token";

// ==================
// Shared State
// ==================

/// State shared across query handlers
pub struct QueryState {
    pub sessions: SessionRegistry,
    pub database: DatabaseConfig,
    connector: Arc<dyn Connector>,
}

impl QueryState {
    pub fn new(database: DatabaseConfig) -> Self {
        Self::with_connector(database, MySqlConnector)
    }

    pub fn with_connector(database: DatabaseConfig, connector: impl Connector + 'static) -> Self {
        Self {
            sessions: SessionRegistry::new(),
            database,
            connector: Arc::new(connector),
        }
    }

    fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            validate_identifiers: self.database.validate_identifiers,
            table_row_limit: self.database.table_row_limit,
        }
    }

    fn session(&self, headers: &HeaderMap) -> ApiResult<Session> {
        Ok(self.sessions.resolve(session_token(headers))?)
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DatabaseConfig::default())
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct DisconnectResponse {
    pub disconnected: bool,
}

#[derive(Debug, Deserialize)]
pub struct TableRequest {
    #[serde(default)]
    pub table: String,
}

#[derive(Debug, Deserialize)]
pub struct RunSqlRequest {
    #[serde(default)]
    pub query: String,
}

// ==================
// Query Routes
// ==================

/// Create query routes
pub fn query_routes(state: Arc<QueryState>) -> Router {
    Router::new()
        .route("/connect", post(connect_handler))
        .route("/disconnect", post(disconnect_handler))
        .route("/tables", get(list_tables_handler))
        .route("/table", post(table_handler))
        .route("/query", post(query_handler))
        .route("/run-sql", post(run_sql_handler))
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok())
}

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))
}

fn typed_body<T: DeserializeOwned>(payload: Result<Json<Value>, JsonRejection>) -> ApiResult<T> {
    serde_json::from_value(json_body(payload)?).map_err(|e| ApiError::InvalidBody(e.to_string()))
}

/// Raw pass-through accepts statements that start with SELECT, ignoring case
pub fn is_select_statement(query: &str) -> bool {
    query.trim().to_lowercase().starts_with("select")
}

// ==================
// Session Handlers
// ==================

async fn connect_handler(
    State(state): State<Arc<QueryState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ConnectResponse>> {
    let params: ConnectionParams = typed_body(payload)?;

    let executor = state
        .connector
        .connect(&params, &state.database)
        .await
        .inspect_err(|e| {
            tracing::error!(
                host = %params.host,
                database = %params.database,
                error = %e,
                "connect failed"
            );
        })?;

    let token = state.sessions.open(params.database.clone(), executor);
    tracing::info!(
        host = %params.host,
        database = %params.database,
        sessions = state.sessions.len(),
        "session opened"
    );

    Ok(Json(ConnectResponse { token }))
}

async fn disconnect_handler(
    State(state): State<Arc<QueryState>>,
    headers: HeaderMap,
) -> ApiResult<Json<DisconnectResponse>> {
    let token = session_token(&headers).ok_or(SessionError::MissingToken)?;
    let session = state.sessions.remove(token)?;
    session.executor.close().await;
    tracing::info!(database = %session.database, "session closed");

    Ok(Json(DisconnectResponse { disconnected: true }))
}

// ==================
// Data Handlers
// ==================

async fn list_tables_handler(
    State(state): State<Arc<QueryState>>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<String>>> {
    let session = state.session(&headers)?;
    let tables = session.executor.list_tables().await?;
    Ok(Json(tables))
}

async fn table_handler(
    State(state): State<Arc<QueryState>>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<RowsResponse>> {
    let session = state.session(&headers)?;
    let request: TableRequest = typed_body(payload)?;

    let pipeline = QueryPipeline::new(session.executor.as_ref(), state.pipeline_options());
    let response = pipeline.table_slice(&request.table).await?;
    Ok(Json(response))
}

async fn query_handler(
    State(state): State<Arc<QueryState>>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<QueryResponse>> {
    let session = state.session(&headers)?;
    let payload = json_body(payload)?;

    let pipeline = QueryPipeline::new(session.executor.as_ref(), state.pipeline_options());
    let response = pipeline.run(payload).await?;
    Ok(Json(response))
}

async fn run_sql_handler(
    State(state): State<Arc<QueryState>>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<RowsResponse>> {
    let session = state.session(&headers)?;
    let request: RunSqlRequest = typed_body(payload)?;

    if !is_select_statement(&request.query) {
        tracing::warn!(query = %request.query, "non-SELECT statement rejected");
        return Err(ApiError::NotSelect);
    }

    let statement = GeneratedStatement::new(request.query, Vec::new());
    let rows = session.executor.execute(&statement).await?;
    Ok(Json(RowsResponse::new(rows)))
}
