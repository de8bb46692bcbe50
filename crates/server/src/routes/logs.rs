use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use service::models::{LogEntry, LogFilter, NewLogEntry};

use crate::errors::JsonApiError;
use crate::extract::{body, JsonBody};
use crate::state::AppState;

/// Raw query string; `limit` is parsed by hand so a bad value is a 400 with
/// our error body.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogsParams {
    /// Exact service name; `All Services` or absent disables the filter
    pub service: Option<String>,
    /// `ERROR`, `WARNING`, `INFO` or `DEBUG`; `All Levels` or absent disables the filter
    pub level: Option<String>,
    /// Maximum entries returned; 0 means no cap
    pub limit: Option<String>,
}

impl LogsParams {
    fn into_filter(self, default_limit: Option<usize>) -> Result<LogFilter, JsonApiError> {
        let limit = match self.limit.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            Some(raw) => Some(raw.parse::<usize>().map_err(|_| {
                JsonApiError::bad_request(format!(
                    "limit must be a non-negative integer, got '{}'",
                    raw
                ))
            })?),
            None => default_limit,
        };
        Ok(LogFilter { service: self.service, level: self.level, limit })
    }
}

/// Newest first
#[utoipa::path(get, path = "/api/logs", tag = "logs",
    params(LogsParams),
    responses(
        (
            status = 200,
            description = "Matching entries, newest first",
            body = [crate::openapi::LogEntryDoc]
        ),
        (status = 400, description = "Non-numeric limit", body = crate::openapi::ErrorDoc)
    ))]
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<LogsParams>, QueryRejection>,
) -> Result<Json<Vec<LogEntry>>, JsonApiError> {
    let Query(params) = params?;
    let filter = params.into_filter(state.default_log_limit)?;
    Ok(Json(state.console.list_logs(&filter).await))
}

#[utoipa::path(post, path = "/api/logs", tag = "logs",
    request_body = crate::openapi::NewLogEntryDoc,
    responses(
        (status = 200, description = "Stored", body = crate::openapi::LogEntryDoc),
        (status = 400, description = "Invalid body", body = crate::openapi::ErrorDoc)
    ))]
pub async fn write(
    State(state): State<AppState>,
    payload: JsonBody<NewLogEntry>,
) -> Result<Json<LogEntry>, JsonApiError> {
    let input = body(payload)?;
    Ok(Json(state.console.write_log(input).await?))
}
