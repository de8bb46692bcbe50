use axum::{extract::State, Json};
use common::types::Success;
use service::models::{ApiEndpoint, ApiEndpointPatch, NewApiEndpoint};
use service::simulation::{EndpointTestRequest, EndpointTestResult};

use crate::errors::JsonApiError;
use crate::extract::{body, record_id, IdPath, JsonBody};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/endpoints", tag = "endpoints",
    responses(
        (
            status = 200,
            description = "Registered endpoints",
            body = [crate::openapi::ApiEndpointDoc]
        )
    ))]
pub async fn list(State(state): State<AppState>) -> Json<Vec<ApiEndpoint>> {
    Json(state.console.list_endpoints().await)
}

#[utoipa::path(post, path = "/api/endpoints", tag = "endpoints",
    request_body = crate::openapi::NewApiEndpointDoc,
    responses(
        (status = 200, description = "Registered", body = crate::openapi::ApiEndpointDoc),
        (status = 400, description = "Invalid body", body = crate::openapi::ErrorDoc)
    ))]
pub async fn register(
    State(state): State<AppState>,
    payload: JsonBody<NewApiEndpoint>,
) -> Result<Json<ApiEndpoint>, JsonApiError> {
    let input = body(payload)?;
    Ok(Json(state.console.register_endpoint(input).await?))
}

#[utoipa::path(put, path = "/api/endpoints/{id}", tag = "endpoints",
    params(("id" = u64, Path, description = "Endpoint id")),
    request_body = crate::openapi::ApiEndpointPatchDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ApiEndpointDoc),
        (status = 400, description = "Invalid body", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    ))]
pub async fn update(
    State(state): State<AppState>,
    id: IdPath,
    payload: JsonBody<ApiEndpointPatch>,
) -> Result<Json<ApiEndpoint>, JsonApiError> {
    let id = record_id(id)?;
    let patch = body(payload)?;
    Ok(Json(state.console.update_endpoint(id, patch).await?))
}

#[utoipa::path(delete, path = "/api/endpoints/{id}", tag = "endpoints",
    params(("id" = u64, Path, description = "Endpoint id")),
    responses(
        (status = 200, description = "Removed", body = crate::openapi::SuccessDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    ))]
pub async fn delete(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<Success>, JsonApiError> {
    let id = record_id(id)?;
    state.console.delete_endpoint(id).await?;
    Ok(Json(Success::ok()))
}

/// Simulated call; the response time is random in [100, 600) ms
#[utoipa::path(post, path = "/api/endpoints/test", tag = "endpoints",
    request_body = crate::openapi::EndpointTestRequestDoc,
    responses(
        (
            status = 200,
            description = "Simulated response",
            body = crate::openapi::EndpointTestResultDoc
        ),
        (status = 400, description = "Malformed JSON", body = crate::openapi::ErrorDoc)
    ))]
pub async fn test(
    State(state): State<AppState>,
    payload: JsonBody<EndpointTestRequest>,
) -> Result<Json<EndpointTestResult>, JsonApiError> {
    let request = body(payload)?;
    Ok(Json(state.console.test_endpoint(request).await))
}
