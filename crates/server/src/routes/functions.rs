use axum::{extract::State, Json};
use common::types::Success;
use service::models::{CloudFunction, CloudFunctionPatch, NewCloudFunction};

use crate::errors::JsonApiError;
use crate::extract::{body, record_id, IdPath, JsonBody};
use crate::state::AppState;

/// List deployed functions
#[utoipa::path(get, path = "/api/functions", tag = "functions",
    responses(
        (
            status = 200,
            description = "All functions in id order",
            body = [crate::openapi::CloudFunctionDoc]
        )
    ))]
pub async fn list(State(state): State<AppState>) -> Json<Vec<CloudFunction>> {
    Json(state.console.list_functions().await)
}

/// Deploy a function
#[utoipa::path(post, path = "/api/functions", tag = "functions",
    request_body = crate::openapi::NewCloudFunctionDoc,
    responses(
        (status = 200, description = "Deployed", body = crate::openapi::CloudFunctionDoc),
        (
            status = 400,
            description = "Invalid body or duplicate name",
            body = crate::openapi::ErrorDoc
        )
    ))]
pub async fn deploy(
    State(state): State<AppState>,
    payload: JsonBody<NewCloudFunction>,
) -> Result<Json<CloudFunction>, JsonApiError> {
    let input = body(payload)?;
    Ok(Json(state.console.deploy_function(input).await?))
}

#[utoipa::path(get, path = "/api/functions/{id}", tag = "functions",
    params(("id" = u64, Path, description = "Function id")),
    responses(
        (status = 200, description = "Found", body = crate::openapi::CloudFunctionDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    ))]
pub async fn get(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<CloudFunction>, JsonApiError> {
    let id = record_id(id)?;
    Ok(Json(state.console.get_function(id).await?))
}

#[utoipa::path(put, path = "/api/functions/{id}", tag = "functions",
    params(("id" = u64, Path, description = "Function id")),
    request_body = crate::openapi::CloudFunctionPatchDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::CloudFunctionDoc),
        (status = 400, description = "Invalid body", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    ))]
pub async fn update(
    State(state): State<AppState>,
    id: IdPath,
    payload: JsonBody<CloudFunctionPatch>,
) -> Result<Json<CloudFunction>, JsonApiError> {
    let id = record_id(id)?;
    let patch = body(payload)?;
    Ok(Json(state.console.update_function(id, patch).await?))
}

#[utoipa::path(delete, path = "/api/functions/{id}", tag = "functions",
    params(("id" = u64, Path, description = "Function id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::SuccessDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    ))]
pub async fn delete(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<Success>, JsonApiError> {
    let id = record_id(id)?;
    state.console.delete_function(id).await?;
    Ok(Json(Success::ok()))
}
