use axum::{extract::State, Json};
use common::types::Success;
use service::models::{
    IamUser, IamUserPatch, NewIamUser, NewServiceAccount, ServiceAccount, ServiceAccountPatch,
};

use crate::errors::JsonApiError;
use crate::extract::{body, record_id, IdPath, JsonBody};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/iam/users", tag = "iam",
    responses(
        (status = 200, description = "Project members", body = [crate::openapi::IamUserDoc])
    ))]
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<IamUser>> {
    Json(state.console.list_iam_users().await)
}

#[utoipa::path(post, path = "/api/iam/users", tag = "iam",
    request_body = crate::openapi::NewIamUserDoc,
    responses(
        (status = 200, description = "Added", body = crate::openapi::IamUserDoc),
        (
            status = 400,
            description = "Invalid body or duplicate email",
            body = crate::openapi::ErrorDoc
        )
    ))]
pub async fn add_user(
    State(state): State<AppState>,
    payload: JsonBody<NewIamUser>,
) -> Result<Json<IamUser>, JsonApiError> {
    let input = body(payload)?;
    Ok(Json(state.console.add_iam_user(input).await?))
}

#[utoipa::path(put, path = "/api/iam/users/{id}", tag = "iam",
    params(("id" = u64, Path, description = "User id")),
    request_body = crate::openapi::IamUserPatchDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::IamUserDoc),
        (
            status = 400,
            description = "Invalid body or duplicate email",
            body = crate::openapi::ErrorDoc
        ),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    ))]
pub async fn update_user(
    State(state): State<AppState>,
    id: IdPath,
    payload: JsonBody<IamUserPatch>,
) -> Result<Json<IamUser>, JsonApiError> {
    let id = record_id(id)?;
    let patch = body(payload)?;
    Ok(Json(state.console.update_iam_user(id, patch).await?))
}

#[utoipa::path(delete, path = "/api/iam/users/{id}", tag = "iam",
    params(("id" = u64, Path, description = "User id")),
    responses(
        (status = 200, description = "Removed", body = crate::openapi::SuccessDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    ))]
pub async fn remove_user(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<Success>, JsonApiError> {
    let id = record_id(id)?;
    state.console.remove_iam_user(id).await?;
    Ok(Json(Success::ok()))
}

#[utoipa::path(get, path = "/api/iam/service-accounts", tag = "iam",
    responses(
        (status = 200, description = "Service accounts", body = [crate::openapi::ServiceAccountDoc])
    ))]
pub async fn list_service_accounts(State(state): State<AppState>) -> Json<Vec<ServiceAccount>> {
    Json(state.console.list_service_accounts().await)
}

#[utoipa::path(post, path = "/api/iam/service-accounts", tag = "iam",
    request_body = crate::openapi::NewServiceAccountDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::ServiceAccountDoc),
        (
            status = 400,
            description = "Invalid body or duplicate name/email",
            body = crate::openapi::ErrorDoc
        )
    ))]
pub async fn create_service_account(
    State(state): State<AppState>,
    payload: JsonBody<NewServiceAccount>,
) -> Result<Json<ServiceAccount>, JsonApiError> {
    let input = body(payload)?;
    Ok(Json(state.console.create_service_account(input).await?))
}

#[utoipa::path(put, path = "/api/iam/service-accounts/{id}", tag = "iam",
    params(("id" = u64, Path, description = "Service account id")),
    request_body = crate::openapi::ServiceAccountPatchDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ServiceAccountDoc),
        (
            status = 400,
            description = "Invalid body or duplicate name/email",
            body = crate::openapi::ErrorDoc
        ),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    ))]
pub async fn update_service_account(
    State(state): State<AppState>,
    id: IdPath,
    payload: JsonBody<ServiceAccountPatch>,
) -> Result<Json<ServiceAccount>, JsonApiError> {
    let id = record_id(id)?;
    let patch = body(payload)?;
    Ok(Json(state.console.update_service_account(id, patch).await?))
}

#[utoipa::path(delete, path = "/api/iam/service-accounts/{id}", tag = "iam",
    params(("id" = u64, Path, description = "Service account id")),
    responses(
        (status = 200, description = "Removed", body = crate::openapi::SuccessDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    ))]
pub async fn remove_service_account(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<Success>, JsonApiError> {
    let id = record_id(id)?;
    state.console.remove_service_account(id).await?;
    Ok(Json(Success::ok()))
}

/// Body is ignored; only an audit entry is written
#[utoipa::path(post, path = "/api/iam/security-policies", tag = "iam",
    responses((status = 200, description = "Accepted", body = crate::openapi::SuccessDoc)))]
pub async fn update_security_policies(State(state): State<AppState>) -> Json<Success> {
    state.console.update_security_policies().await;
    Json(Success::ok())
}
