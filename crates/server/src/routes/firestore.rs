use axum::{extract::State, Json};
use common::types::Success;
use service::models::{
    FirestoreCollection, FirestoreDocument, FirestoreDocumentPatch, NewFirestoreCollection,
    NewFirestoreDocument,
};
use service::query::{QueryRequest, QueryResult};

use crate::errors::JsonApiError;
use crate::extract::{body, record_id, IdPath, JsonBody};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/collections", tag = "firestore",
    responses(
        (
            status = 200,
            description = "Collections with live document counts",
            body = [crate::openapi::FirestoreCollectionDoc]
        )
    ))]
pub async fn list_collections(State(state): State<AppState>) -> Json<Vec<FirestoreCollection>> {
    Json(state.console.list_collections().await)
}

#[utoipa::path(post, path = "/api/collections", tag = "firestore",
    request_body = crate::openapi::NewFirestoreCollectionDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::FirestoreCollectionDoc),
        (
            status = 400,
            description = "Invalid body or duplicate name",
            body = crate::openapi::ErrorDoc
        )
    ))]
pub async fn create_collection(
    State(state): State<AppState>,
    payload: JsonBody<NewFirestoreCollection>,
) -> Result<Json<FirestoreCollection>, JsonApiError> {
    let input = body(payload)?;
    Ok(Json(state.console.create_collection(input).await?))
}

/// Documents of the collection are left in place
#[utoipa::path(delete, path = "/api/collections/{id}", tag = "firestore",
    params(("id" = u64, Path, description = "Collection id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::SuccessDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    ))]
pub async fn delete_collection(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<Success>, JsonApiError> {
    let id = record_id(id)?;
    state.console.delete_collection(id).await?;
    Ok(Json(Success::ok()))
}

#[utoipa::path(get, path = "/api/collections/{id}/documents", tag = "firestore",
    params(("id" = u64, Path, description = "Collection id")),
    responses(
        (
            status = 200,
            description = "Documents of the collection",
            body = [crate::openapi::FirestoreDocumentDoc]
        )
    ))]
pub async fn list_documents(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<Vec<FirestoreDocument>>, JsonApiError> {
    let id = record_id(id)?;
    Ok(Json(state.console.list_documents(id).await))
}

#[utoipa::path(post, path = "/api/collections/{id}/documents", tag = "firestore",
    params(("id" = u64, Path, description = "Collection id")),
    request_body = crate::openapi::NewFirestoreDocumentDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::FirestoreDocumentDoc),
        (
            status = 400,
            description = "Invalid body or unknown collection",
            body = crate::openapi::ErrorDoc
        )
    ))]
pub async fn create_document(
    State(state): State<AppState>,
    id: IdPath,
    payload: JsonBody<NewFirestoreDocument>,
) -> Result<Json<FirestoreDocument>, JsonApiError> {
    let collection_id = record_id(id)?;
    let input = body(payload)?;
    Ok(Json(state.console.create_document(collection_id, input).await?))
}

#[utoipa::path(put, path = "/api/documents/{id}", tag = "firestore",
    params(("id" = u64, Path, description = "Document id")),
    request_body = crate::openapi::FirestoreDocumentPatchDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::FirestoreDocumentDoc),
        (status = 400, description = "Invalid body", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    ))]
pub async fn update_document(
    State(state): State<AppState>,
    id: IdPath,
    payload: JsonBody<FirestoreDocumentPatch>,
) -> Result<Json<FirestoreDocument>, JsonApiError> {
    let id = record_id(id)?;
    let patch = body(payload)?;
    Ok(Json(state.console.update_document(id, patch).await?))
}

#[utoipa::path(delete, path = "/api/documents/{id}", tag = "firestore",
    params(("id" = u64, Path, description = "Document id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::SuccessDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    ))]
pub async fn delete_document(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<Success>, JsonApiError> {
    let id = record_id(id)?;
    state.console.delete_document(id).await?;
    Ok(Json(Success::ok()))
}

/// The predicate is not evaluated: first three documents, full count
#[utoipa::path(post, path = "/api/query", tag = "firestore",
    request_body = crate::openapi::QueryRequestDoc,
    responses(
        (status = 200, description = "Query preview", body = crate::openapi::QueryResultDoc),
        (status = 400, description = "Malformed JSON", body = crate::openapi::ErrorDoc)
    ))]
pub async fn query(
    State(state): State<AppState>,
    payload: JsonBody<QueryRequest>,
) -> Result<Json<QueryResult>, JsonApiError> {
    let request = body(payload)?;
    Ok(Json(state.console.run_query(request).await))
}
