//! Extractor results unwrapped into `JsonApiError`s, so axum's own rejection
//! bodies (and its 422 for missing fields) never reach the client.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::Json;
use service::models::RecordId;

use crate::errors::JsonApiError;

pub type JsonBody<T> = Result<Json<T>, JsonRejection>;
pub type IdPath = Result<Path<RecordId>, PathRejection>;

pub fn body<T>(payload: JsonBody<T>) -> Result<T, JsonApiError> {
    payload.map(|Json(v)| v).map_err(JsonApiError::from)
}

pub fn record_id(path: IdPath) -> Result<RecordId, JsonApiError> {
    path.map(|Path(id)| id).map_err(JsonApiError::from)
}
