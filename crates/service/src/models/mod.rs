//! Records held by the console store and the request shapes that create or
//! patch them.
//!
//! Inputs are deserialized straight from request bodies: a missing required
//! field or a wrong JSON type fails at deserialization, `validate()` covers
//! what serde cannot (blank strings, email shape, HTTP method names).

pub mod endpoints;
pub mod firestore;
pub mod functions;
pub mod iam;
pub mod logs;

pub use endpoints::{ApiEndpoint, ApiEndpointPatch, NewApiEndpoint};
pub use firestore::{
    FirestoreCollection, FirestoreDocument, FirestoreDocumentPatch, NewFirestoreCollection,
    NewFirestoreDocument,
};
pub use functions::{CloudFunction, CloudFunctionPatch, NewCloudFunction};
pub use iam::{
    IamUser, IamUserPatch, NewIamUser, NewServiceAccount, ServiceAccount, ServiceAccountPatch,
};
pub use logs::{LogEntry, LogFilter, LogLevel, NewLogEntry};

use crate::errors::ServiceError;

/// Identifier assigned by the store; per collection, starts at 1, never reused.
pub type RecordId = u64;

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::required(field));
    }
    Ok(())
}

pub(crate) fn require_email(field: &str, value: &str) -> Result<(), ServiceError> {
    require_text(field, value)?;
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ServiceError::Validation(format!("{} must be an email address", field))),
    }
}

pub(crate) fn optional_text(field: &str, value: Option<&String>) -> Result<(), ServiceError> {
    match value {
        Some(v) => require_text(field, v),
        None => Ok(()),
    }
}
