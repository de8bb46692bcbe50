use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{optional_text, require_text, RecordId};
use crate::errors::ServiceError;

/// Collection header. `document_count` is maintained by the store on
/// document create/delete and cannot be set through any input type.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FirestoreCollection {
    pub id: RecordId,
    pub name: String,
    pub document_count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewFirestoreCollection {
    pub name: String,
}

impl NewFirestoreCollection {
    pub fn validate(&self) -> Result<(), ServiceError> {
        require_text("name", &self.name)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FirestoreDocument {
    pub id: RecordId,
    pub collection_id: RecordId,
    pub document_id: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/collections/{id}/documents`; the parent id comes from
/// the path.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewFirestoreDocument {
    #[serde(default)]
    pub document_id: Option<String>,
    pub data: Value,
}

impl NewFirestoreDocument {
    pub fn validate(&self) -> Result<(), ServiceError> {
        optional_text("documentId", self.document_id.as_ref())?;
        if self.data.is_null() {
            return Err(ServiceError::required("data"));
        }
        Ok(())
    }
}

/// Partial document update. The parent collection is fixed at creation so
/// the per-collection counters stay exact.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FirestoreDocumentPatch {
    pub document_id: Option<String>,
    pub data: Option<Value>,
}

impl FirestoreDocumentPatch {
    pub fn validate(&self) -> Result<(), ServiceError> {
        optional_text("documentId", self.document_id.as_ref())
    }

    pub(crate) fn apply(self, target: &mut FirestoreDocument, now: DateTime<Utc>) {
        if let Some(v) = self.document_id { target.document_id = v; }
        if let Some(v) = self.data { target.data = v; }
        target.updated_at = now;
    }
}
