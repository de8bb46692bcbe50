//! Firestore query stub. The predicate is echoed into the activity log but
//! never evaluated: the result is the first few documents of the collection
//! plus the collection's real size.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::{FirestoreDocument, RecordId};

/// Documents returned by a query regardless of the predicate.
pub const QUERY_PREVIEW_LIMIT: usize = 3;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryRequest {
    /// Number or numeric string; anything else selects no collection.
    #[serde(deserialize_with = "lenient_record_id")]
    pub collection_id: Option<RecordId>,
    pub field: Option<String>,
    pub operator: Option<String>,
    pub value: Option<Value>,
}

fn lenient_record_id<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

impl QueryRequest {
    /// `field operator value` as typed by the user, for the activity log.
    pub fn describe(&self) -> String {
        let value = match &self.value {
            Some(Value::String(s)) => s.clone(),
            Some(v) => v.to_string(),
            None => String::new(),
        };
        format!(
            "{} {} {}",
            self.field.as_deref().unwrap_or_default(),
            self.operator.as_deref().unwrap_or_default(),
            value
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QueryResult {
    pub results: Vec<FirestoreDocument>,
    pub count: usize,
}

impl QueryResult {
    /// `count` is the size of `documents`, `results` its first
    /// `QUERY_PREVIEW_LIMIT` entries.
    pub fn preview(mut documents: Vec<FirestoreDocument>) -> Self {
        let count = documents.len();
        documents.truncate(QUERY_PREVIEW_LIMIT);
        Self { results: documents, count }
    }
}
