use serde::{Deserialize, Serialize};

use super::{optional_text, require_text, RecordId};
use crate::errors::ServiceError;

pub const ENDPOINT_STATUS_HEALTHY: &str = "Healthy";

const VALID_METHODS: [&str; 7] = ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

/// Monitored API endpoint. `status` and the traffic figures are whatever the
/// caller last reported; nothing here derives them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpoint {
    pub id: RecordId,
    pub path: String,
    pub method: String,
    pub status: String,
    pub requests_per_min: u32,
    pub avg_response_time: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewApiEndpoint {
    pub path: String,
    pub method: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub requests_per_min: Option<u32>,
    #[serde(default)]
    pub avg_response_time: Option<u32>,
}

fn validate_method(method: &str) -> Result<(), ServiceError> {
    let method_up = method.to_ascii_uppercase();
    if !VALID_METHODS.contains(&method_up.as_str()) {
        return Err(ServiceError::Validation("invalid HTTP method".into()));
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<(), ServiceError> {
    require_text("path", path)?;
    if !path.starts_with('/') {
        return Err(ServiceError::Validation("path must start with '/'".into()));
    }
    Ok(())
}

impl NewApiEndpoint {
    pub fn validate(&self) -> Result<(), ServiceError> {
        validate_path(&self.path)?;
        validate_method(&self.method)?;
        optional_text("status", self.status.as_ref())?;
        Ok(())
    }

    pub(crate) fn into_record(self, id: RecordId) -> ApiEndpoint {
        ApiEndpoint {
            id,
            path: self.path,
            method: self.method.to_ascii_uppercase(),
            status: self.status.unwrap_or_else(|| ENDPOINT_STATUS_HEALTHY.to_string()),
            requests_per_min: self.requests_per_min.unwrap_or(0),
            avg_response_time: self.avg_response_time.unwrap_or(0),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpointPatch {
    pub path: Option<String>,
    pub method: Option<String>,
    pub status: Option<String>,
    pub requests_per_min: Option<u32>,
    pub avg_response_time: Option<u32>,
}

impl ApiEndpointPatch {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if let Some(p) = &self.path { validate_path(p)?; }
        if let Some(m) = &self.method { validate_method(m)?; }
        optional_text("status", self.status.as_ref())?;
        Ok(())
    }

    pub(crate) fn apply(self, target: &mut ApiEndpoint) {
        if let Some(v) = self.path { target.path = v; }
        if let Some(v) = self.method { target.method = v.to_ascii_uppercase(); }
        if let Some(v) = self.status { target.status = v; }
        if let Some(v) = self.requests_per_min { target.requests_per_min = v; }
        if let Some(v) = self.avg_response_time { target.avg_response_time = v; }
    }
}
