use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{optional_text, require_email, require_text, RecordId};
use crate::errors::ServiceError;

pub const IAM_STATUS_ACTIVE: &str = "Active";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IamUser {
    pub id: RecordId,
    pub email: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewIamUser {
    pub email: String,
    pub role: String,
}

impl NewIamUser {
    pub fn validate(&self) -> Result<(), ServiceError> {
        require_email("email", &self.email)?;
        require_text("role", &self.role)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct IamUserPatch {
    pub email: Option<String>,
    pub role: Option<String>,
}

impl IamUserPatch {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if let Some(email) = &self.email { require_email("email", email)?; }
        optional_text("role", self.role.as_ref())?;
        Ok(())
    }

    pub(crate) fn apply(self, target: &mut IamUser) {
        if let Some(v) = self.email { target.email = v; }
        if let Some(v) = self.role { target.role = v; }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccount {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewServiceAccount {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

fn validate_roles(roles: &[String]) -> Result<(), ServiceError> {
    if roles.iter().any(|r| r.trim().is_empty()) {
        return Err(ServiceError::Validation("roles must not contain blank entries".into()));
    }
    Ok(())
}

impl NewServiceAccount {
    pub fn validate(&self) -> Result<(), ServiceError> {
        require_text("name", &self.name)?;
        require_email("email", &self.email)?;
        validate_roles(&self.roles)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ServiceAccountPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub roles: Option<Vec<String>>,
}

impl ServiceAccountPatch {
    pub fn validate(&self) -> Result<(), ServiceError> {
        optional_text("name", self.name.as_ref())?;
        if let Some(email) = &self.email { require_email("email", email)?; }
        if let Some(roles) = &self.roles { validate_roles(roles)?; }
        Ok(())
    }

    pub(crate) fn apply(self, target: &mut ServiceAccount) {
        if let Some(v) = self.name { target.name = v; }
        if let Some(v) = self.email { target.email = v; }
        if let Some(v) = self.roles { target.roles = v; }
    }
}
