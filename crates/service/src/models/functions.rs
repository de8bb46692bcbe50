use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{optional_text, require_text, RecordId};
use crate::errors::ServiceError;

pub const FUNCTION_STATUS_ACTIVE: &str = "Active";

/// Deployed function as shown in the functions table.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CloudFunction {
    pub id: RecordId,
    pub name: String,
    pub runtime: String,
    pub trigger: String,
    pub code: String,
    pub status: String,
    pub deployed: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewCloudFunction {
    pub name: String,
    pub runtime: String,
    pub trigger: String,
    pub code: String,
}

impl NewCloudFunction {
    pub fn validate(&self) -> Result<(), ServiceError> {
        require_text("name", &self.name)?;
        require_text("runtime", &self.runtime)?;
        require_text("trigger", &self.trigger)?;
        require_text("code", &self.code)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CloudFunctionPatch {
    pub name: Option<String>,
    pub runtime: Option<String>,
    pub trigger: Option<String>,
    pub code: Option<String>,
}

impl CloudFunctionPatch {
    pub fn validate(&self) -> Result<(), ServiceError> {
        optional_text("name", self.name.as_ref())?;
        optional_text("runtime", self.runtime.as_ref())?;
        optional_text("trigger", self.trigger.as_ref())?;
        optional_text("code", self.code.as_ref())?;
        Ok(())
    }

    pub(crate) fn apply(self, target: &mut CloudFunction) {
        if let Some(v) = self.name { target.name = v; }
        if let Some(v) = self.runtime { target.runtime = v; }
        if let Some(v) = self.trigger { target.trigger = v; }
        if let Some(v) = self.code { target.code = v; }
    }
}
