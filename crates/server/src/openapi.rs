//! OpenAPI document. The schema structs mirror the wire shapes of the
//! service models and exist only for documentation.

use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
pub struct SuccessDoc { pub success: bool }

#[derive(Serialize, ToSchema)]
pub struct ErrorDoc {
    pub error: String,
    pub detail: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct CloudFunctionDoc {
    pub id: u64,
    pub name: String,
    pub runtime: String,
    pub trigger: String,
    pub code: String,
    pub status: String,
    /// RFC 3339
    pub deployed: String,
}

#[derive(Serialize, ToSchema)]
pub struct NewCloudFunctionDoc {
    pub name: String,
    pub runtime: String,
    pub trigger: String,
    pub code: String,
}

#[derive(Serialize, ToSchema)]
pub struct CloudFunctionPatchDoc {
    pub name: Option<String>,
    pub runtime: Option<String>,
    pub trigger: Option<String>,
    pub code: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpointDoc {
    pub id: u64,
    pub path: String,
    pub method: String,
    pub status: String,
    pub requests_per_min: u32,
    pub avg_response_time: u32,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewApiEndpointDoc {
    pub path: String,
    pub method: String,
    pub status: Option<String>,
    pub requests_per_min: Option<u32>,
    pub avg_response_time: Option<u32>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpointPatchDoc {
    pub path: Option<String>,
    pub method: Option<String>,
    pub status: Option<String>,
    pub requests_per_min: Option<u32>,
    pub avg_response_time: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct EndpointTestRequestDoc {
    pub method: Option<String>,
    pub url: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub headers: Option<serde_json::Value>,
    #[schema(value_type = Option<Object>)]
    pub body: Option<serde_json::Value>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EndpointTestResultDoc {
    pub status: u16,
    /// Milliseconds, in [100, 600)
    pub response_time: u32,
    #[schema(value_type = Object)]
    pub response: serde_json::Value,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FirestoreCollectionDoc {
    pub id: u64,
    pub name: String,
    pub document_count: u64,
}

#[derive(Serialize, ToSchema)]
pub struct NewFirestoreCollectionDoc { pub name: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FirestoreDocumentDoc {
    pub id: u64,
    pub collection_id: u64,
    pub document_id: String,
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewFirestoreDocumentDoc {
    /// Generated when absent
    pub document_id: Option<String>,
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FirestoreDocumentPatchDoc {
    pub document_id: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequestDoc {
    /// Number or numeric string; any other value matches no collection.
    #[schema(value_type = Option<Object>, example = 1)]
    pub collection_id: Option<serde_json::Value>,
    pub field: Option<String>,
    pub operator: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub value: Option<serde_json::Value>,
}

#[derive(Serialize, ToSchema)]
pub struct QueryResultDoc {
    pub results: Vec<FirestoreDocumentDoc>,
    pub count: u64,
}

#[derive(Serialize, ToSchema)]
pub struct LogEntryDoc {
    pub id: u64,
    pub service: String,
    /// ERROR | WARNING | INFO | DEBUG
    pub level: String,
    pub message: String,
    pub timestamp: String,
}

#[derive(Serialize, ToSchema)]
pub struct NewLogEntryDoc {
    pub service: String,
    pub level: String,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IamUserDoc {
    pub id: u64,
    pub email: String,
    pub role: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Serialize, ToSchema)]
pub struct NewIamUserDoc {
    pub email: String,
    pub role: String,
}

#[derive(Serialize, ToSchema)]
pub struct IamUserPatchDoc {
    pub email: Option<String>,
    pub role: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccountDoc {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub roles: Vec<String>,
    pub created_at: String,
}

#[derive(Serialize, ToSchema)]
pub struct NewServiceAccountDoc {
    pub name: String,
    pub email: String,
    pub roles: Option<Vec<String>>,
}

#[derive(Serialize, ToSchema)]
pub struct ServiceAccountPatchDoc {
    pub name: Option<String>,
    pub email: Option<String>,
    pub roles: Option<Vec<String>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::functions::list,
        crate::routes::functions::deploy,
        crate::routes::functions::get,
        crate::routes::functions::update,
        crate::routes::functions::delete,
        crate::routes::endpoints::list,
        crate::routes::endpoints::register,
        crate::routes::endpoints::update,
        crate::routes::endpoints::delete,
        crate::routes::endpoints::test,
        crate::routes::firestore::list_collections,
        crate::routes::firestore::create_collection,
        crate::routes::firestore::delete_collection,
        crate::routes::firestore::list_documents,
        crate::routes::firestore::create_document,
        crate::routes::firestore::update_document,
        crate::routes::firestore::delete_document,
        crate::routes::firestore::query,
        crate::routes::logs::list,
        crate::routes::logs::write,
        crate::routes::iam::list_users,
        crate::routes::iam::add_user,
        crate::routes::iam::update_user,
        crate::routes::iam::remove_user,
        crate::routes::iam::list_service_accounts,
        crate::routes::iam::create_service_account,
        crate::routes::iam::update_service_account,
        crate::routes::iam::remove_service_account,
        crate::routes::iam::update_security_policies,
    ),
    components(
        schemas(
            HealthResponse,
            SuccessDoc,
            ErrorDoc,
            CloudFunctionDoc,
            NewCloudFunctionDoc,
            CloudFunctionPatchDoc,
            ApiEndpointDoc,
            NewApiEndpointDoc,
            ApiEndpointPatchDoc,
            EndpointTestRequestDoc,
            EndpointTestResultDoc,
            FirestoreCollectionDoc,
            NewFirestoreCollectionDoc,
            FirestoreDocumentDoc,
            NewFirestoreDocumentDoc,
            FirestoreDocumentPatchDoc,
            QueryRequestDoc,
            QueryResultDoc,
            LogEntryDoc,
            NewLogEntryDoc,
            IamUserDoc,
            NewIamUserDoc,
            IamUserPatchDoc,
            ServiceAccountDoc,
            NewServiceAccountDoc,
            ServiceAccountPatchDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "functions"),
        (name = "endpoints"),
        (name = "firestore"),
        (name = "logs"),
        (name = "iam")
    )
)]
pub struct ApiDoc;
