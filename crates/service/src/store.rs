//! In-memory console store.
//!
//! Every collection sits in one `Collections` value behind one
//! `tokio::sync::RwLock`. Each mutating method takes the write lock exactly
//! once, so id assignment plus insert, uniqueness check plus insert, and a
//! document create/delete plus its parent counter change are indivisible.
//! Nothing is persisted; a new store starts empty.

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::errors::{ServiceError, ServiceResult};
use crate::models::functions::FUNCTION_STATUS_ACTIVE;
use crate::models::iam::IAM_STATUS_ACTIVE;
use crate::models::{
    ApiEndpoint, ApiEndpointPatch, CloudFunction, CloudFunctionPatch, FirestoreCollection,
    FirestoreDocument, FirestoreDocumentPatch, IamUser, IamUserPatch, LogEntry, LogFilter,
    NewApiEndpoint, NewCloudFunction, NewFirestoreCollection, NewFirestoreDocument, NewIamUser,
    NewLogEntry, NewServiceAccount, RecordId, ServiceAccount, ServiceAccountPatch,
};
use crate::storage::{Collection, MonotonicClock};

#[derive(Debug, Default)]
struct Collections {
    clock: MonotonicClock,
    functions: Collection<CloudFunction>,
    endpoints: Collection<ApiEndpoint>,
    firestore_collections: Collection<FirestoreCollection>,
    documents: Collection<FirestoreDocument>,
    logs: Collection<LogEntry>,
    iam_users: Collection<IamUser>,
    service_accounts: Collection<ServiceAccount>,
}

impl Collections {
    fn now(&mut self) -> DateTime<Utc> {
        self.clock.now()
    }
}

#[derive(Debug, Default)]
pub struct ConsoleStore {
    inner: RwLock<Collections>,
}

impl ConsoleStore {
    pub fn new() -> Self { Self::default() }

    // ---- cloud functions ----

    pub async fn list_functions(&self) -> Vec<CloudFunction> {
        self.inner.read().await.functions.list()
    }

    pub async fn get_function(&self, id: RecordId) -> Option<CloudFunction> {
        self.inner.read().await.functions.get(id).cloned()
    }

    pub async fn create_function(&self, input: NewCloudFunction) -> ServiceResult<CloudFunction> {
        let mut c = self.inner.write().await;
        if c.functions.find_other(None, |f| f.name == input.name).is_some() {
            return Err(ServiceError::duplicate("function", "name", &input.name));
        }
        let deployed = c.now();
        let created = c.functions.insert_with(|id| CloudFunction {
            id,
            name: input.name,
            runtime: input.runtime,
            trigger: input.trigger,
            code: input.code,
            status: FUNCTION_STATUS_ACTIVE.to_string(),
            deployed,
        });
        debug!(id = created.id, name = %created.name, "function stored");
        Ok(created)
    }

    pub async fn update_function(
        &self,
        id: RecordId,
        patch: CloudFunctionPatch,
    ) -> ServiceResult<CloudFunction> {
        let mut c = self.inner.write().await;
        if c.functions.get(id).is_none() {
            return Err(ServiceError::not_found("function"));
        }
        if let Some(name) = &patch.name {
            if c.functions.find_other(Some(id), |f| &f.name == name).is_some() {
                return Err(ServiceError::duplicate("function", "name", name));
            }
        }
        let target = c.functions.get_mut(id).ok_or_else(|| ServiceError::not_found("function"))?;
        patch.apply(target);
        Ok(target.clone())
    }

    pub async fn delete_function(&self, id: RecordId) -> bool {
        self.inner.write().await.functions.remove(id).is_some()
    }

    // ---- api endpoints ----

    pub async fn list_endpoints(&self) -> Vec<ApiEndpoint> {
        self.inner.read().await.endpoints.list()
    }

    pub async fn get_endpoint(&self, id: RecordId) -> Option<ApiEndpoint> {
        self.inner.read().await.endpoints.get(id).cloned()
    }

    pub async fn create_endpoint(&self, input: NewApiEndpoint) -> ApiEndpoint {
        self.inner.write().await.endpoints.insert_with(|id| input.into_record(id))
    }

    pub async fn update_endpoint(
        &self,
        id: RecordId,
        patch: ApiEndpointPatch,
    ) -> ServiceResult<ApiEndpoint> {
        let mut c = self.inner.write().await;
        let target = c.endpoints.get_mut(id).ok_or_else(|| ServiceError::not_found("endpoint"))?;
        patch.apply(target);
        Ok(target.clone())
    }

    pub async fn delete_endpoint(&self, id: RecordId) -> bool {
        self.inner.write().await.endpoints.remove(id).is_some()
    }

    // ---- firestore collections ----

    pub async fn list_collections(&self) -> Vec<FirestoreCollection> {
        self.inner.read().await.firestore_collections.list()
    }

    pub async fn get_collection(&self, id: RecordId) -> Option<FirestoreCollection> {
        self.inner.read().await.firestore_collections.get(id).cloned()
    }

    pub async fn create_collection(
        &self,
        input: NewFirestoreCollection,
    ) -> ServiceResult<FirestoreCollection> {
        let mut c = self.inner.write().await;
        if c.firestore_collections.find_other(None, |col| col.name == input.name).is_some() {
            return Err(ServiceError::duplicate("collection", "name", &input.name));
        }
        Ok(c.firestore_collections.insert_with(|id| FirestoreCollection {
            id,
            name: input.name,
            document_count: 0,
        }))
    }

    /// Removes the collection header only. Its documents stay behind with a
    /// dangling `collection_id`.
    pub async fn delete_collection(&self, id: RecordId) -> bool {
        self.inner.write().await.firestore_collections.remove(id).is_some()
    }

    // ---- firestore documents ----

    pub async fn list_documents(&self, collection_id: RecordId) -> Vec<FirestoreDocument> {
        self.inner
            .read()
            .await
            .documents
            .iter()
            .filter(|d| d.collection_id == collection_id)
            .cloned()
            .collect()
    }

    pub async fn get_document(&self, id: RecordId) -> Option<FirestoreDocument> {
        self.inner.read().await.documents.get(id).cloned()
    }

    /// Stores the document and bumps the parent's `document_count` under the
    /// same write lock. The parent must exist.
    pub async fn create_document(
        &self,
        collection_id: RecordId,
        input: NewFirestoreDocument,
    ) -> ServiceResult<FirestoreDocument> {
        let mut c = self.inner.write().await;
        if c.firestore_collections.get(collection_id).is_none() {
            return Err(ServiceError::Validation(format!(
                "collection {} does not exist",
                collection_id
            )));
        }
        let now = c.now();
        let document_id = input.document_id.unwrap_or_else(|| Uuid::new_v4().simple().to_string());
        let created = c.documents.insert_with(|id| FirestoreDocument {
            id,
            collection_id,
            document_id,
            data: input.data,
            created_at: now,
            updated_at: now,
        });
        if let Some(parent) = c.firestore_collections.get_mut(collection_id) {
            parent.document_count += 1;
        }
        Ok(created)
    }

    pub async fn update_document(
        &self,
        id: RecordId,
        patch: FirestoreDocumentPatch,
    ) -> ServiceResult<FirestoreDocument> {
        let mut c = self.inner.write().await;
        if c.documents.get(id).is_none() {
            return Err(ServiceError::not_found("document"));
        }
        let now = c.now();
        let target = c.documents.get_mut(id).ok_or_else(|| ServiceError::not_found("document"))?;
        patch.apply(target, now);
        Ok(target.clone())
    }

    /// Removes the document and decrements its parent's counter, floored at
    /// zero. Returns the removed document so callers can report its parent.
    pub async fn delete_document(&self, id: RecordId) -> Option<FirestoreDocument> {
        let mut c = self.inner.write().await;
        let removed = c.documents.remove(id)?;
        if let Some(parent) = c.firestore_collections.get_mut(removed.collection_id) {
            parent.document_count = parent.document_count.saturating_sub(1);
        }
        Some(removed)
    }

    // ---- logs ----

    pub async fn list_logs(&self, filter: &LogFilter) -> Vec<LogEntry> {
        filter.apply(self.inner.read().await.logs.iter())
    }

    pub async fn create_log(&self, input: NewLogEntry) -> LogEntry {
        let mut c = self.inner.write().await;
        let timestamp = c.now();
        c.logs.insert_with(|id| LogEntry {
            id,
            service: input.service,
            level: input.level,
            message: input.message,
            timestamp,
        })
    }

    // ---- iam users ----

    pub async fn list_iam_users(&self) -> Vec<IamUser> {
        self.inner.read().await.iam_users.list()
    }

    pub async fn get_iam_user(&self, id: RecordId) -> Option<IamUser> {
        self.inner.read().await.iam_users.get(id).cloned()
    }

    pub async fn create_iam_user(&self, input: NewIamUser) -> ServiceResult<IamUser> {
        let mut c = self.inner.write().await;
        if c.iam_users.find_other(None, |u| u.email == input.email).is_some() {
            return Err(ServiceError::duplicate("user", "email", &input.email));
        }
        let created_at = c.now();
        Ok(c.iam_users.insert_with(|id| IamUser {
            id,
            email: input.email,
            role: input.role,
            status: IAM_STATUS_ACTIVE.to_string(),
            created_at,
        }))
    }

    pub async fn update_iam_user(
        &self,
        id: RecordId,
        patch: IamUserPatch,
    ) -> ServiceResult<IamUser> {
        let mut c = self.inner.write().await;
        if c.iam_users.get(id).is_none() {
            return Err(ServiceError::not_found("user"));
        }
        if let Some(email) = &patch.email {
            if c.iam_users.find_other(Some(id), |u| &u.email == email).is_some() {
                return Err(ServiceError::duplicate("user", "email", email));
            }
        }
        let target = c.iam_users.get_mut(id).ok_or_else(|| ServiceError::not_found("user"))?;
        patch.apply(target);
        Ok(target.clone())
    }

    pub async fn delete_iam_user(&self, id: RecordId) -> bool {
        self.inner.write().await.iam_users.remove(id).is_some()
    }

    // ---- service accounts ----

    pub async fn list_service_accounts(&self) -> Vec<ServiceAccount> {
        self.inner.read().await.service_accounts.list()
    }

    pub async fn get_service_account(&self, id: RecordId) -> Option<ServiceAccount> {
        self.inner.read().await.service_accounts.get(id).cloned()
    }

    pub async fn create_service_account(
        &self,
        input: NewServiceAccount,
    ) -> ServiceResult<ServiceAccount> {
        let mut c = self.inner.write().await;
        check_service_account_unique(
            &c.service_accounts,
            None,
            Some(&input.name),
            Some(&input.email),
        )?;
        let created_at = c.now();
        Ok(c.service_accounts.insert_with(|id| ServiceAccount {
            id,
            name: input.name,
            email: input.email,
            roles: input.roles,
            created_at,
        }))
    }

    pub async fn update_service_account(
        &self,
        id: RecordId,
        patch: ServiceAccountPatch,
    ) -> ServiceResult<ServiceAccount> {
        let mut c = self.inner.write().await;
        if c.service_accounts.get(id).is_none() {
            return Err(ServiceError::not_found("service account"));
        }
        check_service_account_unique(
            &c.service_accounts,
            Some(id),
            patch.name.as_ref(),
            patch.email.as_ref(),
        )?;
        let target = c
            .service_accounts
            .get_mut(id)
            .ok_or_else(|| ServiceError::not_found("service account"))?;
        patch.apply(target);
        Ok(target.clone())
    }

    pub async fn delete_service_account(&self, id: RecordId) -> bool {
        self.inner.write().await.service_accounts.remove(id).is_some()
    }
}

fn check_service_account_unique(
    accounts: &Collection<ServiceAccount>,
    except: Option<RecordId>,
    name: Option<&String>,
    email: Option<&String>,
) -> ServiceResult<()> {
    if let Some(name) = name {
        if accounts.find_other(except, |a| &a.name == name).is_some() {
            return Err(ServiceError::duplicate("service account", "name", name));
        }
    }
    if let Some(email) = email {
        if accounts.find_other(except, |a| &a.email == email).is_some() {
            return Err(ServiceError::duplicate("service account", "email", email));
        }
    }
    Ok(())
}
