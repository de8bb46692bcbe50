//! Console operations as seen by the HTTP layer.
//!
//! Each mutating call validates its input, commits through the store, then
//! hands a `MutationEvent` to the hook dispatcher. Nothing is dispatched when
//! validation or the store rejects the call.

use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::{ServiceError, ServiceResult};
use crate::hooks::{HookDispatcher, MutationEvent, PostCommitHook};
use crate::metrics;
use crate::models::{
    ApiEndpoint, ApiEndpointPatch, CloudFunction, CloudFunctionPatch, FirestoreCollection,
    FirestoreDocument, FirestoreDocumentPatch, IamUser, IamUserPatch, LogEntry, LogFilter,
    NewApiEndpoint, NewCloudFunction, NewFirestoreCollection, NewFirestoreDocument, NewIamUser,
    NewLogEntry, NewServiceAccount, RecordId, ServiceAccount, ServiceAccountPatch,
};
use crate::query::{QueryRequest, QueryResult};
use crate::simulation::{
    simulate_endpoint_test, EndpointTestRequest, EndpointTestResult, RandomSource,
};
use crate::store::ConsoleStore;

#[derive(Clone)]
pub struct ConsoleService {
    store: Arc<ConsoleStore>,
    hooks: HookDispatcher,
    rng: Arc<dyn RandomSource>,
}

impl ConsoleService {
    /// Service with the activity-log and metrics hooks installed.
    pub fn new(store: Arc<ConsoleStore>, rng: Arc<dyn RandomSource>) -> Self {
        let hooks = HookDispatcher::standard(Arc::clone(&store));
        Self { store, hooks, rng }
    }

    /// Append a hook after the standard ones.
    pub fn with_hook(mut self, hook: Arc<dyn PostCommitHook>) -> Self {
        self.hooks = self.hooks.with(hook);
        self
    }

    pub fn store(&self) -> &Arc<ConsoleStore> { &self.store }

    async fn committed(&self, event: MutationEvent) {
        debug!(collection = event.collection(), op = event.op(), "mutation committed");
        self.hooks.dispatch(&event).await;
    }

    // ---- cloud functions ----

    pub async fn list_functions(&self) -> Vec<CloudFunction> {
        self.store.list_functions().await
    }

    pub async fn get_function(&self, id: RecordId) -> ServiceResult<CloudFunction> {
        self.store.get_function(id).await.ok_or_else(|| ServiceError::not_found("function"))
    }

    pub async fn deploy_function(&self, input: NewCloudFunction) -> ServiceResult<CloudFunction> {
        input.validate()?;
        let created = self.store.create_function(input).await?;
        info!(
            id = created.id,
            name = %created.name,
            runtime = %created.runtime,
            "function deployed"
        );
        self.committed(MutationEvent::FunctionDeployed {
            id: created.id,
            name: created.name.clone(),
        })
        .await;
        Ok(created)
    }

    pub async fn update_function(
        &self,
        id: RecordId,
        patch: CloudFunctionPatch,
    ) -> ServiceResult<CloudFunction> {
        patch.validate()?;
        let updated = self.store.update_function(id, patch).await?;
        self.committed(MutationEvent::FunctionUpdated { id, name: updated.name.clone() }).await;
        Ok(updated)
    }

    pub async fn delete_function(&self, id: RecordId) -> ServiceResult<()> {
        if !self.store.delete_function(id).await {
            return Err(ServiceError::not_found("function"));
        }
        self.committed(MutationEvent::FunctionDeleted { id }).await;
        Ok(())
    }

    // ---- api endpoints ----

    pub async fn list_endpoints(&self) -> Vec<ApiEndpoint> {
        self.store.list_endpoints().await
    }

    pub async fn register_endpoint(&self, input: NewApiEndpoint) -> ServiceResult<ApiEndpoint> {
        input.validate()?;
        let created = self.store.create_endpoint(input).await;
        self.committed(MutationEvent::EndpointRegistered {
            id: created.id,
            method: created.method.clone(),
            path: created.path.clone(),
        })
        .await;
        Ok(created)
    }

    pub async fn update_endpoint(
        &self,
        id: RecordId,
        patch: ApiEndpointPatch,
    ) -> ServiceResult<ApiEndpoint> {
        patch.validate()?;
        let updated = self.store.update_endpoint(id, patch).await?;
        self.committed(MutationEvent::EndpointUpdated {
            id,
            method: updated.method.clone(),
            path: updated.path.clone(),
        })
        .await;
        Ok(updated)
    }

    pub async fn delete_endpoint(&self, id: RecordId) -> ServiceResult<()> {
        if !self.store.delete_endpoint(id).await {
            return Err(ServiceError::not_found("endpoint"));
        }
        self.committed(MutationEvent::EndpointDeleted { id }).await;
        Ok(())
    }

    /// Simulated call; nothing leaves the process.
    pub async fn test_endpoint(&self, request: EndpointTestRequest) -> EndpointTestResult {
        let result = simulate_endpoint_test(&request, self.rng.as_ref());
        metrics::ENDPOINT_TESTS_TOTAL.inc();
        self.committed(MutationEvent::EndpointTested {
            method: request.method_or_default().to_string(),
            url: request.url_or_default().to_string(),
        })
        .await;
        result
    }

    // ---- firestore ----

    pub async fn list_collections(&self) -> Vec<FirestoreCollection> {
        self.store.list_collections().await
    }

    pub async fn create_collection(
        &self,
        input: NewFirestoreCollection,
    ) -> ServiceResult<FirestoreCollection> {
        input.validate()?;
        let created = self.store.create_collection(input).await?;
        self.committed(MutationEvent::CollectionCreated {
            id: created.id,
            name: created.name.clone(),
        })
        .await;
        Ok(created)
    }

    pub async fn delete_collection(&self, id: RecordId) -> ServiceResult<()> {
        if !self.store.delete_collection(id).await {
            return Err(ServiceError::not_found("collection"));
        }
        self.committed(MutationEvent::CollectionDeleted { id }).await;
        Ok(())
    }

    pub async fn list_documents(&self, collection_id: RecordId) -> Vec<FirestoreDocument> {
        self.store.list_documents(collection_id).await
    }

    pub async fn create_document(
        &self,
        collection_id: RecordId,
        input: NewFirestoreDocument,
    ) -> ServiceResult<FirestoreDocument> {
        input.validate()?;
        let created = self.store.create_document(collection_id, input).await?;
        self.committed(MutationEvent::DocumentCreated { id: created.id, collection_id }).await;
        Ok(created)
    }

    pub async fn update_document(
        &self,
        id: RecordId,
        patch: FirestoreDocumentPatch,
    ) -> ServiceResult<FirestoreDocument> {
        patch.validate()?;
        let updated = self.store.update_document(id, patch).await?;
        self.committed(MutationEvent::DocumentUpdated { id }).await;
        Ok(updated)
    }

    pub async fn delete_document(&self, id: RecordId) -> ServiceResult<()> {
        let removed = self
            .store
            .delete_document(id)
            .await
            .ok_or_else(|| ServiceError::not_found("document"))?;
        self.committed(MutationEvent::DocumentDeleted {
            id,
            collection_id: removed.collection_id,
        })
        .await;
        Ok(())
    }

    /// Predicate is logged, not evaluated. A missing or unknown collection
    /// yields an empty result.
    pub async fn run_query(&self, request: QueryRequest) -> QueryResult {
        let documents = match request.collection_id {
            Some(collection_id) => self.store.list_documents(collection_id).await,
            None => Vec::new(),
        };
        let result = QueryResult::preview(documents);
        self.committed(MutationEvent::QueryExecuted {
            collection_id: request.collection_id,
            predicate: request.describe(),
        })
        .await;
        result
    }

    // ---- logs ----

    pub async fn list_logs(&self, filter: &LogFilter) -> Vec<LogEntry> {
        self.store.list_logs(filter).await
    }

    pub async fn write_log(&self, input: NewLogEntry) -> ServiceResult<LogEntry> {
        input.validate()?;
        let created = self.store.create_log(input).await;
        self.committed(MutationEvent::LogWritten { id: created.id }).await;
        Ok(created)
    }

    // ---- iam ----

    pub async fn list_iam_users(&self) -> Vec<IamUser> {
        self.store.list_iam_users().await
    }

    pub async fn add_iam_user(&self, input: NewIamUser) -> ServiceResult<IamUser> {
        input.validate()?;
        let created = self.store.create_iam_user(input).await?;
        self.committed(MutationEvent::IamUserAdded {
            id: created.id,
            email: created.email.clone(),
            role: created.role.clone(),
        })
        .await;
        Ok(created)
    }

    pub async fn update_iam_user(
        &self,
        id: RecordId,
        patch: IamUserPatch,
    ) -> ServiceResult<IamUser> {
        patch.validate()?;
        let updated = self.store.update_iam_user(id, patch).await?;
        self.committed(MutationEvent::IamUserUpdated { id, email: updated.email.clone() }).await;
        Ok(updated)
    }

    pub async fn remove_iam_user(&self, id: RecordId) -> ServiceResult<()> {
        if !self.store.delete_iam_user(id).await {
            return Err(ServiceError::not_found("user"));
        }
        self.committed(MutationEvent::IamUserRemoved { id }).await;
        Ok(())
    }

    pub async fn list_service_accounts(&self) -> Vec<ServiceAccount> {
        self.store.list_service_accounts().await
    }

    pub async fn create_service_account(
        &self,
        input: NewServiceAccount,
    ) -> ServiceResult<ServiceAccount> {
        input.validate()?;
        let created = self.store.create_service_account(input).await?;
        self.committed(MutationEvent::ServiceAccountCreated {
            id: created.id,
            name: created.name.clone(),
        })
        .await;
        Ok(created)
    }

    pub async fn update_service_account(
        &self,
        id: RecordId,
        patch: ServiceAccountPatch,
    ) -> ServiceResult<ServiceAccount> {
        patch.validate()?;
        let updated = self.store.update_service_account(id, patch).await?;
        self.committed(MutationEvent::ServiceAccountUpdated {
            id,
            name: updated.name.clone(),
        })
        .await;
        Ok(updated)
    }

    pub async fn remove_service_account(&self, id: RecordId) -> ServiceResult<()> {
        if !self.store.delete_service_account(id).await {
            return Err(ServiceError::not_found("service account"));
        }
        self.committed(MutationEvent::ServiceAccountRemoved { id }).await;
        Ok(())
    }

    /// Policies are not stored; the call only leaves an audit line.
    pub async fn update_security_policies(&self) {
        self.committed(MutationEvent::SecurityPoliciesUpdated).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookError;
    use crate::simulation::SequenceRandom;
    use async_trait::async_trait;
    use serde_json::json;

    fn service() -> ConsoleService {
        ConsoleService::new(Arc::new(ConsoleStore::new()), Arc::new(SequenceRandom::fixed(321)))
    }

    fn func(name: &str, code: &str) -> NewCloudFunction {
        NewCloudFunction {
            name: name.into(),
            runtime: "Python 3.11".into(),
            trigger: "HTTP".into(),
            code: code.into(),
        }
    }

    async fn messages(svc: &ConsoleService) -> Vec<String> {
        svc.list_logs(&LogFilter::default()).await.into_iter().map(|e| e.message).collect()
    }

    #[tokio::test]
    async fn deploy_logs_activity_and_blank_code_is_rejected() {
        let svc = service();
        svc.deploy_function(func("thumbnailer", "def main(): pass")).await.expect("deploy");
        let err = svc.deploy_function(func("empty", "  ")).await.unwrap_err();
        assert_eq!(err, ServiceError::required("code"));
        assert_eq!(svc.list_functions().await.len(), 1);
        assert_eq!(messages(&svc).await, vec!["Function 'thumbnailer' deployed successfully"]);
    }

    #[tokio::test]
    async fn deleting_missing_function_is_not_found_and_silent() {
        let svc = service();
        assert_eq!(svc.delete_function(999).await, Err(ServiceError::not_found("function")));
        assert!(messages(&svc).await.is_empty());
    }

    #[tokio::test]
    async fn query_returns_three_of_five_with_full_count() {
        let svc = service();
        let col = svc
            .create_collection(NewFirestoreCollection { name: "orders".into() })
            .await
            .expect("col");
        for i in 0..5 {
            let input = NewFirestoreDocument { document_id: None, data: json!({"n": i}) };
            svc.create_document(col.id, input).await.expect("doc");
        }
        let req = QueryRequest {
            collection_id: Some(col.id),
            field: Some("status".into()),
            operator: Some("==".into()),
            value: Some(json!("shipped")),
        };
        let result = svc.run_query(req).await;
        assert_eq!(result.results.len(), 3);
        assert_eq!(result.count, 5);
        assert_eq!(messages(&svc).await[0], "Query executed: status == shipped");
    }

    #[tokio::test]
    async fn endpoint_test_uses_injected_random_source() {
        let svc = service();
        let req = EndpointTestRequest {
            method: Some("POST".into()),
            url: Some("/api/auth/login".into()),
            ..Default::default()
        };
        let res = svc.test_endpoint(req).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.response_time, 321);
        assert_eq!(messages(&svc).await, vec!["API request processed: POST /api/auth/login"]);
    }

    #[tokio::test]
    async fn manual_log_write_is_not_echoed() {
        let svc = service();
        svc.write_log(NewLogEntry::info("Cloud Functions", "cold start")).await.expect("log");
        assert_eq!(messages(&svc).await, vec!["cold start"]);
    }

    struct Broken;

    #[async_trait]
    impl PostCommitHook for Broken {
        fn name(&self) -> &'static str { "broken" }
        async fn after_commit(&self, _event: &MutationEvent) -> Result<(), HookError> {
            Err(HookError::Failed { hook: "broken", reason: "unavailable".into() })
        }
    }

    #[tokio::test]
    async fn failing_hook_leaves_result_intact() {
        let svc = service().with_hook(Arc::new(Broken));
        let user = svc
            .add_iam_user(NewIamUser { email: "ops@example.com".into(), role: "Viewer".into() })
            .await
            .expect("user");
        assert_eq!(user.status, "Active");
        assert_eq!(svc.list_iam_users().await.len(), 1);
        assert_eq!(messages(&svc).await, vec!["User 'ops@example.com' added with role 'Viewer'"]);
    }

    #[tokio::test]
    async fn security_policy_update_only_audits() {
        let svc = service();
        svc.update_security_policies().await;
        assert_eq!(messages(&svc).await, vec!["Security policies updated successfully"]);
    }
}
