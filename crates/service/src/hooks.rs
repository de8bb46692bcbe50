//! Post-commit hooks.
//!
//! Every committed mutation is described by a `MutationEvent` and handed to
//! each registered hook in order. Hook failures are logged and counted by the
//! dispatcher and never reach the caller of the mutation.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::metrics;
use crate::models::{NewLogEntry, RecordId};
use crate::store::ConsoleStore;

pub const SERVICE_FUNCTIONS: &str = "Cloud Functions";
pub const SERVICE_ENDPOINTS: &str = "Cloud Endpoints";
pub const SERVICE_FIRESTORE: &str = "Cloud Firestore";
pub const SERVICE_IAM: &str = "IAM";

#[derive(Debug, Clone, PartialEq)]
pub enum MutationEvent {
    FunctionDeployed { id: RecordId, name: String },
    FunctionUpdated { id: RecordId, name: String },
    FunctionDeleted { id: RecordId },
    EndpointRegistered { id: RecordId, method: String, path: String },
    EndpointUpdated { id: RecordId, method: String, path: String },
    EndpointDeleted { id: RecordId },
    EndpointTested { method: String, url: String },
    CollectionCreated { id: RecordId, name: String },
    CollectionDeleted { id: RecordId },
    DocumentCreated { id: RecordId, collection_id: RecordId },
    DocumentUpdated { id: RecordId },
    DocumentDeleted { id: RecordId, collection_id: RecordId },
    QueryExecuted { collection_id: Option<RecordId>, predicate: String },
    LogWritten { id: RecordId },
    IamUserAdded { id: RecordId, email: String, role: String },
    IamUserUpdated { id: RecordId, email: String },
    IamUserRemoved { id: RecordId },
    ServiceAccountCreated { id: RecordId, name: String },
    ServiceAccountUpdated { id: RecordId, name: String },
    ServiceAccountRemoved { id: RecordId },
    SecurityPoliciesUpdated,
}

impl MutationEvent {
    /// Resource collection the event belongs to (metric label).
    pub fn collection(&self) -> &'static str {
        use MutationEvent::*;
        match self {
            FunctionDeployed { .. }
            | FunctionUpdated { .. }
            | FunctionDeleted { .. } => "functions",
            EndpointRegistered { .. }
            | EndpointUpdated { .. }
            | EndpointDeleted { .. }
            | EndpointTested { .. } => "endpoints",
            CollectionCreated { .. } | CollectionDeleted { .. } => "collections",
            DocumentCreated { .. }
            | DocumentUpdated { .. }
            | DocumentDeleted { .. }
            | QueryExecuted { .. } => "documents",
            LogWritten { .. } => "logs",
            IamUserAdded { .. } | IamUserUpdated { .. } | IamUserRemoved { .. } => "iam_users",
            ServiceAccountCreated { .. }
            | ServiceAccountUpdated { .. }
            | ServiceAccountRemoved { .. } => "service_accounts",
            SecurityPoliciesUpdated => "security_policies",
        }
    }

    /// Operation kind (metric label).
    pub fn op(&self) -> &'static str {
        use MutationEvent::*;
        match self {
            FunctionDeployed { .. }
            | EndpointRegistered { .. }
            | CollectionCreated { .. }
            | DocumentCreated { .. }
            | LogWritten { .. }
            | IamUserAdded { .. }
            | ServiceAccountCreated { .. } => "create",
            FunctionUpdated { .. }
            | EndpointUpdated { .. }
            | DocumentUpdated { .. }
            | IamUserUpdated { .. }
            | ServiceAccountUpdated { .. }
            | SecurityPoliciesUpdated => "update",
            FunctionDeleted { .. }
            | EndpointDeleted { .. }
            | CollectionDeleted { .. }
            | DocumentDeleted { .. }
            | IamUserRemoved { .. }
            | ServiceAccountRemoved { .. } => "delete",
            EndpointTested { .. } => "test",
            QueryExecuted { .. } => "query",
        }
    }

    /// Activity log line for the console's log viewer, if the event has one.
    /// Manual log writes have none.
    pub fn activity(&self) -> Option<NewLogEntry> {
        use MutationEvent::*;
        let (service, message) = match self {
            FunctionDeployed { name, .. } => (
                SERVICE_FUNCTIONS,
                format!("Function '{}' deployed successfully", name),
            ),
            FunctionUpdated { name, .. } => (
                SERVICE_FUNCTIONS,
                format!("Function '{}' updated successfully", name),
            ),
            FunctionDeleted { .. } => (
                SERVICE_FUNCTIONS,
                "Function deleted successfully".to_string(),
            ),
            EndpointRegistered { method, path, .. } => (
                SERVICE_ENDPOINTS,
                format!("Endpoint {} {} registered", method, path),
            ),
            EndpointUpdated { method, path, .. } => (
                SERVICE_ENDPOINTS,
                format!("Endpoint {} {} updated", method, path),
            ),
            EndpointDeleted { .. } => (
                SERVICE_ENDPOINTS,
                "Endpoint removed successfully".to_string(),
            ),
            EndpointTested { method, url } => (
                SERVICE_ENDPOINTS,
                format!("API request processed: {} {}", method, url),
            ),
            CollectionCreated { name, .. } => (
                SERVICE_FIRESTORE,
                format!("Collection '{}' created successfully", name),
            ),
            CollectionDeleted { .. } => (
                SERVICE_FIRESTORE,
                "Collection deleted successfully".to_string(),
            ),
            DocumentCreated { .. } => (
                SERVICE_FIRESTORE,
                "Document created in collection".to_string(),
            ),
            DocumentUpdated { .. } => (
                SERVICE_FIRESTORE,
                "Document updated successfully".to_string(),
            ),
            DocumentDeleted { .. } => (
                SERVICE_FIRESTORE,
                "Document deleted successfully".to_string(),
            ),
            QueryExecuted { predicate, .. } => (
                SERVICE_FIRESTORE,
                format!("Query executed: {}", predicate),
            ),
            LogWritten { .. } => return None,
            IamUserAdded { email, role, .. } => (
                SERVICE_IAM,
                format!("User '{}' added with role '{}'", email, role),
            ),
            IamUserUpdated { email, .. } => (SERVICE_IAM, format!("User '{}' updated", email)),
            IamUserRemoved { .. } => (SERVICE_IAM, "User removed successfully".to_string()),
            ServiceAccountCreated { name, .. } => (
                SERVICE_IAM,
                format!("Service account '{}' created successfully", name),
            ),
            ServiceAccountUpdated { name, .. } => (
                SERVICE_IAM,
                format!("Service account '{}' updated", name),
            ),
            ServiceAccountRemoved { .. } => (
                SERVICE_IAM,
                "Service account removed successfully".to_string(),
            ),
            SecurityPoliciesUpdated => (
                SERVICE_IAM,
                "Security policies updated successfully".to_string(),
            ),
        };
        Some(NewLogEntry::info(service, message))
    }
}

#[derive(Debug, Error)]
pub enum HookError {
    #[error("hook {hook} failed: {reason}")]
    Failed { hook: &'static str, reason: String },
}

#[async_trait]
pub trait PostCommitHook: Send + Sync {
    fn name(&self) -> &'static str;
    async fn after_commit(&self, event: &MutationEvent) -> Result<(), HookError>;
}

/// Appends the event's activity line to the store's log collection.
pub struct ActivityLogHook {
    store: Arc<ConsoleStore>,
}

impl ActivityLogHook {
    pub fn new(store: Arc<ConsoleStore>) -> Self { Self { store } }
}

#[async_trait]
impl PostCommitHook for ActivityLogHook {
    fn name(&self) -> &'static str { "activity_log" }

    async fn after_commit(&self, event: &MutationEvent) -> Result<(), HookError> {
        if let Some(entry) = event.activity() {
            entry.validate().map_err(|e| HookError::Failed {
                hook: self.name(),
                reason: e.to_string(),
            })?;
            self.store.create_log(entry).await;
        }
        Ok(())
    }
}

/// Counts committed mutations per collection and operation.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsHook;

#[async_trait]
impl PostCommitHook for MetricsHook {
    fn name(&self) -> &'static str { "metrics" }

    async fn after_commit(&self, event: &MutationEvent) -> Result<(), HookError> {
        metrics::MUTATIONS_TOTAL.with_label_values(&[event.collection(), event.op()]).inc();
        Ok(())
    }
}

/// Ordered hook list run after each commit.
#[derive(Clone, Default)]
pub struct HookDispatcher {
    hooks: Vec<Arc<dyn PostCommitHook>>,
}

impl HookDispatcher {
    pub fn new() -> Self { Self::default() }

    /// Activity log first, then metrics.
    pub fn standard(store: Arc<ConsoleStore>) -> Self {
        Self::new()
            .with(Arc::new(ActivityLogHook::new(store)))
            .with(Arc::new(MetricsHook))
    }

    pub fn with(mut self, hook: Arc<dyn PostCommitHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn len(&self) -> usize { self.hooks.len() }

    pub fn is_empty(&self) -> bool { self.hooks.is_empty() }

    /// Run every hook; a failing hook is reported and the rest still run.
    pub async fn dispatch(&self, event: &MutationEvent) {
        for hook in &self.hooks {
            if let Err(e) = hook.after_commit(event).await {
                metrics::HOOK_FAILURES_TOTAL.with_label_values(&[hook.name()]).inc();
                warn!(
                    hook = hook.name(),
                    collection = event.collection(),
                    op = event.op(),
                    error = %e,
                    "post-commit hook failed"
                );
            }
        }
    }
}
