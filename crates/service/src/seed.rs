//! Sample data for a fresh console. Written straight into the store, so no
//! hook runs and no activity line is added beyond the seeded log entries.

use tracing::info;

use crate::errors::ServiceResult;
use crate::models::{
    LogLevel, NewApiEndpoint, NewCloudFunction, NewFirestoreCollection, NewIamUser, NewLogEntry,
    NewServiceAccount,
};
use crate::store::ConsoleStore;

const HELLO_HANDLER: &str =
    "exports.handler = (req, res) => { res.json({ message: 'Hello World' }); }";

pub async fn seed_sample_data(store: &ConsoleStore) -> ServiceResult<()> {
    store
        .create_function(NewCloudFunction {
            name: "user-authentication".into(),
            runtime: "Node.js 18".into(),
            trigger: "HTTP".into(),
            code: HELLO_HANDLER.into(),
        })
        .await?;
    store
        .create_function(NewCloudFunction {
            name: "data-processor".into(),
            runtime: "Python 3.9".into(),
            trigger: "Cloud Storage".into(),
            code: "def main(event, context): print('Processing data')".into(),
        })
        .await?;

    let endpoints = [("/api/users", "GET", 45, 120), ("/api/auth/login", "POST", 12, 200)];
    for (path, method, rpm, avg) in endpoints {
        store
            .create_endpoint(NewApiEndpoint {
                path: path.into(),
                method: method.into(),
                status: Some("Healthy".into()),
                requests_per_min: Some(rpm),
                avg_response_time: Some(avg),
            })
            .await;
    }

    for name in ["users", "products", "orders"] {
        store.create_collection(NewFirestoreCollection { name: name.into() }).await?;
    }

    store
        .create_log(NewLogEntry::info(
            "Cloud Functions",
            "Function 'user-authentication' deployed successfully",
        ))
        .await;
    store
        .create_log(NewLogEntry {
            service: "Cloud Endpoints".into(),
            level: LogLevel::Warning,
            message: "API endpoint '/api/data/export' response time exceeded 2s threshold".into(),
        })
        .await;

    for (email, role) in [("vra.9618@gmail.com", "Owner"), ("developer@example.com", "Editor")] {
        store.create_iam_user(NewIamUser { email: email.into(), role: role.into() }).await?;
    }

    store
        .create_service_account(NewServiceAccount {
            name: "function-executor".into(),
            email: "function-executor@project.iam.gserviceaccount.com".into(),
            roles: vec!["Cloud Functions Invoker".into()],
        })
        .await?;

    info!("sample data seeded");
    Ok(())
}
