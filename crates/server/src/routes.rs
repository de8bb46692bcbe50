pub mod endpoints;
pub mod firestore;
pub mod functions;
pub mod iam;
pub mod logs;

use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::AppState;

#[utoipa::path(get, path = "/health", tag = "health",
    responses(
        (status = 200, description = "Process is up", body = crate::openapi::HealthResponse)
    ))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Console API routes, without middleware.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/functions", get(functions::list).post(functions::deploy))
        .route(
            "/api/functions/:id",
            get(functions::get).put(functions::update).delete(functions::delete),
        )
        .route("/api/endpoints", get(endpoints::list).post(endpoints::register))
        .route("/api/endpoints/test", post(endpoints::test))
        .route("/api/endpoints/:id", put(endpoints::update).delete(endpoints::delete))
        .route(
            "/api/collections",
            get(firestore::list_collections).post(firestore::create_collection),
        )
        .route("/api/collections/:id", delete(firestore::delete_collection))
        .route(
            "/api/collections/:id/documents",
            get(firestore::list_documents).post(firestore::create_document),
        )
        .route(
            "/api/documents/:id",
            put(firestore::update_document).delete(firestore::delete_document),
        )
        .route("/api/query", post(firestore::query))
        .route("/api/logs", get(logs::list).post(logs::write))
        .route("/api/iam/users", get(iam::list_users).post(iam::add_user))
        .route("/api/iam/users/:id", put(iam::update_user).delete(iam::remove_user))
        .route(
            "/api/iam/service-accounts",
            get(iam::list_service_accounts).post(iam::create_service_account),
        )
        .route(
            "/api/iam/service-accounts/:id",
            put(iam::update_service_account).delete(iam::remove_service_account),
        )
        .route("/api/iam/security-policies", post(iam::update_security_policies))
}

/// Build the full application router: health, API docs and console routes
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    public
        .merge(api_router().with_state(state))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx at ERROR
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
