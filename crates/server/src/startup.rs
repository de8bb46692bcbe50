use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::simulation::{RandomSource, ThreadRandom};
use service::{metrics, seed, ConsoleService, ConsoleStore};

use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Fresh store, seeded when the config asks for it, wrapped in the console
/// service with the given random source.
pub async fn build_state(cfg: &AppConfig, rng: Arc<dyn RandomSource>) -> anyhow::Result<AppState> {
    let store = Arc::new(ConsoleStore::new());
    if cfg.console.seed_sample_data {
        seed::seed_sample_data(&store).await?;
    }
    let console = ConsoleService::new(store, rng);
    Ok(AppState::new(console).with_default_log_limit(cfg.console.default_log_limit))
}

/// Router with CORS and tracing, ready to serve.
pub fn app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

/// Bind and serve until `shutdown` resolves. The admin listener, when
/// configured, runs beside the API.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = build_state(&cfg, Arc::new(ThreadRandom)).await?;
    let app = app(state);

    let admin = match cfg.console.admin_addr.as_deref() {
        Some(addr) => {
            Some(common::admin_http::spawn_admin_server(addr, metrics::encode_metrics).await?)
        }
        None => {
            warn!("console.admin_addr not set; /metrics is not served");
            None
        }
    };

    let addr: SocketAddr = cfg.bind_addr().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, seeded = cfg.console.seed_sample_data, "console api listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

    if let Some(handle) = admin {
        handle.abort();
    }
    info!("console api stopped");
    Ok(())
}
