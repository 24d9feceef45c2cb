use anyhow::{Context, Result};
use std::time::Duration;

use tower_http::services::ServeDir;
use tracing::info;

use axum::{
    extract::State,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::insights_routes::insights_routes;
use super::metrics::metrics_handler;
use super::state::*;
use super::topics_routes::topics_routes;
use super::{http_cache, log_requests, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub reviews: usize,
    pub topics_loaded: bool,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        reviews: state.dataset.len(),
        topics_loaded: state.topics.is_some(),
    };
    Json(stats)
}

async fn get_dataset_stats(State(dataset): State<GuardedDataset>) -> impl IntoResponse {
    Json(dataset.stats())
}

pub fn make_app(
    config: ServerConfig,
    dataset: GuardedDataset,
    topics: OptionalTopics,
) -> Result<Router> {
    let state = ServerState::new(config.clone(), dataset, topics);

    let cache_layer = middleware::from_fn_with_state(config.content_cache_age_sec, http_cache);

    let dataset_routes: Router = Router::new()
        .route("/", get(get_dataset_stats))
        .layer(cache_layer.clone())
        .with_state(state.clone());

    let insights_routes = insights_routes(state.clone()).layer(cache_layer.clone());
    let topics_routes = topics_routes(state.clone()).layer(cache_layer);

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    let app: Router = home_router
        .nest("/v1/dataset", dataset_routes)
        .nest("/v1/insights", insights_routes)
        .nest("/v1/topics", topics_routes)
        .layer(middleware::from_fn_with_state(state, log_requests));

    Ok(app)
}

pub fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

pub async fn run_server(
    config: ServerConfig,
    dataset: GuardedDataset,
    topics: OptionalTopics,
    metrics_port: u16,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, dataset, topics)?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    let metrics_listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;

    info!("Listening on port {}", port);
    tokio::try_join!(
        async { axum::serve(listener, app).await.context("HTTP server failed") },
        async {
            axum::serve(metrics_listener, make_metrics_app())
                .await
                .context("Metrics server failed")
        },
    )?;
    Ok(())
}
