//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own reviews file.

use super::constants::*;
use super::fixtures::{create_test_reviews, create_test_topic_model};
use review_insights::reviews::{PlaceAliases, ReviewDataset};
use review_insights::server::{make_app, RequestsLoggingLevel, ServerConfig};
use review_insights::topics::{ComponentsModel, TopicInsights, Vocabulary};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with an isolated dataset
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    // Private fields - keep resources alive until drop
    _temp_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server with the fixture topic model loaded
    pub async fn spawn() -> Self {
        Self::spawn_with(true).await
    }

    /// Spawns a new test server without a topic model
    pub async fn spawn_without_topics() -> Self {
        Self::spawn_with(false).await
    }

    /// This function:
    /// 1. Writes the fixture reviews (and optionally topic artifacts) to a temp dir
    /// 2. Loads them the same way the binary does
    /// 3. Binds to a random port (127.0.0.1:0)
    /// 4. Spawns the server in a background task
    /// 5. Waits for the server to be ready
    ///
    /// # Panics
    ///
    /// Panics if fixture creation, loading, binding or startup fails.
    async fn spawn_with(with_topics: bool) -> Self {
        let (temp_dir, reviews_path) =
            create_test_reviews().expect("Failed to create test reviews");

        let dataset = ReviewDataset::load(&reviews_path, &PlaceAliases::new())
            .expect("Failed to load test reviews");

        let topics = if with_topics {
            let (model_path, vocabulary_path) =
                create_test_topic_model(&temp_dir).expect("Failed to create test topic model");
            let model = ComponentsModel::load(&model_path).expect("Failed to load topic model");
            let vocabulary =
                Vocabulary::load(&vocabulary_path).expect("Failed to load vocabulary");
            let insights =
                TopicInsights::new(Arc::new(model), vocabulary).with_top_n(TOPIC_TOP_WORDS);
            insights
                .check_assignments(dataset.reviews())
                .expect("Fixture topics exceed the model");
            Some(Arc::new(insights))
        } else {
            None
        };

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            content_cache_age_sec: CONTENT_CACHE_AGE_SEC,
            frontend_dir_path: None,
            ..Default::default()
        };

        let app = make_app(config, Arc::new(dataset), topics).expect("Failed to build app");

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            _temp_dir: temp_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
