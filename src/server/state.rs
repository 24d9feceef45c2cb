use axum::extract::FromRef;

use crate::reviews::ReviewDataset;
use crate::topics::TopicInsights;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedDataset = Arc<ReviewDataset>;
pub type OptionalTopics = Option<Arc<TopicInsights>>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub dataset: GuardedDataset,
    pub topics: OptionalTopics,
    pub hash: String,
}

impl ServerState {
    pub fn new(config: ServerConfig, dataset: GuardedDataset, topics: OptionalTopics) -> Self {
        ServerState {
            config,
            start_time: Instant::now(),
            dataset,
            topics,
            hash: format!("{}-{}", env!("CARGO_PKG_VERSION"), env!("GIT_HASH")),
        }
    }
}

impl FromRef<ServerState> for GuardedDataset {
    fn from_ref(input: &ServerState) -> Self {
        input.dataset.clone()
    }
}

impl FromRef<ServerState> for OptionalTopics {
    fn from_ref(input: &ServerState) -> Self {
        input.topics.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
