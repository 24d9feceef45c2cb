pub mod config;
mod http_layers;
mod insights_routes;
pub mod metrics;
#[allow(clippy::module_inception)]
pub mod server;
pub mod state;
mod topics_routes;

pub use config::ServerConfig;
pub use http_layers::*;
pub use insights_routes::{InsightQuery, RatingsQuery, SentimentByQuery};
pub use server::{make_app, run_server};
