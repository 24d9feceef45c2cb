//! Review Insights Library
//!
//! Loads a tourist-review dataset once and derives every dashboard table
//! from it through a pure filter → aggregate → score pipeline.

pub mod config;
pub mod insights;
pub mod reviews;
pub mod server;
pub mod topics;

// Re-export commonly used types for convenience
pub use insights::{FilterSelection, InsightTable};
pub use reviews::{Review, ReviewDataset, SentimentLabel};
pub use server::{run_server, RequestsLoggingLevel};
pub use topics::TopicInsights;
