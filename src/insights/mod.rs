//! The filter → aggregate → score pipeline. Every function here is pure over
//! borrowed rows of the shared dataset.

mod aggregate;
mod attention;
mod filter;
mod mismatch;

pub use aggregate::{
    bottom_rated, compare_regions, group_ratings, ratings_ranked, sentiment_by,
    sentiment_distribution, top_rated, GroupKey, RatingGroup, RegionSentiment, RegionSide,
    SentimentCounts, SentimentGroup, SentimentShare, PLACE_KEYS,
};
pub(crate) use aggregate::percentage;
pub use attention::{
    attention_needed, attention_score, city_summaries, negative_rate, places_with_most_negatives,
    region_priority, top_attention, AttentionSettings, CitySummary, PlaceConcern, RegionPriority,
};
pub use filter::{FilterLevel, FilterOptions, FilterSelection};
pub use mismatch::{find_mismatches, is_mismatch, MismatchSettings};

use serde::Serialize;

pub const NO_DATA_MESSAGE: &str = "No data available.";

/// A derived table. Empty tables carry an explicit message instead of
/// failing, so callers can always render something.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightTable<T> {
    pub rows: Vec<T>,
    pub message: Option<String>,
}

impl<T> InsightTable<T> {
    pub fn new(rows: Vec<T>) -> Self {
        let message = rows.is_empty().then(|| NO_DATA_MESSAGE.to_string());
        InsightTable { rows, message }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T> From<Vec<T>> for InsightTable<T> {
    fn from(rows: Vec<T>) -> Self {
        InsightTable::new(rows)
    }
}
