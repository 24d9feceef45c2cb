use super::load::{load_reviews, DatasetError};
use super::{Review, SentimentLabel};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::info;

/// Maps long source place names to the short names shown in reports.
pub type PlaceAliases = HashMap<String, String>;

/// The immutable, process-wide review table. Built once at startup and
/// shared by `Arc` with every pipeline call.
#[derive(Debug, Clone, Default)]
pub struct ReviewDataset {
    reviews: Vec<Review>,
    source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DatasetStats {
    pub total_reviews: usize,
    pub regions: usize,
    pub cities: usize,
    pub place_types: usize,
    pub places: usize,
    pub positive_reviews: usize,
    pub neutral_reviews: usize,
    pub negative_reviews: usize,
    pub reviews_with_topic: usize,
}

impl ReviewDataset {
    pub fn load(path: &Path, aliases: &PlaceAliases) -> Result<Self, DatasetError> {
        info!("Loading reviews from {:?}...", path);
        let reviews = load_reviews(path, aliases)?;
        let dataset = ReviewDataset {
            reviews,
            source: Some(path.to_path_buf()),
        };
        let stats = dataset.stats();
        info!(
            "Dataset has:\n{} reviews\n{} regions\n{} cities\n{} places",
            stats.total_reviews, stats.regions, stats.cities, stats.places
        );
        Ok(dataset)
    }

    pub fn from_reviews(reviews: Vec<Review>) -> Self {
        ReviewDataset {
            reviews,
            source: None,
        }
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// All rows as a borrowed set, the starting point of every pipeline run.
    pub fn rows(&self) -> Vec<&Review> {
        self.reviews.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn count_by_sentiment(&self, label: SentimentLabel) -> usize {
        self.reviews.iter().filter(|r| r.sentiment == label).count()
    }

    pub fn stats(&self) -> DatasetStats {
        let distinct = |f: fn(&Review) -> &str| {
            self.reviews
                .iter()
                .map(f)
                .collect::<HashSet<&str>>()
                .len()
        };
        let places = self
            .reviews
            .iter()
            .map(|r| (&r.region, &r.city, &r.place_type, &r.place_name))
            .collect::<HashSet<_>>()
            .len();

        DatasetStats {
            total_reviews: self.reviews.len(),
            regions: distinct(|r| &r.region),
            cities: distinct(|r| &r.city),
            place_types: distinct(|r| &r.place_type),
            places,
            positive_reviews: self.count_by_sentiment(SentimentLabel::Positive),
            neutral_reviews: self.count_by_sentiment(SentimentLabel::Neutral),
            negative_reviews: self.count_by_sentiment(SentimentLabel::Negative),
            reviews_with_topic: self.reviews.iter().filter(|r| r.topic.is_some()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reviews::test_support::review;

    #[test]
    fn computes_stats() {
        let dataset = ReviewDataset::from_reviews(vec![
            review("Central", "Riyadh", "Museum", "A", 4.0, SentimentLabel::Positive, 0.5),
            review("Central", "Riyadh", "Museum", "B", 2.0, SentimentLabel::Negative, -0.5),
            review("West", "Jeddah", "Hotel", "C", 3.0, SentimentLabel::Neutral, 0.0),
            review("West", "Jeddah", "Hotel", "C", 5.0, SentimentLabel::Positive, 0.9),
        ]);

        let stats = dataset.stats();
        assert_eq!(stats.total_reviews, 4);
        assert_eq!(stats.regions, 2);
        assert_eq!(stats.cities, 2);
        assert_eq!(stats.place_types, 2);
        assert_eq!(stats.places, 3);
        assert_eq!(stats.positive_reviews, 2);
        assert_eq!(stats.neutral_reviews, 1);
        assert_eq!(stats.negative_reviews, 1);
        assert_eq!(stats.reviews_with_topic, 0);
    }

    #[test]
    fn rows_preserve_input_order() {
        let dataset = ReviewDataset::from_reviews(vec![
            review("Central", "Riyadh", "Museum", "A", 4.0, SentimentLabel::Positive, 0.5),
            review("West", "Jeddah", "Hotel", "C", 3.0, SentimentLabel::Neutral, 0.0),
        ]);
        let names: Vec<&str> = dataset.rows().iter().map(|r| r.place_name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert!(dataset.source().is_none());
    }
}
