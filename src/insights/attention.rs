//! Per-city attention score and the rankings derived from it.

use super::aggregate::{group_rows, mean_rating, percentage, PLACE_KEYS};
use super::GroupKey;
use crate::reviews::Review;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttentionSettings {
    /// Rating a city is expected to reach; the score grows with the gap.
    pub baseline_rating: f64,
    pub min_negative_rate: f64,
    pub max_rating: f64,
    pub top_n: usize,
}

impl Default for AttentionSettings {
    fn default() -> Self {
        Self {
            baseline_rating: 4.5,
            min_negative_rate: 30.0,
            max_rating: 4.0,
            top_n: 10,
        }
    }
}

pub fn negative_rate(negative: usize, total: usize) -> f64 {
    percentage(negative, total)
}

pub fn attention_score(negative_rate: f64, rating: f64, baseline: f64) -> f64 {
    negative_rate * (baseline - rating)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitySummary {
    pub region: String,
    pub city: String,
    pub total_reviews: usize,
    pub negative_reviews: usize,
    pub negative_rate: f64,
    pub rating: f64,
    pub score: f64,
}

/// One summary per (Region, City), in first-seen input order.
fn summarize_cities(rows: &[&Review], settings: &AttentionSettings) -> Vec<CitySummary> {
    group_rows(rows, &[GroupKey::Region, GroupKey::City])
        .into_iter()
        .map(|(key, members)| {
            let total_reviews = members.len();
            let negative_reviews = members.iter().filter(|r| r.is_negative()).count();
            let negative_rate = negative_rate(negative_reviews, total_reviews);
            let rating = mean_rating(&members);
            CitySummary {
                region: key[0].to_string(),
                city: key[1].to_string(),
                total_reviews,
                negative_reviews,
                negative_rate,
                rating,
                score: attention_score(negative_rate, rating, settings.baseline_rating),
            }
        })
        .collect()
}

/// One summary per (Region, City), highest attention score first.
pub fn city_summaries(rows: &[&Review], settings: &AttentionSettings) -> Vec<CitySummary> {
    let mut summaries = summarize_cities(rows, settings);
    summaries.sort_by(|a, b| b.score.total_cmp(&a.score));
    summaries
}

pub fn top_attention(rows: &[&Review], settings: &AttentionSettings, n: usize) -> Vec<CitySummary> {
    let mut summaries = city_summaries(rows, settings);
    summaries.truncate(n);
    summaries
}

/// Cities at or above the negative-rate threshold whose mean rating stays
/// below `max_rating`, highest negative rate first.
pub fn attention_needed(rows: &[&Review], settings: &AttentionSettings) -> Vec<CitySummary> {
    let mut needed: Vec<CitySummary> = summarize_cities(rows, settings)
        .into_iter()
        .filter(|c| c.negative_rate >= settings.min_negative_rate && c.rating < settings.max_rating)
        .collect();
    needed.sort_by(|a, b| b.negative_rate.total_cmp(&a.negative_rate));
    needed
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionPriority {
    pub region: String,
    pub cities: usize,
}

pub fn region_priority(cities: &[CitySummary]) -> Vec<RegionPriority> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<RegionPriority> = Vec::new();
    for city in cities {
        match index.get(city.region.as_str()) {
            Some(&i) => counts[i].cities += 1,
            None => {
                index.insert(&city.region, counts.len());
                counts.push(RegionPriority {
                    region: city.region.clone(),
                    cities: 1,
                });
            }
        }
    }
    counts.sort_by(|a, b| b.cities.cmp(&a.cities));
    counts
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceConcern {
    pub region: String,
    pub city: String,
    pub place_type: String,
    pub place_name: String,
    pub negative_reviews: usize,
    pub rating: f64,
}

/// Places with at least one negative review, ranked by negative count.
/// The rating is the mean over all of the place's reviews.
pub fn places_with_most_negatives(rows: &[&Review], n: usize) -> Vec<PlaceConcern> {
    let mut places: Vec<PlaceConcern> = group_rows(rows, &PLACE_KEYS)
        .into_iter()
        .filter_map(|(key, members)| {
            let negative_reviews = members.iter().filter(|r| r.is_negative()).count();
            (negative_reviews > 0).then(|| PlaceConcern {
                region: key[0].to_string(),
                city: key[1].to_string(),
                place_type: key[2].to_string(),
                place_name: key[3].to_string(),
                negative_reviews,
                rating: mean_rating(&members),
            })
        })
        .collect();
    places.sort_by(|a, b| b.negative_reviews.cmp(&a.negative_reviews));
    places.truncate(n);
    places
}
