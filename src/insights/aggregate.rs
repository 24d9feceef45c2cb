//! Group-by aggregations over filtered review rows.

use crate::reviews::{Review, SentimentLabel};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Categorical column a table can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Region,
    City,
    PlaceType,
    PlaceName,
    PlaceCategory,
    Sentiment,
}

/// Region, City, Place Type, Place Name: the key of a single place.
pub const PLACE_KEYS: [GroupKey; 4] = [
    GroupKey::Region,
    GroupKey::City,
    GroupKey::PlaceType,
    GroupKey::PlaceName,
];

impl GroupKey {
    pub fn value<'a>(&self, review: &'a Review) -> &'a str {
        match self {
            GroupKey::Region => &review.region,
            GroupKey::City => &review.city,
            GroupKey::PlaceType => &review.place_type,
            GroupKey::PlaceName => &review.place_name,
            GroupKey::PlaceCategory => &review.place_category,
            GroupKey::Sentiment => review.sentiment.as_str(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKey::Region => "region",
            GroupKey::City => "city",
            GroupKey::PlaceType => "place_type",
            GroupKey::PlaceName => "place_name",
            GroupKey::PlaceCategory => "place_category",
            GroupKey::Sentiment => "sentiment",
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GroupKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "region" => Ok(GroupKey::Region),
            "city" => Ok(GroupKey::City),
            "place_type" | "type" => Ok(GroupKey::PlaceType),
            "place_name" | "place" | "name" => Ok(GroupKey::PlaceName),
            "place_category" | "category" => Ok(GroupKey::PlaceCategory),
            "sentiment" | "sentiment_label" => Ok(GroupKey::Sentiment),
            other => Err(format!("unknown group key '{}'", other)),
        }
    }
}

/// Groups rows by the values of `keys`, keeping groups in first-seen order.
pub(crate) fn group_rows<'a>(
    rows: &[&'a Review],
    keys: &[GroupKey],
) -> Vec<(Vec<&'a str>, Vec<&'a Review>)> {
    let mut index: HashMap<Vec<&'a str>, usize> = HashMap::new();
    let mut groups: Vec<(Vec<&'a str>, Vec<&'a Review>)> = Vec::new();

    for &row in rows {
        let key: Vec<&'a str> = keys.iter().map(|k| k.value(row)).collect();
        match index.get(&key) {
            Some(&i) => groups[i].1.push(row),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![row]));
            }
        }
    }
    groups
}

pub(crate) fn mean_rating(rows: &[&Review]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    rows.iter().map(|r| r.rating).sum::<f64>() / rows.len() as f64
}

pub(crate) fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * part as f64 / total as f64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingGroup {
    pub keys: Vec<String>,
    pub mean_rating: f64,
    pub count: usize,
}

pub fn group_ratings(rows: &[&Review], keys: &[GroupKey]) -> Vec<RatingGroup> {
    group_rows(rows, keys)
        .into_iter()
        .map(|(key, members)| RatingGroup {
            keys: key.into_iter().map(String::from).collect(),
            mean_rating: mean_rating(&members),
            count: members.len(),
        })
        .collect()
}

/// Groups sorted by mean rating, highest first. Ties keep first-seen order.
pub fn ratings_ranked(rows: &[&Review], keys: &[GroupKey]) -> Vec<RatingGroup> {
    let mut groups = group_ratings(rows, keys);
    groups.sort_by(|a, b| b.mean_rating.total_cmp(&a.mean_rating));
    groups
}

pub fn top_rated(rows: &[&Review], keys: &[GroupKey], n: usize) -> Vec<RatingGroup> {
    let mut groups = ratings_ranked(rows, keys);
    groups.truncate(n);
    groups
}

pub fn bottom_rated(rows: &[&Review], keys: &[GroupKey], n: usize) -> Vec<RatingGroup> {
    let mut groups = group_ratings(rows, keys);
    groups.sort_by(|a, b| a.mean_rating.total_cmp(&b.mean_rating));
    groups.truncate(n);
    groups
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentShare {
    pub sentiment: SentimentLabel,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    pub fn from_rows(rows: &[&Review]) -> Self {
        let mut counts = SentimentCounts::default();
        for row in rows {
            counts.add(row.sentiment);
        }
        counts
    }

    pub fn add(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }

    pub fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

/// Count and share of each label, always in positive, neutral, negative order.
/// Labels absent from `rows` are reported with a zero count.
pub fn sentiment_distribution(rows: &[&Review]) -> Vec<SentimentShare> {
    let counts = SentimentCounts::from_rows(rows);
    let total = counts.total();
    SentimentLabel::ALL
        .iter()
        .map(|&label| SentimentShare {
            sentiment: label,
            count: counts.get(label),
            percentage: percentage(counts.get(label), total),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentGroup {
    pub key: String,
    #[serde(flatten)]
    pub counts: SentimentCounts,
}

pub fn sentiment_by(rows: &[&Review], key: GroupKey) -> Vec<SentimentGroup> {
    group_rows(rows, &[key])
        .into_iter()
        .map(|(mut k, members)| SentimentGroup {
            key: k.pop().unwrap_or_default().to_string(),
            counts: SentimentCounts::from_rows(&members),
        })
        .collect()
}

/// One side of a region comparison. An empty `place_types` keeps every type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionSide {
    pub region: String,
    #[serde(default)]
    pub place_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSentiment {
    pub region: String,
    pub place_types: Vec<String>,
    pub total: usize,
    pub distribution: Vec<SentimentShare>,
}

fn region_sentiment(rows: &[&Review], side: &RegionSide) -> RegionSentiment {
    let selected: Vec<&Review> = rows
        .iter()
        .copied()
        .filter(|r| r.region == side.region)
        .filter(|r| side.place_types.is_empty() || side.place_types.contains(&r.place_type))
        .collect();
    RegionSentiment {
        region: side.region.clone(),
        place_types: side.place_types.clone(),
        total: selected.len(),
        distribution: sentiment_distribution(&selected),
    }
}

pub fn compare_regions(
    rows: &[&Review],
    first: &RegionSide,
    second: &RegionSide,
) -> (RegionSentiment, RegionSentiment) {
    (region_sentiment(rows, first), region_sentiment(rows, second))
}
