//! Review file loading and row validation.

use super::{PlaceAliases, Review, SentimentLabel};
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const REGION_COLUMN: &str = "Region";
pub const CITY_COLUMN: &str = "City";
pub const PLACE_TYPE_COLUMN: &str = "Place Type";
pub const PLACE_NAME_COLUMN: &str = "Place Name";
pub const PLACE_CATEGORY_COLUMN: &str = "Place Category";
pub const RATING_COLUMN: &str = "Rating";
pub const REVIEW_TEXT_COLUMN: &str = "Review Text";
pub const SENTIMENT_COLUMN: &str = "Sentiment Label";
pub const COMPOUND_COLUMN: &str = "compound";
pub const TOPIC_COLUMN: &str = "Topic";
pub const CLEANED_REVIEW_COLUMN: &str = "Cleaned Review";

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

/// Errors raised while reading the review file. Every row-level variant
/// names the file line and the offending column.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Reviews file not found: {0:?}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error at line {line}: {message}")]
    Csv { line: u64, message: String },

    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Line {line}: column '{column}' is required but was empty")]
    EmptyField { line: u64, column: &'static str },

    #[error("Line {line}: column 'Rating' has unparseable value '{value}'")]
    InvalidRating { line: u64, value: String },

    #[error("Line {line}: column 'Rating' value {value} is outside [1, 5]")]
    RatingOutOfRange { line: u64, value: f64 },

    #[error("Line {line}: column 'compound' has invalid value '{value}', expected a number in [-1, 1]")]
    InvalidCompound { line: u64, value: String },

    #[error("Line {line}: column 'Sentiment Label' has invalid value '{value}'")]
    InvalidSentiment { line: u64, value: String },

    #[error("Line {line}: column 'Topic' has invalid value '{value}'")]
    InvalidTopic { line: u64, value: String },
}

impl DatasetError {
    fn from_csv(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        DatasetError::Csv {
            line,
            message: err.to_string(),
        }
    }
}

struct ColumnIndex {
    region: usize,
    city: usize,
    place_type: usize,
    place_name: usize,
    place_category: usize,
    rating: usize,
    review_text: usize,
    sentiment: usize,
    compound: usize,
    topic: Option<usize>,
    cleaned_review: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, DatasetError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &'static str| find(name).ok_or(DatasetError::MissingColumn(name));

        Ok(ColumnIndex {
            region: require(REGION_COLUMN)?,
            city: require(CITY_COLUMN)?,
            place_type: require(PLACE_TYPE_COLUMN)?,
            place_name: require(PLACE_NAME_COLUMN)?,
            place_category: require(PLACE_CATEGORY_COLUMN)?,
            rating: require(RATING_COLUMN)?,
            review_text: require(REVIEW_TEXT_COLUMN)?,
            sentiment: require(SENTIMENT_COLUMN)?,
            compound: require(COMPOUND_COLUMN)?,
            topic: find(TOPIC_COLUMN),
            cleaned_review: find(CLEANED_REVIEW_COLUMN),
        })
    }
}

fn cell<'r>(record: &'r csv::StringRecord, idx: usize) -> &'r str {
    record.get(idx).map(str::trim).unwrap_or("")
}

fn optional_text(record: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    idx.map(|i| cell(record, i))
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn required_text(
    record: &csv::StringRecord,
    idx: usize,
    column: &'static str,
    line: u64,
) -> Result<String, DatasetError> {
    let value = cell(record, idx);
    if value.is_empty() {
        return Err(DatasetError::EmptyField { line, column });
    }
    Ok(value.to_string())
}

fn parse_rating(raw: &str, line: u64) -> Result<f64, DatasetError> {
    let value = raw
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DatasetError::InvalidRating {
            line,
            value: raw.to_string(),
        })?;
    if !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(DatasetError::RatingOutOfRange { line, value });
    }
    Ok(value)
}

fn parse_compound(raw: &str, line: u64) -> Result<f64, DatasetError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && (-1.0..=1.0).contains(v))
        .ok_or_else(|| DatasetError::InvalidCompound {
            line,
            value: raw.to_string(),
        })
}

/// Topic indices exported through a float column come out as "3.0".
fn parse_topic(raw: &str, line: u64) -> Result<Option<usize>, DatasetError> {
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(topic) = raw.parse::<usize>() {
        return Ok(Some(topic));
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => Ok(Some(v as usize)),
        _ => Err(DatasetError::InvalidTopic {
            line,
            value: raw.to_string(),
        }),
    }
}

fn parse_record(
    record: &csv::StringRecord,
    columns: &ColumnIndex,
    aliases: &PlaceAliases,
) -> Result<Review, DatasetError> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);

    let place_name = required_text(record, columns.place_name, PLACE_NAME_COLUMN, line)?;
    let place_name = aliases.get(&place_name).cloned().unwrap_or(place_name);

    let sentiment_raw = cell(record, columns.sentiment);
    let sentiment = sentiment_raw
        .parse::<SentimentLabel>()
        .map_err(|_| DatasetError::InvalidSentiment {
            line,
            value: sentiment_raw.to_string(),
        })?;

    Ok(Review {
        region: required_text(record, columns.region, REGION_COLUMN, line)?,
        city: required_text(record, columns.city, CITY_COLUMN, line)?,
        place_type: required_text(record, columns.place_type, PLACE_TYPE_COLUMN, line)?,
        place_name,
        place_category: cell(record, columns.place_category).to_string(),
        rating: parse_rating(cell(record, columns.rating), line)?,
        review_text: optional_text(record, Some(columns.review_text)),
        sentiment,
        compound: parse_compound(cell(record, columns.compound), line)?,
        topic: parse_topic(
            columns.topic.map(|i| cell(record, i)).unwrap_or(""),
            line,
        )?,
        cleaned_review: optional_text(record, columns.cleaned_review),
    })
}

/// Reads every row from `reader`, stopping at the first invalid one.
pub fn load_reviews_from_reader<R: Read>(
    reader: R,
    aliases: &PlaceAliases,
) -> Result<Vec<Review>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(DatasetError::from_csv)?.clone();
    let columns = ColumnIndex::from_headers(&headers)?;
    if columns.topic.is_none() {
        debug!("No '{}' column, reviews carry no topic assignment", TOPIC_COLUMN);
    }

    let mut reviews = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(DatasetError::from_csv)?;
        reviews.push(parse_record(&record, &columns, aliases)?);
    }
    Ok(reviews)
}

pub fn load_reviews(path: &Path, aliases: &PlaceAliases) -> Result<Vec<Review>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    load_reviews_from_reader(file, aliases)
}
