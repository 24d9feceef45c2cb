use crate::reviews::Review;
use serde::Serialize;

/// A review is a mismatch when its text reads negative (`compound` below
/// `max_compound`) while its star rating is at least `min_rating`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MismatchSettings {
    pub max_compound: f64,
    pub min_rating: f64,
}

impl Default for MismatchSettings {
    fn default() -> Self {
        Self {
            max_compound: 0.0,
            min_rating: 4.0,
        }
    }
}

pub fn is_mismatch(review: &Review, settings: &MismatchSettings) -> bool {
    review.compound < settings.max_compound && review.rating >= settings.min_rating
}

pub fn find_mismatches<'a>(
    rows: &[&'a Review],
    settings: &MismatchSettings,
    limit: Option<usize>,
) -> Vec<&'a Review> {
    rows.iter()
        .copied()
        .filter(|r| is_mismatch(r, settings))
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}
