//! Cascading Region → City → Place Type → Place Name selection.

use crate::reviews::Review;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Selected values per level. An empty level means "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelection {
    pub regions: Vec<String>,
    pub cities: Vec<String>,
    pub place_types: Vec<String>,
    pub place_names: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterLevel {
    Region,
    City,
    PlaceType,
    PlaceName,
}

impl FilterLevel {
    fn value(self, review: &Review) -> &str {
        match self {
            FilterLevel::Region => &review.region,
            FilterLevel::City => &review.city,
            FilterLevel::PlaceType => &review.place_type,
            FilterLevel::PlaceName => &review.place_name,
        }
    }
}

/// Distinct values available at each level given the selections above it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub regions: Vec<String>,
    pub cities: Vec<String>,
    pub place_types: Vec<String>,
    pub place_names: Vec<String>,
}

fn matches(selected: &[String], value: &str) -> bool {
    selected.is_empty() || selected.iter().any(|s| s == value)
}

fn distinct_values<'a>(rows: &[&'a Review], level: FilterLevel) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .map(|r| level.value(r))
        .filter(|v| seen.insert(*v))
        .map(String::from)
        .collect()
}

impl FilterSelection {
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
            && self.cities.is_empty()
            && self.place_types.is_empty()
            && self.place_names.is_empty()
    }

    pub fn selected(&self, level: FilterLevel) -> &[String] {
        match level {
            FilterLevel::Region => &self.regions,
            FilterLevel::City => &self.cities,
            FilterLevel::PlaceType => &self.place_types,
            FilterLevel::PlaceName => &self.place_names,
        }
    }

    /// Replaces the selection at `level`. Levels below it are left alone; a
    /// value that no longer exists under the new parent just matches nothing.
    pub fn set(&mut self, level: FilterLevel, values: Vec<String>) {
        match level {
            FilterLevel::Region => self.regions = values,
            FilterLevel::City => self.cities = values,
            FilterLevel::PlaceType => self.place_types = values,
            FilterLevel::PlaceName => self.place_names = values,
        }
    }

    pub fn matches(&self, review: &Review) -> bool {
        matches(&self.regions, &review.region)
            && matches(&self.cities, &review.city)
            && matches(&self.place_types, &review.place_type)
            && matches(&self.place_names, &review.place_name)
    }

    /// Rows satisfying every non-empty level, in input order.
    pub fn apply<'a, I>(&self, rows: I) -> Vec<&'a Review>
    where
        I: IntoIterator<Item = &'a Review>,
    {
        rows.into_iter().filter(|r| self.matches(r)).collect()
    }

    pub fn options<'a, I>(&self, rows: I) -> FilterOptions
    where
        I: IntoIterator<Item = &'a Review>,
    {
        let all: Vec<&Review> = rows.into_iter().collect();
        let regions = distinct_values(&all, FilterLevel::Region);

        let by_region: Vec<&Review> = all
            .into_iter()
            .filter(|r| matches(&self.regions, &r.region))
            .collect();
        let cities = distinct_values(&by_region, FilterLevel::City);

        let by_city: Vec<&Review> = by_region
            .into_iter()
            .filter(|r| matches(&self.cities, &r.city))
            .collect();
        let place_types = distinct_values(&by_city, FilterLevel::PlaceType);

        let by_type: Vec<&Review> = by_city
            .into_iter()
            .filter(|r| matches(&self.place_types, &r.place_type))
            .collect();
        let place_names = distinct_values(&by_type, FilterLevel::PlaceName);

        FilterOptions {
            regions,
            cities,
            place_types,
            place_names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reviews::test_support::review;
    use crate::reviews::SentimentLabel::*;

    fn sample() -> Vec<Review> {
        vec![
            review("Central", "Riyadh", "Museum", "National Museum", 4.0, Positive, 0.6),
            review("West", "Jeddah", "Restaurant", "Sea Grill", 2.0, Negative, -0.4),
            review("Central", "Riyadh", "Restaurant", "Najd Village", 5.0, Positive, 0.9),
            review("Central", "Buraydah", "Museum", "Date Museum", 3.0, Neutral, 0.0),
            review("West", "Taif", "Park", "Rose Garden", 4.5, Positive, 0.7),
        ]
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_selection_keeps_everything() {
        let rows = sample();
        let selection = FilterSelection::default();
        assert!(selection.is_empty());
        assert_eq!(selection.apply(&rows).len(), rows.len());
    }

    #[test]
    fn filters_on_all_non_empty_levels_preserving_order() {
        let rows = sample();
        let selection = FilterSelection {
            regions: strings(&["Central"]),
            place_types: strings(&["Museum", "Restaurant"]),
            ..Default::default()
        };
        let names: Vec<&str> = selection
            .apply(&rows)
            .iter()
            .map(|r| r.place_name.as_str())
            .collect();
        assert_eq!(names, vec!["National Museum", "Najd Village", "Date Museum"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let rows = sample();
        let selection = FilterSelection {
            cities: strings(&["Riyadh", "Taif"]),
            ..Default::default()
        };
        let once = selection.apply(&rows);
        let twice = selection.apply(once.iter().copied());
        assert_eq!(once, twice);
    }

    #[test]
    fn options_cascade_from_higher_levels() {
        let rows = sample();
        let selection = FilterSelection {
            regions: strings(&["Central"]),
            cities: strings(&["Riyadh"]),
            ..Default::default()
        };
        let options = selection.options(&rows);

        assert_eq!(options.regions, strings(&["Central", "West"]));
        assert_eq!(options.cities, strings(&["Riyadh", "Buraydah"]));
        assert_eq!(options.place_types, strings(&["Museum", "Restaurant"]));
        assert_eq!(options.place_names, strings(&["National Museum", "Najd Village"]));
    }

    #[test]
    fn stale_selection_matches_nothing() {
        let rows = sample();
        let mut selection = FilterSelection {
            regions: strings(&["Central"]),
            cities: strings(&["Riyadh"]),
            ..Default::default()
        };
        selection.set(FilterLevel::Region, strings(&["West"]));

        assert_eq!(selection.selected(FilterLevel::City), strings(&["Riyadh"]));
        assert!(selection.apply(&rows).is_empty());
        assert!(selection.options(&rows).place_types.is_empty());
    }
}
