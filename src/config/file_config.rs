use crate::topics::KeywordRule;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub reviews_path: Option<String>,
    pub port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub logging_level: Option<String>,
    pub content_cache_age_sec: Option<usize>,
    pub frontend_dir_path: Option<String>,
    pub default_limit: Option<usize>,

    // Pipeline settings
    pub topics: Option<TopicsConfig>,
    pub attention: Option<AttentionConfig>,
    pub mismatch: Option<MismatchConfig>,

    // Lookup tables
    pub keyword_tags: Option<HashMap<String, String>>,
    pub hints: Option<Vec<KeywordRule>>,
    pub recommendations: Option<Vec<KeywordRule>>,
    pub place_aliases: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct TopicsConfig {
    pub model_path: Option<String>,
    pub vocabulary_path: Option<String>,
    pub top_words: Option<usize>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct AttentionConfig {
    pub baseline_rating: Option<f64>,
    pub min_negative_rate: Option<f64>,
    pub max_rating: Option<f64>,
    pub top_n: Option<usize>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct MismatchConfig {
    pub max_compound: Option<f64>,
    pub min_rating: Option<f64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_file() {
        let content = r#"
            reviews_path = "/data/reviews.csv"
            port = 4000
            logging_level = "headers"

            [topics]
            model_path = "/data/lda.json"
            vocabulary_path = "/data/vocabulary.json"
            top_words = 8

            [attention]
            baseline_rating = 5.0
            min_negative_rate = 25.0

            [mismatch]
            min_rating = 4.5

            [keyword_tags]
            parking = "Access"

            [[hints]]
            keywords = ["parking"]
            message = "Visitors struggle to find parking."

            [place_aliases]
            "مطعم زاوية حكاية" = "Hekaya Restaurant"
        "#;
        let config: FileConfig = toml::from_str(content).unwrap();

        assert_eq!(config.reviews_path.as_deref(), Some("/data/reviews.csv"));
        assert_eq!(config.port, Some(4000));
        assert_eq!(config.metrics_port, None);
        let topics = config.topics.unwrap();
        assert_eq!(topics.top_words, Some(8));
        let attention = config.attention.unwrap();
        assert_eq!(attention.baseline_rating, Some(5.0));
        assert_eq!(attention.max_rating, None);
        assert_eq!(config.mismatch.unwrap().min_rating, Some(4.5));
        assert_eq!(
            config.keyword_tags.unwrap().get("parking").map(String::as_str),
            Some("Access")
        );
        assert_eq!(config.hints.unwrap()[0].keywords, vec!["parking"]);
        assert_eq!(config.place_aliases.unwrap().len(), 1);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.reviews_path.is_none());
        assert!(config.topics.is_none());
        assert!(config.keyword_tags.is_none());
    }

    #[test]
    fn parses_example_file() {
        let config: FileConfig =
            toml::from_str(include_str!("../../insights.example.toml")).unwrap();
        assert_eq!(config.port, Some(3001));
        assert_eq!(config.recommendations.unwrap().len(), 2);
        assert_eq!(
            config
                .place_aliases
                .unwrap()
                .get("King Abdulaziz Center for World Culture (Ithra)")
                .map(String::as_str),
            Some("Ithra")
        );
    }
}
