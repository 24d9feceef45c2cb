mod file_config;

pub use file_config::{AttentionConfig, FileConfig, MismatchConfig, TopicsConfig};

use crate::insights::{AttentionSettings, MismatchSettings};
use crate::reviews::{PlaceAliases, Review};
use crate::server::config::DEFAULT_TABLE_LIMIT;
use crate::server::{RequestsLoggingLevel, ServerConfig};
use crate::topics::{
    default_hints, default_recommendations, ComponentsModel, KeywordRule, KeywordTagger,
    TopicError, TopicInsights, Vocabulary, DEFAULT_TOP_WORDS,
};
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub reviews_path: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    pub topic_model_path: Option<PathBuf>,
    pub vocabulary_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub reviews_path: PathBuf,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    pub default_limit: usize,

    pub topics: Option<TopicSettings>,
    pub attention: AttentionSettings,
    pub mismatch: MismatchSettings,

    pub keyword_tags: Option<HashMap<String, String>>,
    pub hints: Vec<KeywordRule>,
    pub recommendations: Vec<KeywordRule>,
    pub place_aliases: PlaceAliases,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopicSettings {
    pub model_path: PathBuf,
    pub vocabulary_path: PathBuf,
    pub top_words: usize,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let reviews_path = file
            .reviews_path
            .map(PathBuf::from)
            .or_else(|| cli.reviews_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "reviews_path must be specified via the command line or in config file"
                )
            })?;

        if !reviews_path.exists() {
            bail!("Reviews file does not exist: {:?}", reviews_path);
        }
        if !reviews_path.is_file() {
            bail!("reviews_path is not a file: {:?}", reviews_path);
        }

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let content_cache_age_sec = file
            .content_cache_age_sec
            .unwrap_or(cli.content_cache_age_sec);
        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());
        let default_limit = file.default_limit.unwrap_or(DEFAULT_TABLE_LIMIT);

        // [topics] section takes precedence over CLI args
        let topics_file = file.topics.unwrap_or_default();
        let model_path = topics_file
            .model_path
            .map(PathBuf::from)
            .or_else(|| cli.topic_model_path.clone());
        let vocabulary_path = topics_file
            .vocabulary_path
            .map(PathBuf::from)
            .or_else(|| cli.vocabulary_path.clone());
        let top_words = topics_file.top_words.unwrap_or(DEFAULT_TOP_WORDS);
        if top_words == 0 {
            bail!("topics.top_words must be greater than 0");
        }
        let topics = match (model_path, vocabulary_path) {
            (Some(model_path), Some(vocabulary_path)) => Some(TopicSettings {
                model_path,
                vocabulary_path,
                top_words,
            }),
            (None, None) => None,
            _ => bail!("Both the topic model path and the vocabulary path must be provided together"),
        };

        let attention_defaults = AttentionSettings::default();
        let attention_file = file.attention.unwrap_or_default();
        let attention = AttentionSettings {
            baseline_rating: attention_file
                .baseline_rating
                .unwrap_or(attention_defaults.baseline_rating),
            min_negative_rate: attention_file
                .min_negative_rate
                .unwrap_or(attention_defaults.min_negative_rate),
            max_rating: attention_file
                .max_rating
                .unwrap_or(attention_defaults.max_rating),
            top_n: attention_file.top_n.unwrap_or(attention_defaults.top_n),
        };
        if !(0.0..=100.0).contains(&attention.min_negative_rate) {
            bail!(
                "attention.min_negative_rate must be a percentage, got {}",
                attention.min_negative_rate
            );
        }
        if !attention.baseline_rating.is_finite() || !attention.max_rating.is_finite() {
            bail!("attention ratings must be finite numbers");
        }

        let mismatch_defaults = MismatchSettings::default();
        let mismatch_file = file.mismatch.unwrap_or_default();
        let mismatch = MismatchSettings {
            max_compound: mismatch_file
                .max_compound
                .unwrap_or(mismatch_defaults.max_compound),
            min_rating: mismatch_file
                .min_rating
                .unwrap_or(mismatch_defaults.min_rating),
        };

        if let Some(tags) = &file.keyword_tags {
            let mut keywords: Vec<String> = tags.keys().map(|k| k.to_lowercase()).collect();
            keywords.sort();
            if let Some(pair) = keywords.windows(2).find(|pair| pair[0] == pair[1]) {
                bail!(
                    "keyword_tags defines '{}' more than once (keywords are case-insensitive)",
                    pair[0]
                );
            }
        }

        Ok(Self {
            reviews_path,
            port,
            metrics_port,
            logging_level,
            content_cache_age_sec,
            frontend_dir_path,
            default_limit,
            topics,
            attention,
            mismatch,
            keyword_tags: file.keyword_tags,
            hints: file.hints.unwrap_or_else(default_hints),
            recommendations: file.recommendations.unwrap_or_else(default_recommendations),
            place_aliases: file.place_aliases.unwrap_or_default(),
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            port: self.port,
            content_cache_age_sec: self.content_cache_age_sec,
            frontend_dir_path: self.frontend_dir_path.clone(),
            default_limit: self.default_limit,
            attention: self.attention.clone(),
            mismatch: self.mismatch.clone(),
        }
    }

    pub fn keyword_tagger(&self) -> KeywordTagger {
        match &self.keyword_tags {
            Some(tags) => KeywordTagger::new(tags.clone()),
            None => KeywordTagger::default(),
        }
    }

    /// Loads the topic artifacts, if configured, and checks every topic
    /// assigned in `reviews` against the model. A configured but missing
    /// artifact is an error rather than a silently disabled feature.
    pub fn load_topic_insights(
        &self,
        reviews: &[Review],
    ) -> Result<Option<TopicInsights>, TopicError> {
        let Some(settings) = &self.topics else {
            info!("No topic model configured, topic insights disabled");
            return Ok(None);
        };
        let model = ComponentsModel::load(&settings.model_path)?;
        let vocabulary = Vocabulary::load(&settings.vocabulary_path)?;
        let insights = TopicInsights::new(Arc::new(model), vocabulary)
            .with_tagger(self.keyword_tagger())
            .with_hints(self.hints.clone())
            .with_recommendations(self.recommendations.clone())
            .with_top_n(settings.top_words);
        insights.check_assignments(reviews)?;
        Ok(Some(insights))
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
