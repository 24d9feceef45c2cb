//! Exported topic-model artifacts.
//!
//! The model is fitted elsewhere and exported as JSON. Here it is only
//! read: the per-topic weight rows and the vocabulary they index into.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum TopicError {
    #[error("Topic artifact not found: {0:?}")]
    ArtifactNotFound(PathBuf),

    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Topic model has no topics")]
    EmptyModel,

    #[error("Topic {topic} has {found} weights, expected {expected}")]
    RaggedModel {
        topic: usize,
        expected: usize,
        found: usize,
    },

    #[error("Topic {topic} has a non-finite weight at index {index}")]
    NonFiniteWeight { topic: usize, index: usize },

    #[error("Unknown topic {topic}, model has {n_topics} topics")]
    UnknownTopic { topic: usize, n_topics: usize },

    #[error("Review {row} is assigned topic {topic}, model has {n_topics} topics")]
    AssignedTopicOutOfRange {
        row: usize,
        topic: usize,
        n_topics: usize,
    },
}

/// Opaque fitted model: a number of topics and, for each one, a weight per
/// vocabulary index.
pub trait TopicModel: Send + Sync {
    fn n_topics(&self) -> usize;

    fn topic_weights(&self, topic: usize) -> Option<&[f64]>;
}

/// Dense topic × term matrix, as exported from a fitted LDA/NMF model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComponentsModel {
    components: Vec<Vec<f64>>,
}

impl ComponentsModel {
    pub fn new(components: Vec<Vec<f64>>) -> Result<Self, TopicError> {
        let expected = components.first().map(Vec::len).ok_or(TopicError::EmptyModel)?;
        for (topic, row) in components.iter().enumerate() {
            if row.len() != expected {
                return Err(TopicError::RaggedModel {
                    topic,
                    expected,
                    found: row.len(),
                });
            }
            if let Some(index) = row.iter().position(|w| !w.is_finite()) {
                return Err(TopicError::NonFiniteWeight { topic, index });
            }
        }
        Ok(ComponentsModel { components })
    }

    pub fn load(path: &Path) -> Result<Self, TopicError> {
        let raw: ComponentsModel = read_json(path)?;
        let model = ComponentsModel::new(raw.components)?;
        info!(
            "Loaded topic model with {} topics over {} terms from {:?}",
            model.n_topics(),
            model.n_terms(),
            path
        );
        Ok(model)
    }

    pub fn n_terms(&self) -> usize {
        self.components.first().map(Vec::len).unwrap_or(0)
    }
}

impl TopicModel for ComponentsModel {
    fn n_topics(&self) -> usize {
        self.components.len()
    }

    fn topic_weights(&self, topic: usize) -> Option<&[f64]> {
        self.components.get(topic).map(Vec::as_slice)
    }
}

/// Index → word mapping of the vectorizer the model was fitted with.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Vocabulary {
    feature_names: Vec<String>,
}

impl Vocabulary {
    pub fn new(feature_names: Vec<String>) -> Self {
        Vocabulary { feature_names }
    }

    pub fn load(path: &Path) -> Result<Self, TopicError> {
        let vocabulary: Vocabulary = read_json(path)?;
        info!(
            "Loaded vocabulary with {} terms from {:?}",
            vocabulary.len(),
            path
        );
        Ok(vocabulary)
    }

    pub fn word(&self, index: usize) -> Option<&str> {
        self.feature_names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.feature_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feature_names.is_empty()
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, TopicError> {
    if !path.exists() {
        return Err(TopicError::ArtifactNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| TopicError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| TopicError::Json {
        path: path.to_path_buf(),
        source,
    })
}
