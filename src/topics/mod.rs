//! Topic descriptions built from an exported topic model.

mod insights;
mod model;
mod tagging;

pub use insights::{
    topic_distribution, CityTags, TopicInsights, TopicShare, TopicSummary, DEFAULT_TOP_WORDS,
};
pub use model::{ComponentsModel, TopicError, TopicModel, Vocabulary};
pub use tagging::{
    default_hints, default_recommendations, fired_messages, interpret, top_words, KeywordRule,
    KeywordTagger, TopicWord,
};
