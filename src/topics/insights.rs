use super::model::{TopicError, TopicModel, Vocabulary};
use super::tagging::{
    default_hints, default_recommendations, fired_messages, interpret, top_words, KeywordRule,
    KeywordTagger, TopicWord,
};
use crate::insights::percentage;
use crate::reviews::Review;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

pub const DEFAULT_TOP_WORDS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicSummary {
    pub topic: usize,
    pub words: Vec<TopicWord>,
    pub tags: Vec<String>,
    pub interpretation: String,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicShare {
    pub topic: usize,
    pub reviews: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityTags {
    pub region: String,
    pub city: String,
    pub topics: Vec<usize>,
    pub tags: Vec<String>,
}

/// Review count and share per assigned topic, ascending by topic index.
/// Reviews without a topic are left out of both counts.
pub fn topic_distribution(rows: &[&Review]) -> Vec<TopicShare> {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for topic in rows.iter().filter_map(|r| r.topic) {
        *counts.entry(topic).or_default() += 1;
    }
    let assigned: usize = counts.values().sum();
    counts
        .into_iter()
        .map(|(topic, reviews)| TopicShare {
            topic,
            reviews,
            percentage: percentage(reviews, assigned),
        })
        .collect()
}

/// Everything needed to describe topics: the fitted model, its vocabulary
/// and the keyword tables. Built once at startup and shared.
pub struct TopicInsights {
    model: Arc<dyn TopicModel>,
    vocabulary: Vocabulary,
    tagger: KeywordTagger,
    hints: Vec<KeywordRule>,
    recommendations: Vec<KeywordRule>,
    top_n: usize,
}

impl TopicInsights {
    pub fn new(model: Arc<dyn TopicModel>, vocabulary: Vocabulary) -> Self {
        TopicInsights {
            model,
            vocabulary,
            tagger: KeywordTagger::default(),
            hints: default_hints(),
            recommendations: default_recommendations(),
            top_n: DEFAULT_TOP_WORDS,
        }
    }

    pub fn with_tagger(mut self, tagger: KeywordTagger) -> Self {
        self.tagger = tagger;
        self
    }

    pub fn with_hints(mut self, hints: Vec<KeywordRule>) -> Self {
        self.hints = hints;
        self
    }

    pub fn with_recommendations(mut self, recommendations: Vec<KeywordRule>) -> Self {
        self.recommendations = recommendations;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn n_topics(&self) -> usize {
        self.model.n_topics()
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn top_words(&self, topic: usize, n: usize) -> Result<Vec<TopicWord>, TopicError> {
        top_words(self.model.as_ref(), &self.vocabulary, topic, n)
    }

    pub fn tags(&self, topic: usize) -> Result<Vec<String>, TopicError> {
        let words = self.top_words(topic, self.top_n)?;
        Ok(self.tagger.tags(words.iter().map(|w| w.word.as_str())))
    }

    pub fn summarize(&self, topic: usize, n: Option<usize>) -> Result<TopicSummary, TopicError> {
        let words = self.top_words(topic, n.unwrap_or(self.top_n))?;
        let names: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
        Ok(TopicSummary {
            topic,
            tags: self.tagger.tags(names.iter().copied()),
            interpretation: interpret(&names, &self.hints),
            recommendations: fired_messages(&self.recommendations, &names),
            words,
        })
    }

    /// Checks that every assigned topic exists in the model. `row` in the
    /// error is the 1-based data row, header excluded.
    pub fn check_assignments(&self, reviews: &[Review]) -> Result<(), TopicError> {
        let n_topics = self.n_topics();
        for (i, review) in reviews.iter().enumerate() {
            if let Some(topic) = review.topic.filter(|&t| t >= n_topics) {
                return Err(TopicError::AssignedTopicOutOfRange {
                    row: i + 1,
                    topic,
                    n_topics,
                });
            }
        }
        Ok(())
    }

    /// For each (Region, City) in first-seen order, the topics assigned to
    /// its reviews and the union of their tags.
    pub fn city_tags(&self, rows: &[&Review]) -> Result<Vec<CityTags>, TopicError> {
        let mut tag_cache: HashMap<usize, Vec<String>> = HashMap::new();
        let mut index: HashMap<(&str, &str), usize> = HashMap::new();
        let mut cities: Vec<CityTags> = Vec::new();

        for row in rows {
            let Some(topic) = row.topic else {
                continue;
            };
            if !tag_cache.contains_key(&topic) {
                tag_cache.insert(topic, self.tags(topic)?);
            }
            let key = (row.region.as_str(), row.city.as_str());
            let i = *index.entry(key).or_insert_with(|| {
                cities.push(CityTags {
                    region: row.region.clone(),
                    city: row.city.clone(),
                    topics: Vec::new(),
                    tags: Vec::new(),
                });
                cities.len() - 1
            });
            let entry = &mut cities[i];
            if !entry.topics.contains(&topic) {
                entry.topics.push(topic);
            }
            for tag in &tag_cache[&topic] {
                if !entry.tags.contains(tag) {
                    entry.tags.push(tag.clone());
                }
            }
        }
        Ok(cities)
    }
}
