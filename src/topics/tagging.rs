//! Turning a topic's top words into human-readable labels.

use super::model::{TopicError, TopicModel, Vocabulary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicWord {
    pub word: String,
    pub weight: f64,
}

/// Ranks vocabulary indices of `topic` by weight, highest first, with ties
/// going to the lower index. Indices the vocabulary does not cover are
/// skipped, so fewer than `n` words may come back.
pub fn top_words(
    model: &dyn TopicModel,
    vocabulary: &Vocabulary,
    topic: usize,
    n: usize,
) -> Result<Vec<TopicWord>, TopicError> {
    let weights = model
        .topic_weights(topic)
        .ok_or(TopicError::UnknownTopic {
            topic,
            n_topics: model.n_topics(),
        })?;

    let mut indices: Vec<usize> = (0..weights.len()).collect();
    indices.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]).then(a.cmp(&b)));

    Ok(indices
        .into_iter()
        .take(n)
        .filter_map(|i| {
            vocabulary.word(i).map(|word| TopicWord {
                word: word.to_string(),
                weight: weights[i],
            })
        })
        .collect())
}

/// Keyword → category table used to tag topics.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordTagger {
    entries: Vec<(String, String)>,
}

impl Default for KeywordTagger {
    fn default() -> Self {
        KeywordTagger::new(
            [
                ("dirty", "Cleanliness"),
                ("clean", "Cleanliness"),
                ("bathroom", "Cleanliness"),
                ("slow", "Service Speed"),
                ("wait", "Service Speed"),
                ("delay", "Service Speed"),
                ("rude", "Staff Behavior"),
                ("staff", "Staff Behavior"),
                ("service", "Service Quality"),
                ("cashier", "Service Quality"),
                ("food", "Food Quality"),
                ("tasted", "Food Quality"),
                ("price", "Pricing"),
                ("expensive", "Pricing"),
                ("crowded", "Crowding"),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }
}

impl KeywordTagger {
    /// Keywords match case-insensitively; a repeated keyword keeps its
    /// first tag.
    pub fn new<I: IntoIterator<Item = (String, String)>>(entries: I) -> Self {
        let mut deduped: Vec<(String, String)> = Vec::new();
        for (keyword, tag) in entries {
            let keyword = keyword.to_lowercase();
            if !deduped.iter().any(|(k, _)| *k == keyword) {
                deduped.push((keyword, tag));
            }
        }
        KeywordTagger { entries: deduped }
    }

    pub fn tag_for(&self, word: &str) -> Option<&str> {
        let word = word.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == word)
            .map(|(_, v)| v.as_str())
    }

    /// Distinct tags in the order of the first word that produced them.
    pub fn tags<'a, I>(&self, words: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tags: Vec<String> = Vec::new();
        for word in words {
            if let Some(tag) = self.tag_for(word) {
                if !tags.iter().any(|t| t == tag) {
                    tags.push(tag.to_string());
                }
            }
        }
        tags
    }
}

/// Fires `message` when any of `keywords` is among a topic's words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keywords: Vec<String>,
    pub message: String,
}

impl KeywordRule {
    pub fn new(keywords: &[&str], message: &str) -> Self {
        KeywordRule {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            message: message.to_string(),
        }
    }

    pub fn fires(&self, words: &[&str]) -> bool {
        self.keywords
            .iter()
            .any(|k| words.iter().any(|w| w.eq_ignore_ascii_case(k)))
    }
}

pub fn default_hints() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new(
            &["slow", "wait"],
            "It seems that customers are complaining about delays or slow service.",
        ),
        KeywordRule::new(
            &["tasted", "food"],
            "There could be concerns regarding the quality of food or taste.",
        ),
        KeywordRule::new(
            &["cashier", "service"],
            "Issues with service and cashier experience seem to be mentioned frequently.",
        ),
        KeywordRule::new(
            &["improvements"],
            "Customers are asking for improvements in overall service or quality.",
        ),
    ]
}

pub fn default_recommendations() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new(&["rude", "staff", "service"], "Improve Staff Training"),
        KeywordRule::new(
            &["dirty", "bathroom", "clean"],
            "Enhance Cleanliness Protocols",
        ),
        KeywordRule::new(
            &["delay", "wait", "slow"],
            "Streamline Check-in/Check-out Processes",
        ),
        KeywordRule::new(
            &["no response", "not helpful"],
            "Better Communication with Guests",
        ),
    ]
}

pub fn fired_messages(rules: &[KeywordRule], words: &[&str]) -> Vec<String> {
    rules
        .iter()
        .filter(|r| r.fires(words))
        .map(|r| r.message.clone())
        .collect()
}

/// "Topic based on keywords: w1, w2. " followed by every fired hint.
pub fn interpret(words: &[&str], hints: &[KeywordRule]) -> String {
    let mut text = format!("Topic based on keywords: {}. ", words.join(", "));
    for message in fired_messages(hints, words) {
        text.push_str(&message);
        text.push(' ');
    }
    text.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topics::model::ComponentsModel;

    fn vocabulary() -> Vocabulary {
        Vocabulary::new(
            ["dirty", "room", "slow", "staff", "view"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    #[test]
    fn ranks_words_by_weight_with_index_tiebreak() {
        let model = ComponentsModel::new(vec![vec![0.5, 0.1, 0.9, 0.5, 0.0]]).unwrap();
        let words = top_words(&model, &vocabulary(), 0, 3).unwrap();
        let names: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(names, vec!["slow", "dirty", "staff"]);
        assert_eq!(words[0].weight, 0.9);
    }

    #[test]
    fn skips_indices_outside_vocabulary() {
        let model =
            ComponentsModel::new(vec![vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.9, 0.8]]).unwrap();
        let words = top_words(&model, &vocabulary(), 0, 3).unwrap();
        let names: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(names, vec!["view"]);
    }

    #[test]
    fn unknown_topic_is_an_error() {
        let model = ComponentsModel::new(vec![vec![0.1]]).unwrap();
        assert!(matches!(
            top_words(&model, &vocabulary(), 4, 10),
            Err(TopicError::UnknownTopic {
                topic: 4,
                n_topics: 1
            })
        ));
    }

    #[test]
    fn tags_in_order_of_first_match() {
        let tagger = KeywordTagger::default();
        let tags = tagger.tags(["room", "Slow", "dirty", "wait", "clean"]);
        assert_eq!(tags, vec!["Service Speed", "Cleanliness"]);
        assert!(tagger.tags(["view"]).is_empty());
    }

    #[test]
    fn custom_tag_table_replaces_defaults() {
        let tagger = KeywordTagger::new(vec![("Parking".to_string(), "Access".to_string())]);
        assert_eq!(tagger.tag_for("parking"), Some("Access"));
        assert_eq!(tagger.tag_for("dirty"), None);
    }

    #[test]
    fn repeated_keyword_keeps_first_tag() {
        let tagger = KeywordTagger::new(vec![
            ("Dirty".to_string(), "Cleanliness".to_string()),
            ("dirty".to_string(), "Hygiene".to_string()),
        ]);
        assert_eq!(tagger.tag_for("DIRTY"), Some("Cleanliness"));
        assert_eq!(tagger.tags(["dirty"]), vec!["Cleanliness"]);
    }

    #[test]
    fn interprets_topic_with_hints() {
        let text = interpret(&["slow", "food", "room"], &default_hints());
        assert_eq!(
            text,
            "Topic based on keywords: slow, food, room. \
             It seems that customers are complaining about delays or slow service. \
             There could be concerns regarding the quality of food or taste."
        );

        let plain = interpret(&["view"], &default_hints());
        assert_eq!(plain, "Topic based on keywords: view.");
    }

    #[test]
    fn recommends_actions() {
        let recommendations = fired_messages(&default_recommendations(), &["dirty", "staff"]);
        assert_eq!(
            recommendations,
            vec!["Improve Staff Training", "Enhance Cleanliness Protocols"]
        );
    }
}
