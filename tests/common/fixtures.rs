//! Test fixture creation for the reviews file and topic artifacts

use super::constants::*;
use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const REVIEWS_HEADER: &str = "Region,City,Place Type,Place Name,Place Category,Rating,Review Text,Sentiment Label,compound,Topic,Cleaned Review";

/// Creates a temporary reviews CSV with 8 rows over 3 regions.
/// Returns (temp_dir, reviews_path)
pub fn create_test_reviews() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let rows = [
        format!("{REGION_CENTRAL},{CITY_RIYADH},Museum,{PLACE_MUSEUM},Culture,5,\"Great museum, loved it\",positive,0.8,1,great museum loved"),
        format!("{REGION_CENTRAL},{CITY_RIYADH},Museum,{PLACE_MUSEUM},Culture,5,Staff were rude,negative,-0.6,0,staff rude"),
        format!("{REGION_CENTRAL},{CITY_RIYADH},Restaurant,{PLACE_RESTAURANT},Food,2,Food was slow,negative,-0.8,0,food slow"),
        format!("{REGION_CENTRAL},{CITY_RIYADH},Restaurant,{PLACE_RESTAURANT},Food,3,Average,neutral,0.0,,"),
        format!("{REGION_WEST},{CITY_JEDDAH},Beach,{PLACE_BEACH},Nature,5,Beautiful sea view,positive,0.9,1,beautiful sea view"),
        format!("{REGION_WEST},{CITY_JEDDAH},Beach,{PLACE_BEACH},Nature,4,Nice but crowded,positive,0.3,1.0,nice crowded"),
        format!("{REGION_EAST},{CITY_DAMMAM},Park,{PLACE_PARK},Nature,1,Dirty bathrooms,negative,-0.7,0,dirty bathroom"),
        format!("{REGION_EAST},{CITY_DAMMAM},Park,{PLACE_PARK},Nature,3,Dirty and crowded,negative,-0.5,0,dirty crowded"),
    ];

    let mut content = String::from(REVIEWS_HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(&row);
    }
    content.push('\n');

    let reviews_path = dir.path().join("reviews.csv");
    fs::write(&reviews_path, content)?;
    Ok((dir, reviews_path))
}

/// Writes a 2-topic model and its vocabulary into `dir`.
/// Topic 0 leans on cleanliness and speed words, topic 1 on the view.
/// Returns (model_path, vocabulary_path)
pub fn create_test_topic_model(dir: &TempDir) -> Result<(PathBuf, PathBuf)> {
    let model_path = dir.path().join("topic_model.json");
    let vocabulary_path = dir.path().join("vocabulary.json");

    let model = serde_json::json!({
        "components": [
            [0.9, 0.7, 0.5, 0.3, 0.01, 0.02, 0.4],
            [0.01, 0.02, 0.03, 0.05, 0.9, 0.8, 0.1],
        ]
    });
    let vocabulary = serde_json::json!({
        "feature_names": ["dirty", "bathroom", "slow", "staff", "view", "sea", "food"]
    });

    fs::write(&model_path, serde_json::to_vec(&model)?)?;
    fs::write(&vocabulary_path, serde_json::to_vec(&vocabulary)?)?;
    Ok((model_path, vocabulary_path))
}
