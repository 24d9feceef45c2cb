//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all insights-server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP test client
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

/// Builds the `filter` body field from a region selection.
fn region_filter(regions: &[&str]) -> Value {
    json!({ "regions": regions })
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POSTs a raw JSON body, for requests the typed helpers don't cover.
    pub async fn post_json(&self, path: &str, body: Value) -> Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .expect("POST request failed")
    }

    // ========================================================================
    // Server and Dataset Endpoints
    // ========================================================================

    /// GET /
    pub async fn get_home(&self) -> Response {
        self.get("/").await
    }

    /// GET /v1/dataset
    pub async fn get_dataset_stats(&self) -> Response {
        self.get("/v1/dataset").await
    }

    // ========================================================================
    // Insight Endpoints
    // ========================================================================

    /// POST /v1/insights/filter-options
    pub async fn post_filter_options(&self, filter: Value) -> Response {
        self.post_json("/v1/insights/filter-options", json!({ "filter": filter }))
            .await
    }

    /// POST /v1/insights/reviews
    pub async fn post_reviews(&self, regions: &[&str], limit: Option<usize>) -> Response {
        self.post_json(
            "/v1/insights/reviews",
            json!({ "filter": region_filter(regions), "limit": limit }),
        )
        .await
    }

    /// POST /v1/insights/sentiment
    pub async fn post_sentiment(&self, regions: &[&str]) -> Response {
        self.post_json(
            "/v1/insights/sentiment",
            json!({ "filter": region_filter(regions) }),
        )
        .await
    }

    /// POST /v1/insights/sentiment-by
    pub async fn post_sentiment_by(&self, group_by: &str) -> Response {
        self.post_json("/v1/insights/sentiment-by", json!({ "group_by": group_by }))
            .await
    }

    /// POST /v1/insights/compare-regions
    pub async fn post_compare_regions(&self, first: Value, second: Value) -> Response {
        self.post_json(
            "/v1/insights/compare-regions",
            json!({ "first": first, "second": second }),
        )
        .await
    }

    /// POST /v1/insights/ratings
    pub async fn post_ratings(&self, group_by: &[&str]) -> Response {
        self.post_json("/v1/insights/ratings", json!({ "group_by": group_by }))
            .await
    }

    /// POST /v1/insights/places/top
    pub async fn post_top_places(&self, limit: usize) -> Response {
        self.post_json("/v1/insights/places/top", json!({ "limit": limit }))
            .await
    }

    /// POST /v1/insights/places/bottom
    pub async fn post_bottom_places(&self, limit: usize) -> Response {
        self.post_json("/v1/insights/places/bottom", json!({ "limit": limit }))
            .await
    }

    /// POST /v1/insights/places/negatives
    pub async fn post_negative_places(&self) -> Response {
        self.post_json("/v1/insights/places/negatives", json!({}))
            .await
    }

    /// POST /v1/insights/attention
    pub async fn post_attention(&self, regions: &[&str]) -> Response {
        self.post_json(
            "/v1/insights/attention",
            json!({ "filter": region_filter(regions) }),
        )
        .await
    }

    /// POST /v1/insights/attention/needed
    pub async fn post_attention_needed(&self) -> Response {
        self.post_json("/v1/insights/attention/needed", json!({}))
            .await
    }

    /// POST /v1/insights/attention/regions
    pub async fn post_attention_regions(&self) -> Response {
        self.post_json("/v1/insights/attention/regions", json!({}))
            .await
    }

    /// POST /v1/insights/mismatches
    pub async fn post_mismatches(&self) -> Response {
        self.post_json("/v1/insights/mismatches", json!({})).await
    }

    // ========================================================================
    // Topic Endpoints
    // ========================================================================

    /// GET /v1/topics
    pub async fn get_topics(&self) -> Response {
        self.get("/v1/topics").await
    }

    /// GET /v1/topics/{index}
    pub async fn get_topic(&self, index: usize, words: Option<usize>) -> Response {
        match words {
            Some(words) => {
                self.get(&format!("/v1/topics/{}?words={}", index, words))
                    .await
            }
            None => self.get(&format!("/v1/topics/{}", index)).await,
        }
    }

    /// POST /v1/topics/distribution
    pub async fn post_topic_distribution(&self, regions: &[&str]) -> Response {
        self.post_json(
            "/v1/topics/distribution",
            json!({ "filter": region_filter(regions) }),
        )
        .await
    }

    /// POST /v1/topics/city-tags
    pub async fn post_city_tags(&self) -> Response {
        self.post_json("/v1/topics/city-tags", json!({})).await
    }
}
