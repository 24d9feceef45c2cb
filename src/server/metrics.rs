use crate::reviews::{ReviewDataset, SentimentLabel};
use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::{Duration, Instant};

/// Metric name prefix for all review-insights metrics
const PREFIX: &str = "review_insights";

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    pub static ref DATASET_REVIEWS: GaugeVec = GaugeVec::new(
        Opts::new(format!("{PREFIX}_dataset_reviews"), "Loaded reviews by sentiment label"),
        &["sentiment"]
    ).expect("Failed to create dataset_reviews metric");

    pub static ref PIPELINE_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_pipeline_duration_seconds"),
            "Time spent computing a derived table"
        )
        .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        &["stage"]
    ).expect("Failed to create pipeline_duration_seconds metric");

    pub static ref ERRORS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_errors_total"), "Total errors by type and endpoint"),
        &["error_type", "endpoint"]
    ).expect("Failed to create errors_total metric");
}

/// Register all metrics. Registering twice is harmless, which tests rely on.
pub fn init_metrics() {
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(DATASET_REVIEWS.clone()));
    let _ = REGISTRY.register(Box::new(PIPELINE_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(ERRORS_TOTAL.clone()));

    tracing::info!("Metrics system initialized successfully");
}

pub fn init_dataset_metrics(dataset: &ReviewDataset) {
    for label in SentimentLabel::ALL {
        DATASET_REVIEWS
            .with_label_values(&[label.as_str()])
            .set(dataset.count_by_sentiment(label) as f64);
    }
    tracing::info!("Dataset metrics initialized: {} reviews", dataset.len());
}

/// Collapses per-resource paths so label cardinality stays bounded.
pub fn categorize_endpoint(path: &str) -> &str {
    match path.strip_prefix("/v1/topics/") {
        Some(rest) if rest.parse::<usize>().is_ok() => "/v1/topics/{index}",
        Some(_) => path,
        None if path.starts_with("/v1/") || path == "/" => path,
        None => "other",
    }
}

pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

/// Runs `f` and records how long the `stage` took.
pub fn time_stage<T>(stage: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let result = f();
    PIPELINE_DURATION_SECONDS
        .with_label_values(&[stage])
        .observe(start.elapsed().as_secs_f64());
    result
}

pub fn record_error(error_type: &str, endpoint: &str) {
    ERRORS_TOTAL
        .with_label_values(&[error_type, endpoint])
        .inc();
}

pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = vec![];

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_default();
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reviews::Review;

    fn has_metric(name: &str) -> bool {
        REGISTRY
            .gather()
            .iter()
            .any(|m| m.get_name() == format!("{PREFIX}_{name}"))
    }

    #[test]
    fn test_metrics_initialization() {
        init_metrics();
        record_http_request("GET", "/", 200, Duration::from_millis(1));
        assert!(has_metric("http_requests_total"));
    }

    #[test]
    fn test_time_stage_records_and_returns() {
        init_metrics();
        let value = time_stage("filter", || 41 + 1);
        assert_eq!(value, 42);
        assert!(has_metric("pipeline_duration_seconds"));
    }

    #[test]
    fn test_dataset_metrics() {
        init_metrics();
        let dataset = ReviewDataset::from_reviews(vec![Review {
            region: "Central".to_string(),
            city: "Riyadh".to_string(),
            place_type: "Museum".to_string(),
            place_name: "A".to_string(),
            place_category: String::new(),
            rating: 4.0,
            review_text: None,
            sentiment: SentimentLabel::Positive,
            compound: 0.5,
            topic: None,
            cleaned_review: None,
        }]);
        init_dataset_metrics(&dataset);
        assert!(has_metric("dataset_reviews"));
    }

    #[test]
    fn test_record_error() {
        init_metrics();
        record_error("unknown_topic", "/v1/topics/{index}");
        assert!(has_metric("errors_total"));
    }

    #[test]
    fn test_categorize_endpoint() {
        assert_eq!(categorize_endpoint("/v1/topics/3"), "/v1/topics/{index}");
        assert_eq!(categorize_endpoint("/v1/topics/distribution"), "/v1/topics/distribution");
        assert_eq!(categorize_endpoint("/v1/insights/attention"), "/v1/insights/attention");
        assert_eq!(categorize_endpoint("/favicon.ico"), "other");
    }
}
