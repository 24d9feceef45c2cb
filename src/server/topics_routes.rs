//! `/v1/topics` routes. They answer 503 when no topic model was loaded.

use super::metrics::{record_error, time_stage};
use super::state::ServerState;
use crate::insights::{FilterSelection, InsightTable};
use crate::topics::{topic_distribution, TopicError, TopicInsights};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct TopicFilterQuery {
    pub filter: FilterSelection,
}

#[derive(Deserialize, Debug)]
pub struct WordsParams {
    pub words: Option<usize>,
}

#[derive(Serialize)]
struct TopicsOverview {
    n_topics: usize,
    top_words: usize,
}

fn topics_or_unavailable(state: &ServerState) -> Result<Arc<TopicInsights>, Response> {
    state.topics.clone().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "No topic model configured",
        )
            .into_response()
    })
}

fn topic_error_response(err: TopicError, endpoint: &str) -> Response {
    match err {
        TopicError::UnknownTopic { .. } => {
            record_error("unknown_topic", endpoint);
            (StatusCode::NOT_FOUND, err.to_string()).into_response()
        }
        other => {
            error!("Topic lookup failed: {}", other);
            record_error("topic", endpoint);
            (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
        }
    }
}

async fn overview(State(state): State<ServerState>) -> Response {
    let topics = match topics_or_unavailable(&state) {
        Ok(topics) => topics,
        Err(response) => return response,
    };
    Json(TopicsOverview {
        n_topics: topics.n_topics(),
        top_words: topics.top_n(),
    })
    .into_response()
}

async fn get_topic(
    State(state): State<ServerState>,
    Path(index): Path<usize>,
    Query(params): Query<WordsParams>,
) -> Response {
    let topics = match topics_or_unavailable(&state) {
        Ok(topics) => topics,
        Err(response) => return response,
    };
    match time_stage("topic_summary", || topics.summarize(index, params.words)) {
        Ok(summary) => Json(summary).into_response(),
        Err(err) => topic_error_response(err, "/v1/topics/{index}"),
    }
}

async fn distribution(
    State(state): State<ServerState>,
    Json(query): Json<TopicFilterQuery>,
) -> Response {
    if let Err(response) = topics_or_unavailable(&state) {
        return response;
    }
    let rows = query.filter.apply(state.dataset.reviews());
    Json(InsightTable::new(time_stage("topic_distribution", || {
        topic_distribution(&rows)
    })))
    .into_response()
}

async fn city_tags(
    State(state): State<ServerState>,
    Json(query): Json<TopicFilterQuery>,
) -> Response {
    let topics = match topics_or_unavailable(&state) {
        Ok(topics) => topics,
        Err(response) => return response,
    };
    let rows = query.filter.apply(state.dataset.reviews());
    match time_stage("city_tags", || topics.city_tags(&rows)) {
        Ok(cities) => Json(InsightTable::new(cities)).into_response(),
        Err(err) => {
            error!("City tags failed: {}", err);
            record_error("topic", "/v1/topics/city-tags");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

pub fn topics_routes(state: ServerState) -> Router {
    Router::new()
        .route("/", get(overview))
        .route("/{index}", get(get_topic))
        .route("/distribution", post(distribution))
        .route("/city-tags", post(city_tags))
        .with_state(state)
}
