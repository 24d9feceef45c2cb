//! `/v1/insights` routes: one endpoint per dashboard table.

use super::metrics::time_stage;
use super::state::ServerState;
use crate::insights::{
    attention_needed, bottom_rated, compare_regions, find_mismatches, places_with_most_negatives,
    ratings_ranked, region_priority, sentiment_by, sentiment_distribution, top_attention,
    top_rated, FilterSelection, GroupKey, InsightTable, RegionSentiment, RegionSide, PLACE_KEYS,
};
use crate::reviews::Review;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct InsightQuery {
    pub filter: FilterSelection,
    pub limit: Option<usize>,
}

#[derive(Deserialize, Debug)]
pub struct RatingsQuery {
    #[serde(default)]
    pub filter: FilterSelection,
    #[serde(default = "default_rating_keys")]
    pub group_by: Vec<GroupKey>,
}

fn default_rating_keys() -> Vec<GroupKey> {
    vec![GroupKey::PlaceType]
}

#[derive(Deserialize, Debug)]
pub struct SentimentByQuery {
    #[serde(default)]
    pub filter: FilterSelection,
    #[serde(default = "default_sentiment_key")]
    pub group_by: GroupKey,
}

fn default_sentiment_key() -> GroupKey {
    GroupKey::PlaceType
}

#[derive(Deserialize, Debug)]
pub struct CompareRegionsQuery {
    #[serde(default)]
    pub filter: FilterSelection,
    pub first: RegionSide,
    pub second: RegionSide,
}

#[derive(Serialize, Debug)]
struct RegionComparison {
    first: RegionSentiment,
    second: RegionSentiment,
}

fn filtered<'a>(state: &'a ServerState, filter: &FilterSelection) -> Vec<&'a Review> {
    time_stage("filter", || filter.apply(state.dataset.reviews()))
}

fn table<T: Serialize>(rows: Vec<T>) -> Response {
    Json(InsightTable::new(rows)).into_response()
}

async fn filter_options(
    State(state): State<ServerState>,
    Json(query): Json<InsightQuery>,
) -> Response {
    let options = time_stage("filter_options", || {
        query.filter.options(state.dataset.reviews())
    });
    Json(options).into_response()
}

async fn reviews(State(state): State<ServerState>, Json(query): Json<InsightQuery>) -> Response {
    let mut rows = filtered(&state, &query.filter);
    if let Some(limit) = query.limit {
        rows.truncate(limit);
    }
    table(rows)
}

async fn sentiment(State(state): State<ServerState>, Json(query): Json<InsightQuery>) -> Response {
    let rows = filtered(&state, &query.filter);
    if rows.is_empty() {
        return table(Vec::<()>::new());
    }
    table(time_stage("sentiment", || sentiment_distribution(&rows)))
}

async fn sentiment_by_group(
    State(state): State<ServerState>,
    Json(query): Json<SentimentByQuery>,
) -> Response {
    let rows = filtered(&state, &query.filter);
    table(time_stage("sentiment_by", || sentiment_by(&rows, query.group_by)))
}

async fn compare(
    State(state): State<ServerState>,
    Json(query): Json<CompareRegionsQuery>,
) -> Response {
    let rows = filtered(&state, &query.filter);
    let (first, second) = time_stage("compare_regions", || {
        compare_regions(&rows, &query.first, &query.second)
    });
    Json(RegionComparison { first, second }).into_response()
}

async fn ratings(State(state): State<ServerState>, Json(query): Json<RatingsQuery>) -> Response {
    let rows = filtered(&state, &query.filter);
    table(time_stage("ratings", || ratings_ranked(&rows, &query.group_by)))
}

async fn top_places(
    State(state): State<ServerState>,
    Json(query): Json<InsightQuery>,
) -> Response {
    let rows = filtered(&state, &query.filter);
    let limit = query.limit.unwrap_or(state.config.default_limit);
    table(time_stage("top_rated", || top_rated(&rows, &PLACE_KEYS, limit)))
}

async fn bottom_places(
    State(state): State<ServerState>,
    Json(query): Json<InsightQuery>,
) -> Response {
    let rows = filtered(&state, &query.filter);
    let limit = query.limit.unwrap_or(state.config.default_limit);
    table(time_stage("bottom_rated", || {
        bottom_rated(&rows, &PLACE_KEYS, limit)
    }))
}

async fn negative_places(
    State(state): State<ServerState>,
    Json(query): Json<InsightQuery>,
) -> Response {
    let rows = filtered(&state, &query.filter);
    let limit = query.limit.unwrap_or(state.config.default_limit);
    table(time_stage("negatives", || {
        places_with_most_negatives(&rows, limit)
    }))
}

async fn attention(
    State(state): State<ServerState>,
    Json(query): Json<InsightQuery>,
) -> Response {
    let rows = filtered(&state, &query.filter);
    let settings = &state.config.attention;
    let limit = query.limit.unwrap_or(settings.top_n);
    table(time_stage("attention", || {
        top_attention(&rows, settings, limit)
    }))
}

async fn attention_needed_cities(
    State(state): State<ServerState>,
    Json(query): Json<InsightQuery>,
) -> Response {
    let rows = filtered(&state, &query.filter);
    table(time_stage("attention_needed", || {
        attention_needed(&rows, &state.config.attention)
    }))
}

async fn attention_regions(
    State(state): State<ServerState>,
    Json(query): Json<InsightQuery>,
) -> Response {
    let rows = filtered(&state, &query.filter);
    let settings = &state.config.attention;
    let limit = query.limit.unwrap_or(settings.top_n);
    table(time_stage("region_priority", || {
        region_priority(&top_attention(&rows, settings, limit))
    }))
}

async fn mismatches(
    State(state): State<ServerState>,
    Json(query): Json<InsightQuery>,
) -> Response {
    let rows = filtered(&state, &query.filter);
    let limit = query.limit.unwrap_or(state.config.default_limit);
    table(time_stage("mismatches", || {
        find_mismatches(&rows, &state.config.mismatch, Some(limit))
    }))
}

pub fn insights_routes(state: ServerState) -> Router {
    Router::new()
        .route("/filter-options", post(filter_options))
        .route("/reviews", post(reviews))
        .route("/sentiment", post(sentiment))
        .route("/sentiment-by", post(sentiment_by_group))
        .route("/compare-regions", post(compare))
        .route("/ratings", post(ratings))
        .route("/places/top", post(top_places))
        .route("/places/bottom", post(bottom_places))
        .route("/places/negatives", post(negative_places))
        .route("/attention", post(attention))
        .route("/attention/needed", post(attention_needed_cities))
        .route("/attention/regions", post(attention_regions))
        .route("/mismatches", post(mismatches))
        .with_state(state)
}
