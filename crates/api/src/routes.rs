use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use cardmatch_core::catalog::Catalog;
use cardmatch_core::domain::card::Card;
use cardmatch_core::domain::contract::{RecommendRequest, ValidationError};
use cardmatch_core::domain::recommendation::Recommendation;
use cardmatch_core::engine::RecommendationEngine;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct AppState {
    /// `None` when the catalog failed to load; the API then runs degraded.
    engine: Option<RecommendationEngine>,
}

impl AppState {
    pub fn new(catalog: Option<Catalog>) -> Self {
        Self {
            engine: catalog.map(|c| RecommendationEngine::new(Arc::new(c))),
        }
    }

    fn engine(&self) -> Result<&RecommendationEngine, ApiError> {
        self.engine
            .as_ref()
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("card catalog is unavailable")))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/api/cards", get(list_cards))
        .route("/api/cards/recommend", post(recommend))
        .route("/api/cards/:id", get(get_card))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Json<Value> {
    Json(json!({"message": "CardMatch backend running"}))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn list_cards(State(state): State<AppState>) -> Result<Json<Vec<Card>>, ApiError> {
    let engine = state.engine()?;
    Ok(Json(engine.catalog().cards().to_vec()))
}

async fn get_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Card>, ApiError> {
    let engine = state.engine()?;
    engine
        .catalog()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("card {id}")))
}

async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Recommendation>, ApiError> {
    let Json(body) = payload.map_err(|rejection| ValidationError(rejection.body_text()))?;
    let request = RecommendRequest::from_json(body)?;
    let engine = state.engine()?;

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("recommend", %request_id);
    let recommendation = span.in_scope(|| {
        tracing::debug!(
            categories = request.spending.len(),
            owned = request.owned_cards.len(),
            "recommend request accepted"
        );
        engine.recommend(&request)
    });

    Ok(Json(recommendation))
}
