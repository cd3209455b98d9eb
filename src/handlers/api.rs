use crate::{
    models::{UrlRecord, UrlWithStatus},
    AppState,
};
use axum::{extract::State, Json};
use std::sync::Arc;

/// GET /api/urls
///
/// Every record in creation order with its current status.
pub async fn list_urls(State(state): State<Arc<AppState>>) -> Json<Vec<UrlWithStatus>> {
    Json(state.shortener.read().await.stats())
}

/// GET /api/urls/recent
pub async fn recent_urls(State(state): State<Arc<AppState>>) -> Json<Vec<UrlRecord>> {
    Json(state.shortener.read().await.recent())
}
