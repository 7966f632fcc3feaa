use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    models::{ApiResponse, CatalogResponse},
    AppState,
};

/// GET /api/catalog: services, duration tiers, add-ons, plans and packages.
pub async fn catalog(State(state): State<Arc<AppState>>) -> Json<ApiResponse<CatalogResponse>> {
    Json(ApiResponse::success(state.catalog.to_response()))
}
