use crate::catalog::{list_models, ModelListing};
use crate::server::error::ApiResponse;
use crate::server::state::AppState;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

pub fn routes() -> Router<AppState> {
    Router::new().route("/models", get(models))
}

async fn models(State(state): State<AppState>) -> Json<ApiResponse<ModelListing>> {
    Json(ApiResponse::ok(list_models(&state.config)))
}
