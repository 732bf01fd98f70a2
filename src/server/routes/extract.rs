use crate::enhance;
use crate::server::error::{ApiError, ApiResponse};
use crate::server::state::AppState;
use crate::types::{ContentInput, ExtractedContent};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

pub fn routes() -> Router<AppState> {
    Router::new().route("/extract", post(extract_content))
}

async fn extract_content(
    State(state): State<AppState>,
    body: Result<Json<ContentInput>, JsonRejection>,
) -> Result<Json<ApiResponse<ExtractedContent>>, ApiError> {
    let Json(input) = body?;
    let content = enhance::extract(&input, &state.config).await?;
    Ok(Json(ApiResponse::ok(content)))
}
