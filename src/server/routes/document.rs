use crate::enhance;
use crate::error::EnhanceError;
use crate::server::error::ApiError;
use crate::server::state::AppState;
use crate::types::{DocumentRequest, EnhancedContent, RenderOptions};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

pub fn routes() -> Router<AppState> {
    Router::new().route("/generate-pdf", post(generate_pdf))
}

#[derive(Debug, Deserialize)]
struct GeneratePdfRequest {
    content: Option<EnhancedContent>,
    options: Option<RenderOptions>,
}

async fn generate_pdf(
    State(state): State<AppState>,
    body: Result<Json<GeneratePdfRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body?;
    let Some(content) = request.content else {
        return Err(
            EnhanceError::Validation("Content is required for PDF generation".into()).into(),
        );
    };

    let request = DocumentRequest {
        content,
        options: request.options,
    };
    let document = enhance::generate_document(&request, state.renderer.as_ref()).await?;

    let disposition = format!("attachment; filename=\"{}\"", document.filename);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_LENGTH, document.bytes.len().to_string()),
        ],
        document.bytes,
    )
        .into_response())
}
