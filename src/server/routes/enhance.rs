use crate::catalog::ModelId;
use crate::enhance;
use crate::error::EnhanceError;
use crate::server::error::{ApiError, ApiResponse};
use crate::server::state::AppState;
use crate::types::{Action, EnhancedContent, ExtractedContent, ProcessingOptions};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

pub fn routes() -> Router<AppState> {
    Router::new().route("/enhance", post(enhance_content))
}

#[derive(Debug, Deserialize)]
struct EnhanceRequest {
    content: Option<ExtractedContent>,
    options: Option<RequestOptions>,
}

/// Wire form of [`ProcessingOptions`]; the model stays a string so an
/// unknown id is reported as a validation error, not a parse failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestOptions {
    model: String,
    action: Action,
    #[serde(default)]
    include_original: bool,
    #[serde(default)]
    generate_citations: bool,
}

impl RequestOptions {
    fn into_options(self) -> Result<ProcessingOptions, EnhanceError> {
        Ok(ProcessingOptions {
            model: self.model.parse::<ModelId>()?,
            action: self.action,
            include_original: self.include_original,
            generate_citations: self.generate_citations,
        })
    }
}

async fn enhance_content(
    State(state): State<AppState>,
    body: Result<Json<EnhanceRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<EnhancedContent>>, ApiError> {
    let Json(request) = body?;
    let (Some(content), Some(options)) = (request.content, request.options) else {
        return Err(EnhanceError::Validation(
            "Content and processing options are required".into(),
        )
        .into());
    };
    let options = options.into_options()?;

    let enhanced = enhance::enhance(&content, &options, &state.dispatcher, &state.config).await?;
    Ok(Json(ApiResponse::ok(enhanced)))
}
