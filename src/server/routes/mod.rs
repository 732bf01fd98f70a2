pub mod document;
pub mod enhance;
pub mod extract;
pub mod models;

use crate::server::state::AppState;
use axum::Router;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(extract::routes())
        .merge(enhance::routes())
        .merge(document::routes())
        .merge(models::routes())
}
