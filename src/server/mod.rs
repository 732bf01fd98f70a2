//! HTTP surface over the pipeline.
//!
//! | Method | Path                | Body                         | Response                 |
//! |--------|---------------------|------------------------------|--------------------------|
//! | POST   | `/api/extract`      | `{url?, text?}`              | `ExtractedContent`       |
//! | POST   | `/api/enhance`      | `{content, options}`         | `EnhancedContent`        |
//! | POST   | `/api/generate-pdf` | `{content, options?}`        | `application/pdf` bytes  |
//! | GET    | `/api/models`       | none                         | model listing            |
//!
//! JSON responses share one envelope, `{success, data?, error?}`. Failures
//! carry a status code matching the error family (see [`error::ApiError`]).
//! Every route answers CORS preflight with a fixed permissive header set.

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResponse};
pub use state::AppState;

use axum::http::{header, Method};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve on an already-bound listener until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{addr}");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
