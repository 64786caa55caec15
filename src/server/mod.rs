//! Static demo host plus the score and push ingest endpoints.

use crate::classifier::{ScoreFrame, ScoreHub, SoundLabel};
use crate::config::SentryConfig;
use crate::error::{Result, SentryError};
use crate::push::PushWorker;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use http::{header, HeaderValue, Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

/// Origins allowed to call the ingest endpoints from the demo page.
const ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<ScoreHub>,
    pub push: Arc<PushWorker>,
}

/// One inference tick posted by the external classifier.
#[derive(Debug, Deserialize)]
pub struct ScoreSubmission {
    pub source: SoundLabel,
    pub scores: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct ScoreAck {
    accepted: bool,
}

pub fn router(config: &SentryConfig, state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            ALLOWED_ORIGINS.into_iter().map(HeaderValue::from_static),
        ))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let index = ServeFile::new(config.site_root.join("index.html"));
    let site = ServeDir::new(&config.site_root).fallback(ServeDir::new(&config.public_root));

    Router::new()
        .route_service("/", index)
        .route("/scores", post(ingest_scores))
        .route("/push", post(ingest_push))
        .fallback_service(site)
        .layer(cors)
        .with_state(state)
}

async fn ingest_scores(
    State(state): State<AppState>,
    Json(submission): Json<ScoreSubmission>,
) -> impl IntoResponse {
    let accepted = state
        .hub
        .publish(ScoreFrame::new(submission.source, submission.scores));
    (StatusCode::ACCEPTED, Json(ScoreAck { accepted }))
}

async fn ingest_push(State(state): State<AppState>, body: Bytes) -> StatusCode {
    state.push.handle_raw(&body).await;
    StatusCode::NO_CONTENT
}

/// Bind and serve until the listener fails or the task is dropped.
pub async fn serve(config: SentryConfig, state: AppState) -> Result<()> {
    let app = router(&config, state);
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| SentryError::Server(format!("failed to bind {}: {}", addr, e)))?;

    log::info!("🌐 Server running on port {}", config.port);
    axum::serve(listener, app)
        .await
        .map_err(|e| SentryError::Server(e.to_string()))
}
