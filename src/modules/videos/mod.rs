use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};

pub mod dto;
pub mod handler;
pub mod model;
pub mod repository;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/webhooks/video",
            post(handler::video_webhook).fallback(handler::method_not_allowed),
        )
        .route("/videos", post(handler::submit_video))
        .route("/videos/{asset_id}/status", get(handler::video_status))
}
