use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};

pub mod dispatcher;
pub mod dto;
pub mod handler;
pub mod host;
pub mod lifetime;
pub mod memory_host;
pub mod payload;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(handler::list_notifications))
        .route("/notifications/{id}/click", post(handler::click_notification))
        .route("/notifications/{id}/close", post(handler::dismiss_notification))
        .route("/views", get(handler::list_views))
}
