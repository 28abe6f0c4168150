use super::dto::{InteractionAccepted, ViewResponse};
use super::host::{ApplicationView, NotificationSurface};
use super::memory_host::{Interaction, InteractionError, NotificationRecord};
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::warn;
use uuid::Uuid;

impl From<InteractionError> for ApiError {
    fn from(e: InteractionError) -> Self {
        let status = match e {
            InteractionError::NotFound => StatusCode::NOT_FOUND,
            InteractionError::AlreadySettled(_) => StatusCode::CONFLICT,
        };
        ApiError(e.to_string(), status)
    }
}

/// List notifications currently on the surface
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses(
        (status = 200, description = "Displayed notifications", body = ApiResponse<Vec<NotificationRecord>>)
    ),
    tag = "Notifications"
)]
pub async fn list_notifications(State(state): State<AppState>) -> impl IntoResponse {
    ApiSuccess::ok(state.host.notifications(), "Notifications retrieved successfully")
}

/// Click a notification
/// Closes it and routes to its target view
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/click",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 202, description = "Click queued", body = ApiResponse<InteractionAccepted>),
        (status = 404, description = "Notification not found"),
        (status = 409, description = "Notification already clicked or dismissed"),
        (status = 503, description = "Notification worker unavailable")
    ),
    tag = "Notifications"
)]
pub async fn click_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let notification = match state.host.begin_interaction(id, Interaction::Click) {
        Ok(notification) => notification,
        Err(e) => return ApiError::from(e).into_response(),
    };

    if let Err(e) = state.push.click(notification.clone()) {
        warn!(error = %e, %id, "Failed to queue notification click");
        state.host.close(&notification);
        return ApiError(e.to_string(), StatusCode::SERVICE_UNAVAILABLE).into_response();
    }

    ApiSuccess::accepted(
        InteractionAccepted { id, action: "click".to_string() },
        "Click accepted",
    )
    .into_response()
}

/// Dismiss a notification without clicking it
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/close",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 202, description = "Dismissal accepted", body = ApiResponse<InteractionAccepted>),
        (status = 404, description = "Notification not found"),
        (status = 409, description = "Notification already clicked or dismissed")
    ),
    tag = "Notifications"
)]
pub async fn dismiss_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let notification = match state.host.begin_interaction(id, Interaction::Dismiss) {
        Ok(notification) => notification,
        Err(e) => return ApiError::from(e).into_response(),
    };

    // The surface already dropped it; the event only feeds the dismissal log.
    if let Err(e) = state.push.close(notification) {
        warn!(error = %e, %id, "Failed to queue notification dismissal");
    }

    ApiSuccess::accepted(
        InteractionAccepted { id, action: "close".to_string() },
        "Dismissal accepted",
    )
    .into_response()
}

/// List open application views
#[utoipa::path(
    get,
    path = "/api/v1/views",
    responses(
        (status = 200, description = "Open views", body = ApiResponse<Vec<ViewResponse>>)
    ),
    tag = "Notifications"
)]
pub async fn list_views(State(state): State<AppState>) -> impl IntoResponse {
    let views: Vec<ViewResponse> = state
        .host
        .views()
        .iter()
        .map(|view| ViewResponse {
            url: view.url(),
            focused: view.is_focused(),
        })
        .collect();

    ApiSuccess::ok(views, "Views retrieved successfully")
}
