use super::dto::{AssetStatusResponse, SubmitVideoRequest, WebhookAck, WebhookEvent};
use super::service::VideoService;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

/// Video-ready webhook
/// Marks the stored video ready once the provider finishes encoding
#[utoipa::path(
    post,
    path = "/api/v1/webhooks/video",
    request_body = WebhookEvent,
    responses(
        (status = 200, description = "Event handled or ignored", body = ApiResponse<WebhookAck>),
        (status = 400, description = "Missing asset or playback id"),
        (status = 405, description = "Method Not Allowed"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Videos"
)]
pub async fn video_webhook(
    State(state): State<AppState>,
    payload: Result<Json<WebhookEvent>, JsonRejection>,
) -> impl IntoResponse {
    let Json(event) = match payload {
        Ok(event) => event,
        Err(e) => return ApiError::bad_request(e.body_text()).into_response(),
    };

    match VideoService::handle_webhook(state, event).await {
        Ok(ack) => {
            let message = if ack.ignored { "Event ignored" } else { "Event processed" };
            ApiSuccess::ok(ack, message).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn method_not_allowed() -> impl IntoResponse {
    ApiError("Method not allowed".to_string(), StatusCode::METHOD_NOT_ALLOWED)
}

/// Submit an uploaded video for processing
/// Responds with the provider's asset body
#[utoipa::path(
    post,
    path = "/api/v1/videos",
    request_body = SubmitVideoRequest,
    responses(
        (status = 200, description = "Provider asset created", body = serde_json::Value),
        (status = 400, description = "Missing filename or user id"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Videos"
)]
pub async fn submit_video(
    State(state): State<AppState>,
    payload: Result<Json<SubmitVideoRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(req) = match payload {
        Ok(req) => req,
        Err(e) => return ApiError::bad_request(e.body_text()).into_response(),
    };

    match VideoService::submit(state, req).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Poll the provider for an asset's processing status
#[utoipa::path(
    get,
    path = "/api/v1/videos/{asset_id}/status",
    params(
        ("asset_id" = String, Path, description = "Provider asset ID")
    ),
    responses(
        (status = 200, description = "Asset status", body = ApiResponse<AssetStatusResponse>),
        (status = 404, description = "Asset not found"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Videos"
)]
pub async fn video_status(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> impl IntoResponse {
    match VideoService::poll_status(state, asset_id).await {
        Ok(res) => ApiSuccess::ok(res, "Status retrieved successfully").into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use crate::modules::notifications::payload::NotificationPayload;
    use crate::test_support::{FakeProvider, FakeVideoStore, TestAppBuilder};
    use crate::workers::notifier::DispatchEvent;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use std::sync::Arc;

    const WEBHOOK: &str = "/api/v1/webhooks/video";

    #[tokio::test]
    async fn ready_webhook_updates_record_and_queues_push() {
        let videos = Arc::new(FakeVideoStore::default().with_video("abc", "holiday.mp4"));
        let mut app = TestAppBuilder::new().videos(videos.clone()).build();

        let (status, body) = app
            .post_json(
                WEBHOOK,
                json!({"type": "video.asset.ready", "data": {"id": "abc", "playback_ids": [{"id": "pb1"}]}}),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["updated"], true);
        assert_eq!(body["data"]["playback_id"], "pb1");

        let video = videos.find("abc").unwrap();
        assert_eq!(video.status, "ready");
        assert_eq!(video.playback_id.as_deref(), Some("pb1"));

        let Some(DispatchEvent::Push(push)) = app.events.try_recv().ok() else {
            panic!("expected a queued push event");
        };
        let payload = NotificationPayload::decode(&push.data.unwrap()).unwrap();
        assert_eq!(payload.tag.as_deref(), Some("video-abc"));
        assert_eq!(payload.body.as_deref(), Some("holiday.mp4 has finished processing"));
        let (_, options) = payload.into_display();
        assert_eq!(options.target_url(), Some("/videos/pb1"));
    }

    #[tokio::test]
    async fn ready_webhook_without_playback_id_is_rejected_without_writing() {
        let videos = Arc::new(FakeVideoStore::default().with_video("abc", "a.mp4"));
        let mut app = TestAppBuilder::new().videos(videos.clone()).build();

        let (status, body) = app
            .post_json(
                WEBHOOK,
                json!({"type": "video.asset.ready", "data": {"id": "abc", "playback_ids": []}}),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert_eq!(videos.write_count(), 0);
        assert_eq!(videos.find("abc").unwrap().status, "processing");
        assert!(app.events.try_recv().is_err());
    }

    #[tokio::test]
    async fn ready_webhook_without_asset_id_is_rejected_without_writing() {
        let videos = Arc::new(FakeVideoStore::default().with_video("abc", "a.mp4"));
        let mut app = TestAppBuilder::new().videos(videos.clone()).build();

        for data in [
            json!({"playback_ids": [{"id": "pb1"}]}),
            json!({"id": "  ", "playback_ids": [{"id": "pb1"}]}),
        ] {
            let (status, body) = app
                .post_json(WEBHOOK, json!({"type": "video.asset.ready", "data": data}))
                .await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["message"], "Missing asset id");
        }

        assert_eq!(videos.write_count(), 0);
        assert_eq!(videos.find("abc").unwrap().status, "processing");
        assert!(app.events.try_recv().is_err());
    }

    #[tokio::test]
    async fn other_event_types_are_acknowledged_and_ignored() {
        let videos = Arc::new(FakeVideoStore::default());
        let app = TestAppBuilder::new().videos(videos.clone()).build();

        let (status, body) = app
            .post_json(WEBHOOK, json!({"type": "video.asset.created", "data": {"id": "abc"}}))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Event ignored");
        assert_eq!(body["data"]["ignored"], true);
        assert_eq!(videos.write_count(), 0);
    }

    #[tokio::test]
    async fn unmatched_asset_is_acknowledged_without_push() {
        let mut app = TestAppBuilder::new().build();

        let (status, body) = app
            .post_json(
                WEBHOOK,
                json!({"type": "video.asset.ready", "data": {"id": "nope", "playback_ids": [{"id": "pb"}]}}),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["updated"], false);
        assert!(app.events.try_recv().is_err());
    }

    #[tokio::test]
    async fn store_failure_is_a_server_error() {
        let app = TestAppBuilder::new()
            .videos(Arc::new(FakeVideoStore::failing()))
            .build();

        let (status, body) = app
            .post_json(
                WEBHOOK,
                json!({"type": "video.asset.ready", "data": {"id": "abc", "playback_ids": [{"id": "pb1"}]}}),
            )
            .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["message"].as_str().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn webhook_rejects_other_methods() {
        let app = TestAppBuilder::new().build();

        for method in ["GET", "PUT", "DELETE"] {
            let (status, body) = app
                .send(Request::builder().method(method).uri(WEBHOOK).body(Body::empty()).unwrap())
                .await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
            assert_eq!(body["status"], "error");
        }
    }

    #[tokio::test]
    async fn malformed_webhook_body_is_a_bad_request() {
        let app = TestAppBuilder::new().build();
        let (status, _) = app
            .send(
                Request::builder()
                    .method("POST")
                    .uri(WEBHOOK)
                    .header("content-type", "application/json")
                    .body(Body::from("{oops"))
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn submission_creates_processing_record_and_returns_provider_body() {
        let provider_body = json!({"data": {"id": "asset-9", "status": "preparing"}});
        let provider = Arc::new(FakeProvider::ok(provider_body.clone()));
        let videos = Arc::new(FakeVideoStore::default());
        let app = TestAppBuilder::new()
            .provider(provider.clone())
            .videos(videos.clone())
            .build();

        let (status, body) = app
            .post_json("/api/v1/videos", json!({"fileName": "user-1/clip.mp4", "userId": "user-1"}))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, provider_body);
        assert_eq!(
            provider.inputs.lock().clone(),
            vec!["https://cdn.example.com/user-1/clip.mp4"]
        );

        let video = videos.find("asset-9").unwrap();
        assert_eq!(video.status, "processing");
        assert_eq!(video.user_id, "user-1");
        assert_eq!(video.source_url, "https://cdn.example.com/user-1/clip.mp4");
    }

    #[tokio::test]
    async fn submission_requires_filename_and_user() {
        let videos = Arc::new(FakeVideoStore::default());
        let app = TestAppBuilder::new().videos(videos.clone()).build();

        let (status, _) = app.post_json("/api/v1/videos", json!({"filename": "a.mp4"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app.post_json("/api/v1/videos", json!({"user_id": "u"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(videos.write_count(), 0);
    }

    #[tokio::test]
    async fn submission_treats_blank_fields_as_missing() {
        let provider = Arc::new(FakeProvider::ok(json!({"data": {"id": "x"}})));
        let videos = Arc::new(FakeVideoStore::default());
        let app = TestAppBuilder::new()
            .provider(provider.clone())
            .videos(videos.clone())
            .build();

        for body in [
            json!({"filename": "   ", "user_id": "u"}),
            json!({"filename": "a.mp4", "user_id": " "}),
            json!({"filename": "user-1//a.mp4", "user_id": "u"}),
        ] {
            let (status, _) = app.post_json("/api/v1/videos", body.clone()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        }

        assert!(provider.inputs.lock().is_empty());
        assert_eq!(videos.write_count(), 0);
    }

    #[tokio::test]
    async fn submission_uses_the_same_key_as_the_upload_relay() {
        let provider = Arc::new(FakeProvider::ok(json!({"data": {"id": "asset-3"}})));
        let videos = Arc::new(FakeVideoStore::default());
        let app = TestAppBuilder::new()
            .provider(provider.clone())
            .videos(videos.clone())
            .build();

        let (status, _) = app
            .post_json("/api/v1/videos", json!({"filename": " /user-1/clip.mp4 ", "user_id": "u"}))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            provider.inputs.lock().clone(),
            vec!["https://cdn.example.com/user-1/clip.mp4"]
        );
        assert_eq!(videos.find("asset-3").unwrap().filename, "user-1/clip.mp4");
    }

    #[tokio::test]
    async fn provider_rejection_passes_message_through() {
        let videos = Arc::new(FakeVideoStore::default());
        let app = TestAppBuilder::new()
            .provider(Arc::new(FakeProvider::rejecting(400, "input url unreachable")))
            .videos(videos.clone())
            .build();

        let (status, body) = app
            .post_json("/api/v1/videos", json!({"filename": "a.mp4", "user_id": "u"}))
            .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["message"].as_str().unwrap().contains("input url unreachable"));
        assert_eq!(videos.write_count(), 0);
    }

    #[tokio::test]
    async fn submission_fails_when_public_url_cannot_be_built() {
        let app = TestAppBuilder::new()
            .config(|c| c.storage.public_url = Some("not a url".to_string()))
            .provider(Arc::new(FakeProvider::ok(json!({"data": {"id": "x"}}))))
            .build();

        let (status, _) = app
            .post_json("/api/v1/videos", json!({"filename": "a.mp4", "user_id": "u"}))
            .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn submission_persistence_failure_is_a_server_error() {
        let app = TestAppBuilder::new()
            .provider(Arc::new(FakeProvider::ok(json!({"data": {"id": "x"}}))))
            .videos(Arc::new(FakeVideoStore::failing()))
            .build();

        let (status, body) = app
            .post_json("/api/v1/videos", json!({"filename": "a.mp4", "user_id": "u"}))
            .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["message"].as_str().unwrap().contains("Failed to create video record"));
    }

    #[tokio::test]
    async fn submission_answers_cors_preflight() {
        let app = TestAppBuilder::new().build();

        let (status, _) = app
            .send(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/v1/videos")
                    .header("origin", "https://app.example.com")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn status_poll_syncs_lagging_record_once() {
        let videos = Arc::new(FakeVideoStore::default().with_video("abc", "a.mp4"));
        let provider = Arc::new(FakeProvider::ok(
            json!({"data": {"id": "abc", "status": "ready", "playback_ids": [{"id": "pb7"}]}}),
        ));
        let mut app = TestAppBuilder::new()
            .videos(videos.clone())
            .provider(provider)
            .build();

        let (status, body) = app.send(
            Request::builder().uri("/api/v1/videos/abc/status").body(Body::empty()).unwrap(),
        ).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ready");
        assert_eq!(body["data"]["playback_id"], "pb7");
        assert_eq!(body["data"]["synced"], true);
        assert_eq!(videos.find("abc").unwrap().playback_id.as_deref(), Some("pb7"));
        assert!(matches!(app.events.try_recv(), Ok(DispatchEvent::Push(_))));

        let (_, body) = app.send(
            Request::builder().uri("/api/v1/videos/abc/status").body(Body::empty()).unwrap(),
        ).await;
        assert_eq!(body["data"]["synced"], false);
        assert!(app.events.try_recv().is_err());
    }

    #[tokio::test]
    async fn status_poll_refuses_asset_ids_that_leave_the_assets_path() {
        let provider = Arc::new(FakeProvider::ok(json!({"data": {"status": "ready"}})));
        let app = TestAppBuilder::new().provider(provider.clone()).build();

        for uri in [
            "/api/v1/videos/..%2F..%2F..%2Fadmin/status",
            "/api/v1/videos/../status",
            "/api/v1/videos/%20/status",
        ] {
            let (status, _) = app
                .send(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        }

        assert!(provider.inputs.lock().is_empty());
    }

    #[tokio::test]
    async fn status_poll_for_unknown_asset_is_not_found() {
        let app = TestAppBuilder::new().build();
        let (status, _) = app.send(
            Request::builder().uri("/api/v1/videos/ghost/status").body(Body::empty()).unwrap(),
        ).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
