use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::videos::handler::video_webhook,
        crate::modules::videos::handler::submit_video,
        crate::modules::videos::handler::video_status,
        crate::modules::uploads::handler::upload_file,
        crate::modules::notifications::handler::list_notifications,
        crate::modules::notifications::handler::click_notification,
        crate::modules::notifications::handler::dismiss_notification,
        crate::modules::notifications::handler::list_views,
    ),
    components(
        schemas(
            crate::modules::videos::dto::WebhookEvent,
            crate::modules::videos::dto::WebhookAssetData,
            crate::modules::videos::dto::PlaybackId,
            crate::modules::videos::dto::WebhookAck,
            crate::modules::videos::dto::SubmitVideoRequest,
            crate::modules::videos::dto::AssetStatusResponse,
            crate::modules::videos::model::Video,
            crate::modules::videos::model::VideoStatus,
            crate::modules::uploads::dto::UploadResponse,
            crate::modules::notifications::payload::NotificationPayload,
            crate::modules::notifications::payload::NotificationOptions,
            crate::modules::notifications::host::DisplayedNotification,
            crate::modules::notifications::memory_host::NotificationRecord,
            crate::modules::notifications::memory_host::NotificationState,
            crate::modules::notifications::dto::InteractionAccepted,
            crate::modules::notifications::dto::ViewResponse,
        )
    ),
    tags(
        (name = "Videos", description = "Provider webhook, submission and status polling"),
        (name = "Uploads", description = "Relay uploads into object storage"),
        (name = "Notifications", description = "Notification surface and application views")
    )
)]
pub struct ApiDoc;
