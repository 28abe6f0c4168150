use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct InteractionAccepted {
    pub id: Uuid,
    pub action: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ViewResponse {
    pub url: String,
    pub focused: bool,
}
