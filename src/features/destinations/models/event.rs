use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Change notification emitted after every store mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DestinationEvent {
    Created { id: Uuid },
    /// Description replaced and/or images appended
    Updated { id: Uuid },
    ImageRemoved { id: Uuid, position: usize },
    Deleted { id: Uuid },
}

impl DestinationEvent {
    /// SSE event name
    pub fn kind(&self) -> &'static str {
        match self {
            DestinationEvent::Created { .. } => "destination.created",
            DestinationEvent::Updated { .. } => "destination.updated",
            DestinationEvent::ImageRemoved { .. } => "destination.image_removed",
            DestinationEvent::Deleted { .. } => "destination.deleted",
        }
    }
}
