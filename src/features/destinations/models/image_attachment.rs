use axum::body::Bytes;
use uuid::Uuid;

/// Handle to a resolved photo; the bytes live in image storage under `id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub id: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
}

/// A photo picked by the user that has not been resolved yet
#[derive(Debug, Clone)]
pub struct ImageSelection {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}
