use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JSON envelope returned by every endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    /// Field-level messages, only on validation failures
    pub errors: Option<Vec<String>>,
}

/// Collection metadata for list responses
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: usize,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: None,
            errors: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl ApiResponse<()> {
    pub fn error(message: String, errors: Option<Vec<String>>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            meta: None,
            errors,
        }
    }
}
