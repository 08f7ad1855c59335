pub mod auth_handlers;
pub mod transaction_handlers;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error response envelope shared by all endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
        }
    }
}
