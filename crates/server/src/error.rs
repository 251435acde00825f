//! HTTP error mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gitpay_chain::ChainError;
use tracing::error;

/// An error ready to leave the service as an HTTP response.
#[derive(Debug)]
pub struct ServerError {
    status: StatusCode,
    message: String,
}

impl ServerError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl From<ChainError> for ServerError {
    fn from(err: ChainError) -> Self {
        let status = match &err {
            ChainError::NameNotFound(_) => StatusCode::NOT_FOUND,
            ChainError::InvalidName(_) => StatusCode::BAD_REQUEST,
            ChainError::Upstream(_) | ChainError::Token(_) => StatusCode::BAD_GATEWAY,
        };
        if status == StatusCode::BAD_GATEWAY {
            error!(%err, "upstream failure");
        }
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_chain_errors_to_statuses() {
        let not_found: ServerError = ChainError::NameNotFound("x.eth".into()).into();
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);

        let invalid: ServerError = ChainError::InvalidName("???".into()).into();
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    }
}
