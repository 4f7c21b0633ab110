use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

/// Any failure while proxying a prompt.
///
/// Every variant of the underlying error collapses to the same 500 body; the
/// cause is only written to the log.
#[derive(Debug)]
pub struct ProxyError(pub crate::Error);

impl From<crate::Error> for ProxyError {
    fn from(err: crate::Error) -> Self {
        Self(err)
    }
}

impl From<serde_json::Error> for ProxyError {
    fn from(err: serde_json::Error) -> Self {
        Self(crate::Error::Serialization(err))
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!("Error in generate endpoint: {}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
        )
            .into_response()
    }
}
