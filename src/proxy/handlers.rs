use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use super::error::ProxyError;
use super::ProxyState;
use crate::models::PromptRequest;

/// POST /api/generate
///
/// The body is parsed by hand so a malformed request gets the same generic
/// 500 as an upstream failure instead of axum's rejection response. The
/// router lifts the body size limit for the same reason.
pub async fn handle_generate(
    State(state): State<ProxyState>,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let request: PromptRequest = serde_json::from_slice(&body)?;

    let raw = state.generator.generate(request.prompt.as_ref()).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        raw.get().to_string(),
    )
        .into_response())
}
