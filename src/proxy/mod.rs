//! Prompt proxy endpoint
//!
//! A single stateless route that forwards a prompt to the upstream generation
//! service with the server-held key and relays the answer. The key never
//! leaves the server.

pub mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::post,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::ai::GenerationService;
use crate::Result;

pub const GENERATE_PATH: &str = "/api/generate";

/// Shared state injected into the handlers. Holds nothing mutable.
#[derive(Clone)]
pub struct ProxyState {
    pub generator: Arc<dyn GenerationService>,
}

impl ProxyState {
    pub fn new(generator: Arc<dyn GenerationService>) -> Self {
        Self { generator }
    }
}

const ALLOWED_METHODS: &str = "POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";

/// Open CORS policy: any origin, `POST`/`OPTIONS`, `Content-Type`.
/// Every `OPTIONS` request is answered here with 200 and never reaches a
/// handler.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_router(state: ProxyState) -> Router {
    Router::new()
        .route(GENERATE_PATH, post(handlers::handle_generate))
        // Prompts of any size are accepted.
        .layer(DefaultBodyLimit::disable())
        .layer(cors_layer())
        // `CorsLayer` only sets the origin on actual responses; add the rest.
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the proxy on an already bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, state: ProxyState) -> Result<()> {
    let addr: SocketAddr = listener.local_addr()?;
    info!("Proxy listening on {}{}", addr, GENERATE_PATH);

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
