//! REST API: router assembly, shared state and the JSON error type.

use std::path::Path;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::handler::Handler;
use axum::routing::{self, MethodRouter};
use axum::Router;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::auth::session::SessionManager;
use crate::auth::token::TokenSigner;
use crate::config::Config;
use crate::store::Store;

mod admin;
mod auth;
mod error;
mod games;
mod mining;
mod users;
mod wallet;

pub use error::{ApiError, ApiJson, ApiPath};

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub sessions: Arc<SessionManager>,
    pub signer: TokenSigner,
}

impl AppState {
    pub fn new(store: Arc<Store>, config: &Config) -> Self {
        Self {
            store,
            sessions: Arc::new(SessionManager::new(config.session_ttl)),
            signer: TokenSigner::new(config.token_key),
        }
    }
}

/// `{"message": ...}` acknowledgement body.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

pub fn router(state: AppState, config: &Config) -> Router {
    let api = Router::new()
        .nest("/auth", auth::routes())
        .nest("/user", users::routes())
        .nest("/games", games::routes())
        .nest("/mining", mining::routes())
        .nest("/admin", admin::routes())
        .merge(wallet::routes())
        .fallback(api_not_found);

    Router::new()
        .route("/healthz", routing::get(healthz))
        .nest("/api", api)
        .fallback_service(static_files(&config.static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors(config.allowed_origin.as_deref()))
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn api_not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Not found")
}

async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// `axum::routing::get` answering other methods with a JSON 405.
fn get<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    routing::get(handler).fallback(method_not_allowed)
}

/// `axum::routing::post` answering other methods with a JSON 405.
fn post<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    routing::post(handler).fallback(method_not_allowed)
}

/// The client bundle, with `index.html` answering unknown paths so
/// client-side routes survive a reload.
fn static_files(dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")))
}

fn cors(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);
    match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(_)) => {
            warn!(?origin, "ignoring unparsable CASINO_ALLOWED_ORIGIN");
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}
