use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

pub mod clock;
pub mod codegen;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod shortener;
pub mod store;

use clock::{Clock, SystemClock};
use codegen::{CodeSource, RandomCodes};
use shortener::Shortener;

// ── Shared application state ───────────────────────────────────────────────

pub struct AppState {
    pub config: config::AppConfig,
    /// Every submission and visit takes the write lock, so record updates never
    /// interleave.
    pub shortener: RwLock<Shortener>,
}

impl AppState {
    /// State backed by the wall clock and an entropy-seeded code generator.
    pub fn new(config: config::AppConfig) -> Arc<Self> {
        Self::with_parts(
            config,
            Arc::new(SystemClock),
            Box::new(RandomCodes::from_entropy()),
        )
    }

    pub fn with_parts(
        config: config::AppConfig,
        clock: Arc<dyn Clock>,
        codes: Box<dyn CodeSource>,
    ) -> Arc<Self> {
        let shortener = Shortener::new(config.shortener_settings(), clock, codes);
        Arc::new(Self {
            config,
            shortener: RwLock::new(shortener),
        })
    }
}

// ── Router ─────────────────────────────────────────────────────────────────

pub fn router(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/urls", get(handlers::api::list_urls))
        .route("/urls/recent", get(handlers::api::recent_urls));

    Router::new()
        .route("/", get(handlers::shortener::index))
        .route("/stats", get(handlers::shortener::stats))
        .route("/shorten", post(handlers::shortener::shorten))
        .route("/urls/:id/visit", post(handlers::shortener::visit))
        .route("/urls/:id/copy", post(handlers::shortener::copy))
        .route("/health", get(|| async { axum::http::StatusCode::OK }))
        .nest("/api", api_router)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
