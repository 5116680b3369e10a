//! Router builders for the three services.
//!
//! Each builder returns a fully layered `Router` except for CORS and request
//! tracing, which the binary adds so tests can drive the bare routers.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;
use tower_sessions::{cookie::SameSite, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::routes::{caption, files, health_check, liveness, lite, pages, realtime, session, settings};
use crate::{CaptionState, DesktopState, LiteState};

/// Cookie session layer shared by both desktop shells
pub fn session_layer(config: &Config) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.is_production())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
}

/// Caption upload service
pub fn caption_router(state: CaptionState) -> Router {
    let static_dir = ServeDir::new(&state.config.static_dir);
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/", get(pages::caption_index))
        .route("/upload", get(pages::upload_page).post(caption::upload))
        .route("/health", get(liveness))
        .nest_service("/static", static_dir)
        .layer(body_limit)
        .with_state(state)
}

/// Desktop shell backed by SQLite
pub fn desktop_router(state: DesktopState) -> Router {
    let static_dir = ServeDir::new(&state.config.static_dir);
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);
    let sessions = session_layer(&state.config);

    Router::new()
        .route("/", get(pages::desktop_root))
        .route("/login", get(pages::login_page))
        .route("/desktop", get(pages::desktop_page))
        .route("/api/auth/login", post(session::login))
        .route("/api/auth/logout", get(session::logout))
        .route("/api/auth/check-status", get(session::check_status))
        .route("/api/files", get(files::list_files))
        .route("/api/files/upload", post(files::upload_file))
        .route(
            "/api/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route("/ws", get(realtime::realtime))
        .route("/health", get(health_check))
        .nest_service("/static", static_dir)
        .layer(body_limit)
        .layer(sessions)
        .with_state(state)
}

/// Lite desktop shell with a fixed credential table
pub fn lite_router(state: LiteState) -> Router {
    let static_dir = ServeDir::new(&state.config.static_dir);
    let assets_dir = ServeDir::new(&state.config.assets_dir);
    let sessions = session_layer(&state.config);

    Router::new()
        .route("/", get(pages::lite_index))
        .route("/api/login", post(lite::login))
        .route("/api/logout", post(lite::logout))
        .route("/api/check-login", get(lite::check_login))
        .route("/health", get(liveness))
        .nest_service("/static", static_dir)
        .nest_service("/assets", assets_dir)
        .layer(sessions)
        .with_state(state)
}
