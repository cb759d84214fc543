//! # Notes server
//!
//! REST API for personal notes: rich-text and handwritten notes with folder and tag
//! metadata, stored as JSON documents in Redis.
//!
//! ## Routes
//!
//! Every route expects the caller's id in the `X-User-Id` header, set by the
//! authenticating reverse proxy.
//!
//! - `GET /notes?folder=&tag=`, `POST /notes`
//! - `GET|PUT|DELETE /notes/{id}`
//! - `GET /search?q=` regular expression over titles and contents
//! - `GET /folders`, `GET /tags`
//! - `POST /canvas` opens a drawing session, optionally on an existing handwritten note
//! - `GET|DELETE /canvas/{id}`
//! - `POST /canvas/{id}/strokes`, `POST /canvas/{id}/undo`
//! - `POST /canvas/{id}/pages`, `DELETE /canvas/{id}/pages/current`, `PUT /canvas/{id}/page`
//! - `POST /canvas/{id}/save`
//!
//! ## Drawing sessions
//!
//! The page engine lives in the `ink` crate. A session keeps one notebook in memory
//! until it is saved or discarded, there is no auto-save.
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{
        Method,
        header::{CONTENT_TYPE, HeaderName},
    },
    routing::{delete, get, post, put},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod cache;
pub mod canvas;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod routes;
pub mod search;
pub mod sessions;
pub mod state;
pub mod utils;

use auth::USER_HEADER;
use canvas::{
    add_page_handler, close_canvas_handler, delete_page_handler, go_to_page_handler,
    open_canvas_handler, save_canvas_handler, stroke_handler, undo_handler, view_canvas_handler,
};
use routes::{
    create_note_handler, delete_note_handler, get_note_handler, list_notes_handler,
    update_note_handler,
};
use search::{folders_handler, search_handler, tags_handler};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new()
        .await
        .expect("Failed to connect to the note store");

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    let app = app(state);

    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    info!("Server shut down");
}

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(USER_HEADER)])
        .max_age(Duration::from_secs(state.config.cors_max_age));

    Router::new()
        .route("/notes", get(list_notes_handler).post(create_note_handler))
        .route(
            "/notes/{id}",
            get(get_note_handler)
                .put(update_note_handler)
                .delete(delete_note_handler),
        )
        .route("/search", get(search_handler))
        .route("/folders", get(folders_handler))
        .route("/tags", get(tags_handler))
        .route("/canvas", post(open_canvas_handler))
        .route(
            "/canvas/{id}",
            get(view_canvas_handler).delete(close_canvas_handler),
        )
        .route("/canvas/{id}/strokes", post(stroke_handler))
        .route("/canvas/{id}/undo", post(undo_handler))
        .route("/canvas/{id}/pages", post(add_page_handler))
        .route("/canvas/{id}/pages/current", delete(delete_page_handler))
        .route("/canvas/{id}/page", put(go_to_page_handler))
        .route("/canvas/{id}/save", post(save_canvas_handler))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
