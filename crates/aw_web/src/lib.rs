//! In-memory articles backend: login plus CRUD on `/api/articles`.

use axum::{
    middleware,
    routing::{post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod auth;
pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::{ServerConfig, ServerState};

pub fn create_app(state: ServerState) -> Router {
    let state = Arc::new(state);

    let articles = Router::new()
        .route(
            "/api/articles",
            axum::routing::get(handlers::list_articles).post(handlers::create_article),
        )
        .route(
            "/api/articles/:id",
            put(handlers::update_article).delete(handlers::delete_article),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_token));

    Router::new()
        .route("/api/login", post(handlers::login))
        .merge(articles)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `addr` and serves in the background. Returns the bound address,
/// which differs from `addr` when port 0 was asked for.
pub async fn spawn(
    addr: SocketAddr,
    state: ServerState,
) -> std::io::Result<(SocketAddr, JoinHandle<std::io::Result<()>>)> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    let app = create_app(state);
    info!("🌐 Articles backend listening on http://{}", local);
    let handle = tokio::spawn(async move { axum::serve(listener, app).await });
    Ok((local, handle))
}

/// Serves until the process is stopped.
pub async fn serve(addr: SocketAddr, state: ServerState) -> std::io::Result<()> {
    let (_, handle) = spawn(addr, state).await?;
    handle
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?
}

pub mod prelude {
    pub use crate::{create_app, serve, spawn, ServerConfig, ServerState};
    pub use aw_core::{Article, Error, Result};
}
