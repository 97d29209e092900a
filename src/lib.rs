use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::middleware::{auth_middleware, log_errors};
use crate::routes::{auth, book, health};
use crate::store::Stores;

pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod result;
pub mod routes;
pub mod store;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub stores: Stores,
}

impl AppState {
    pub fn new(config: Config, stores: Stores) -> Self {
        Self { config, stores }
    }
}

/// Builds the full router. Layers run outermost first: CORS, tracing, 5xx
/// logging, then the bearer-token gate.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/books", get(book::list_books).post(book::create_book))
        .route(
            "/api/books/{id}",
            get(book::get_book)
                .put(book::update_book)
                .delete(book::delete_book),
        )
        .route("/health", get(health::health))
        .route("/docs", get(health::docs))
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .layer(from_fn(log_errors))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
