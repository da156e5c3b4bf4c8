pub mod error;
pub mod query;
pub mod render;
pub mod routes;
pub mod session;

use std::sync::Arc;

use axum::{routing::get, Router};
use sqlx::sqlite::SqlitePool;
use tower_http::trace::TraceLayer;

use crate::render::TemplateEngine;

/// Shared, read-only application resources: the store handle and the
/// templating collaborator.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub engine: Arc<dyn TemplateEngine>,
}

impl AppState {
    pub fn new(pool: SqlitePool, engine: Arc<dyn TemplateEngine>) -> Self {
        Self { pool, engine }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Home
        .route("/", get(routes::home::home))

        // Detail pages
        .route("/item/{playerID}", get(routes::players::player_detail))
        .route("/team/{teamID}", get(routes::teams::team_detail))
        .route("/game/{gameID}", get(routes::games::game_detail))

        // Search forms, reachable by GET (empty form) and POST (submission)
        .route(
            "/search",
            get(routes::players::player_search).post(routes::players::player_search),
        )
        .route(
            "/teamSearch",
            get(routes::teams::team_search).post(routes::teams::team_search),
        )
        .route(
            "/gameSearch",
            get(routes::games::game_search).post(routes::games::game_search),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
