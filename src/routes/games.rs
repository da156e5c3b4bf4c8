use axum::{
    extract::{Form, Path, State},
    response::Response,
};

use crate::error::AppError;
use crate::query::QueryRequest;
use crate::routes::{self, SearchForm, SearchSpec};
use crate::AppState;

const GAME_DETAIL_SQL: &str = "SELECT * FROM game WHERE gameID = ?";

const GAME_SEARCH: SearchSpec = SearchSpec {
    title: "Search Games",
    template: "gameSearch.html",
    action: "/gameSearch",
    sql: "SELECT * FROM game WHERE date LIKE ? ESCAPE '\\' \
          OR awayteam LIKE ? ESCAPE '\\' OR hometeam LIKE ? ESCAPE '\\'",
};

// GET /game/{gameID} - game detail page, titled "{away} @ {home} - {date}"
pub async fn game_detail(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Response, AppError> {
    let request = QueryRequest::new(GAME_DETAIL_SQL).bind(game_id);
    routes::lookup(&state, request, "gameItem.html", |row| {
        format!(
            "{} @ {} - {}",
            routes::title_field(row, "awayteamID"),
            routes::title_field(row, "hometeamID"),
            routes::title_field(row, "date")
        )
    })
    .await
}

// GET/POST /gameSearch - game search across date, away team, home team
pub async fn game_search(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Result<Response, AppError> {
    routes::run_search(&state, &GAME_SEARCH, form.search).await
}
