use axum::{
    extract::{Form, Path, State},
    response::Response,
};

use crate::error::AppError;
use crate::query::QueryRequest;
use crate::routes::{self, SearchForm, SearchSpec};
use crate::AppState;

const PLAYER_DETAIL_SQL: &str = "SELECT p.fname AS fname, p.lname AS lname, p.dob, p.height, \
     p.weight, p.position, p.team, p.mpg, p.ppg, p.rpg, p.apg, p.spg, p.bpg, p.fg, \
     t.name AS teamname \
     FROM player p JOIN team t ON p.teamID = t.teamID \
     WHERE p.playerID = ?";

const PLAYER_SEARCH: SearchSpec = SearchSpec {
    title: "Search",
    template: "search.html",
    action: "/search",
    sql: "SELECT * FROM player WHERE fname LIKE ? ESCAPE '\\' \
          OR lname LIKE ? ESCAPE '\\' OR team LIKE ? ESCAPE '\\'",
};

// GET /item/{playerID} - player detail page, titled "{fname} {lname}"
pub async fn player_detail(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Response, AppError> {
    let request = QueryRequest::new(PLAYER_DETAIL_SQL).bind(player_id);
    routes::lookup(&state, request, "item.html", |row| {
        format!(
            "{} {}",
            routes::title_field(row, "fname"),
            routes::title_field(row, "lname")
        )
    })
    .await
}

// GET/POST /search - player search across first name, last name, team name
pub async fn player_search(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Result<Response, AppError> {
    routes::run_search(&state, &PLAYER_SEARCH, form.search).await
}
