use axum::{
    extract::{Form, Path, State},
    response::Response,
};

use crate::error::AppError;
use crate::query::QueryRequest;
use crate::routes::{self, SearchForm, SearchSpec};
use crate::AppState;

const TEAM_DETAIL_SQL: &str = "SELECT * FROM team WHERE teamID = ?";

const TEAM_SEARCH: SearchSpec = SearchSpec {
    title: "Search Teams",
    template: "teamSearch.html",
    action: "/teamSearch",
    sql: "SELECT * FROM team WHERE name LIKE ? ESCAPE '\\' \
          OR city LIKE ? ESCAPE '\\' OR teamID LIKE ? ESCAPE '\\'",
};

// GET /team/{teamID} - team detail page, titled with the team name
pub async fn team_detail(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Response, AppError> {
    let request = QueryRequest::new(TEAM_DETAIL_SQL).bind(team_id);
    routes::lookup(&state, request, "teamItem.html", |row| {
        routes::title_field(row, "name")
    })
    .await
}

// GET/POST /teamSearch - team search across name, city, identifier
pub async fn team_search(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Result<Response, AppError> {
    routes::run_search(&state, &TEAM_SEARCH, form.search).await
}
