use axum::{extract::State, response::Response};
use serde_json::json;

use crate::error::AppError;
use crate::render::Page;
use crate::routes;
use crate::session::CurrentUser;
use crate::AppState;

// GET / - home page; the optional session user passes through untouched
pub async fn home(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    let page = Page::new(
        "home",
        json!({
            "pageTitle": "Home",
            "user": user,
        }),
    );
    routes::respond(&state, page)
}
