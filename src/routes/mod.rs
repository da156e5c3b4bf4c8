pub mod games;
pub mod home;
pub mod players;
pub mod teams;

use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::AppError;
use crate::query::{self, QueryRequest, Row};
use crate::render::{value_text, Page};
use crate::AppState;

/// The single free-text field shared by the three search forms. Absent on a
/// plain GET of the form page, present (possibly blank) once submitted.
#[derive(Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search: Option<String>,
}

/// Per-entity wiring for a search page: page title, template, form action,
/// and a query template with three positional LIKE placeholders.
pub(crate) struct SearchSpec {
    pub title: &'static str,
    pub template: &'static str,
    pub action: &'static str,
    pub sql: &'static str,
}

/// Render a page through the configured templating engine.
pub(crate) fn respond(state: &AppState, page: Page) -> Result<Response, AppError> {
    let markup = state.engine.render(page.template, &page.data)?;
    Ok((page.status, Html(markup)).into_response())
}

/// Run a single-identifier lookup and render its detail template. Zero
/// matching rows is a not-found response, never an index into nothing.
pub(crate) async fn lookup(
    state: &AppState,
    request: QueryRequest,
    template: &'static str,
    title: impl Fn(&Row) -> String,
) -> Result<Response, AppError> {
    let rows = query::execute(&state.pool, request).await?.rows();
    let first = rows.first().ok_or(AppError::NotFound)?;
    let page_title = title(first);

    let page = Page::new(
        template,
        json!({
            "pageTitle": page_title,
            "results": rows,
        }),
    );
    respond(state, page)
}

/// Drive one search form request. A blank or absent term issues no query
/// and re-renders the form; a valid term fans out across the spec's three
/// OR'd columns with one wildcard-wrapped bind value.
pub(crate) async fn run_search(
    state: &AppState,
    spec: &SearchSpec,
    submitted: Option<String>,
) -> Result<Response, AppError> {
    let was_submitted = submitted.is_some();
    let term = submitted.as_deref().unwrap_or("").trim().to_string();

    let mut form = Map::new();
    let results = if term.is_empty() {
        if was_submitted {
            form.insert(
                "error".to_string(),
                Value::from("Search term must not be blank."),
            );
        }
        Value::Null
    } else {
        form.insert("value".to_string(), Value::from(term.as_str()));
        let pattern = query::like_pattern(&term);
        let request = QueryRequest::new(spec.sql)
            .bind(pattern.as_str())
            .bind(pattern.as_str())
            .bind(pattern.as_str());
        let rows = query::execute(&state.pool, request).await?.rows();
        Value::Array(rows.into_iter().map(Value::Object).collect())
    };

    let page = Page::new(
        spec.template,
        json!({
            "pageTitle": spec.title,
            "action": spec.action,
            "form": form,
            "results": results,
        }),
    );
    respond(state, page)
}

/// Title fragment from one row field, formatted for display.
pub(crate) fn title_field(row: &Row, key: &str) -> String {
    row.get(key).map(value_text).unwrap_or_default()
}
