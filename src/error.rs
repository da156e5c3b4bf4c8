use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::render::RenderError;

#[derive(Debug, Error)]
pub enum AppError {
    /// A lookup identifier matched no row.
    #[error("resource not found")]
    NotFound,
    /// Store fault during prepare, bind, or execute. Not recovered; the
    /// in-flight request is aborted.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
            AppError::Database(err) => {
                tracing::error!("query failed: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            AppError::Render(err) => {
                tracing::error!("render failed: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };

        let body = format!(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{status}</title></head>\n\
             <body><h1>{message}</h1></body>\n</html>\n"
        );
        (status, Html(body)).into_response()
    }
}
