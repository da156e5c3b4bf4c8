use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

/// Optional signed-in user supplied by the session collaborator, carried
/// here as a `user` cookie. Passed into handlers as an explicit request
/// context value rather than read from shared state.
pub struct CurrentUser(pub Option<String>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(user_from_cookies(&parts.headers)))
    }
}

fn user_from_cookies(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == "user" && !value.is_empty()).then(|| value.to_string())
    })
}
