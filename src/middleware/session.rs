//! Session middleware

use axum::{
    extract::{State, Request},
    middleware::Next,
    response::Response,
    http::{header::{COOKIE, SET_COOKIE}, HeaderMap, HeaderValue},
};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::{AppState, AppError};

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "iih_session";

/// Session context attached to every request.
///
/// A new context carries a fresh id that is only stored once a handler
/// writes to it.
#[derive(Debug, Clone, Copy)]
pub struct SessionContext {
    pub id: Uuid,
    pub is_new: bool,
}

/// Middleware: resolve the caller's session, issue a cookie once one is stored
pub async fn attach_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let context = match session_id_from_headers(req.headers()) {
        Some(id) if state.sessions.touch(id) => SessionContext { id, is_new: false },
        _ => SessionContext { id: Uuid::new_v4(), is_new: true },
    };

    req.extensions_mut().insert(context);

    let mut response = next.run(req).await;

    if context.is_new && state.sessions.contains(context.id) {
        tracing::debug!("Started session {}", context.id);
        let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, context.id);
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }

    response
}

/// Extract the session id from the Cookie header(s)
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions
            .get::<SessionContext>()
            .copied()
            .ok_or_else(|| AppError::InternalError("session middleware not installed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_from_cookie_header() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}; other=1", SESSION_COOKIE, id)).unwrap(),
        );
        assert_eq!(session_id_from_headers(&headers), Some(id));
    }

    #[test]
    fn test_session_id_missing_or_malformed() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_id_from_headers(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("iih_session=not-a-uuid"));
        assert_eq!(session_id_from_headers(&headers), None);
    }
}
