//! Authentication gate

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::debug;

use crate::{error::AppResult, session};

/// Authentication middleware
///
/// Inserts the [`SessionContext`](crate::models::SessionContext) into request
/// extensions, or redirects to the login page when the session has no user.
pub async fn require_session(
    session: Session,
    mut req: Request,
    next: Next,
) -> AppResult<Response> {
    match session::current_user(&session).await? {
        Some(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        None => {
            debug!("No authenticated session for {}", req.uri().path());
            Ok(Redirect::to("/login").into_response())
        }
    }
}
