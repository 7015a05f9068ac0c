//! Who is making the request.
//!
//! Authentication happens in front of this server; the proxy passes the
//! verified email in [`USER_EMAIL_HEADER`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::store::User;

use super::error::AppError;
use super::state::AppState;

pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// The signed-in user. Created on first sight.
#[derive(Debug, Clone)]
pub struct Principal(pub User);

#[axum::async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let email = parts
            .headers
            .get(USER_EMAIL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|e| e.contains('@'))
            .ok_or_else(|| AppError::Unauthorized {
                message: "Not signed in".to_string(),
            })?;

        let user = state.store.find_or_create_user(email).await?;
        Ok(Principal(user))
    }
}
