//! Authentication extractor
//!
//! Extracts the bearer token from the Authorization header and runs the full
//! session validation: ledger lookup, signature check, kind check, and user
//! resolution. Handlers receive the resolved user.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use clipchat_core::entities::User;
use clipchat_core::Snowflake;
use clipchat_service::SessionService;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated user resolved from a validated access token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

impl AuthUser {
    /// Create a new AuthUser
    pub fn new(user: User) -> Self {
        Self { user }
    }

    /// The authenticated user's id
    pub fn user_id(&self) -> Snowflake {
        self.user.id
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract the Authorization header
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        // Validate against both the signature and the token ledger
        let app_state = AppState::from_ref(state);
        let service = SessionService::new(app_state.service_context());
        let user = service.validate_access(bearer.token()).await?;

        Ok(AuthUser::new(user))
    }
}
