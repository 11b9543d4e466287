//! Session service - credential authentication and token lifecycle
//!
//! Owns the whole bearer-token state machine: issuing pairs on login,
//! validating access tokens against both the signature and the ledger,
//! one-time-use refresh rotation, and revocation. A ledger row moves from
//! issued to revoked and never back; expired-but-unrevoked rows are only
//! revoked when next presented.

use chrono::Utc;
use clipchat_common::auth::{hash_password, verify_password, TokenPair};
use clipchat_common::AppError;
use clipchat_core::entities::{AuthToken, TokenKind, User};
use clipchat_core::Snowflake;
use tracing::{info, instrument, warn};

use crate::dto::{LoginRequest, RegisterRequest, TokenPairResponse, UserResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Session service
pub struct SessionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SessionService<'a> {
    /// Create a new SessionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user
    ///
    /// Registration does not log the user in; clients call login afterwards.
    #[instrument(skip(self, request), fields(username = %request.username, email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<UserResponse> {
        if self.ctx.user_repo().email_exists(&request.email).await? {
            return Err(ServiceError::conflict("Email already registered"));
        }

        if self
            .ctx
            .user_repo()
            .username_exists(&request.username)
            .await?
        {
            return Err(ServiceError::conflict("Username already taken"));
        }

        let password_hash =
            hash_password(&request.password).map_err(|e| ServiceError::internal(e.to_string()))?;

        let user = User::new(self.ctx.generate_id(), request.email, request.username);
        self.ctx.user_repo().create(&user, &password_hash).await?;

        info!(user_id = %user.id, "User registered successfully");

        Ok(UserResponse::from(user))
    }

    /// Verify credentials and return the matching user
    ///
    /// Unknown email and wrong password yield the same failure kind; callers
    /// cannot probe which addresses are registered.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<User> {
        let user = self
            .ctx
            .user_repo()
            .find_by_email(email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: user not found");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let is_valid = verify_password(password, &password_hash)
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        if !is_valid {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(ServiceError::App(AppError::InvalidCredentials));
        }

        Ok(user)
    }

    /// Login with email and password, minting a fresh token pair
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<TokenPairResponse> {
        let user = self.authenticate(&request.email, &request.password).await?;

        if !user.is_active() {
            warn!(user_id = %user.id, "Login rejected: account deactivated");
            return Err(ServiceError::App(AppError::AccountDeactivated));
        }

        let pair = self.issue_token_pair(user.id).await?;

        info!(user_id = %user.id, "User logged in successfully");

        Ok(TokenPairResponse::new(
            pair.access.token,
            pair.refresh.token,
            pair.expires_in,
        ))
    }

    /// Mint an access/refresh pair and persist both in the ledger
    ///
    /// A signature alone is never enough for acceptance; the ledger row is
    /// what makes server-side revocation possible later.
    #[instrument(skip(self))]
    pub async fn issue_token_pair(&self, user_id: Snowflake) -> ServiceResult<TokenPair> {
        let pair = self
            .ctx
            .jwt_service()
            .issue_pair(user_id)
            .map_err(ServiceError::from)?;

        let access_row = AuthToken::new(
            self.ctx.generate_id(),
            pair.access.token.clone(),
            TokenKind::Access,
            user_id,
            pair.access.expires_at,
        );
        self.ctx.token_repo().insert(&access_row).await?;

        let refresh_row = AuthToken::new(
            self.ctx.generate_id(),
            pair.refresh.token.clone(),
            TokenKind::Refresh,
            user_id,
            pair.refresh.expires_at,
        );
        self.ctx.token_repo().insert(&refresh_row).await?;

        Ok(pair)
    }

    /// Validate a bearer access token and resolve its user
    ///
    /// Every failure surfaces as a 401 to the caller; the branches below are
    /// only distinguishable in the logs.
    #[instrument(skip(self, raw))]
    pub async fn validate_access(&self, raw: &str) -> ServiceResult<User> {
        // (a) the ledger row must exist and not be revoked
        let row = self
            .ctx
            .token_repo()
            .find_by_token(raw)
            .await?
            .ok_or_else(|| {
                warn!("Access rejected: token not in ledger");
                ServiceError::App(AppError::TokenRevoked)
            })?;

        if row.revoked {
            warn!(token_id = %row.id, "Access rejected: token revoked");
            return Err(ServiceError::App(AppError::TokenRevoked));
        }

        // (b) signature and claims; the decoder rejects expired claims itself
        let claims = self.ctx.jwt_service().decode_token(raw).map_err(|e| {
            warn!(token_id = %row.id, error = %e, "Access rejected: bad or expired claims");
            ServiceError::App(e)
        })?;

        // (c) only the access kind passes here
        if !claims.is_access() {
            warn!(token_id = %row.id, "Access rejected: wrong token kind");
            return Err(ServiceError::App(AppError::InvalidToken));
        }

        // (d) the subject must still exist
        let user_id = claims.user_id().map_err(ServiceError::App)?;
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| {
                warn!(%user_id, "Access rejected: subject no longer exists");
                ServiceError::App(AppError::InvalidToken)
            })?;

        Ok(user)
    }

    /// Rotate a refresh token into a new pair (one-time use)
    ///
    /// The presented token's ledger row dies on success, and every live
    /// access token of the subject dies with it, whatever its own expiry.
    #[instrument(skip(self, raw))]
    pub async fn rotate_on_refresh(&self, raw: &str) -> ServiceResult<TokenPairResponse> {
        let row = self
            .ctx
            .token_repo()
            .find_by_token(raw)
            .await?
            .ok_or_else(|| {
                warn!("Refresh rejected: token not in ledger");
                ServiceError::App(AppError::InvalidToken)
            })?;

        if row.kind != TokenKind::Refresh || row.revoked {
            warn!(token_id = %row.id, "Refresh rejected: wrong kind or revoked");
            return Err(ServiceError::App(AppError::InvalidToken));
        }

        // Lazy expiry: an expired-but-unrevoked row is collapsed to revoked
        // the moment it is presented
        if row.is_expired(Utc::now()) {
            self.ctx.token_repo().revoke(row.id).await?;
            warn!(token_id = %row.id, "Refresh rejected: token expired");
            return Err(ServiceError::App(AppError::TokenExpired));
        }

        let claims = self.ctx.jwt_service().decode_refresh(raw).map_err(|e| {
            warn!(token_id = %row.id, error = %e, "Refresh rejected: bad claims");
            ServiceError::App(e)
        })?;
        let user_id = claims.user_id().map_err(ServiceError::App)?;

        // Forced rotation: old access tokens die immediately
        let revoked = self.ctx.token_repo().revoke_access_for_user(user_id).await?;

        let pair = self.issue_token_pair(user_id).await?;

        // One-time use: the presented refresh token cannot be replayed
        self.ctx.token_repo().revoke(row.id).await?;

        info!(%user_id, revoked_access = revoked, "Tokens rotated successfully");

        Ok(TokenPairResponse::new(
            pair.access.token,
            pair.refresh.token,
            pair.expires_in,
        ))
    }

    /// Revoke the ledger row matching a raw token
    ///
    /// Silent no-op when the token is unknown; logout always succeeds.
    #[instrument(skip(self, raw))]
    pub async fn revoke(&self, raw: &str) -> ServiceResult<()> {
        if let Some(row) = self.ctx.token_repo().find_by_token(raw).await? {
            self.ctx.token_repo().revoke(row.id).await?;
            info!(token_id = %row.id, user_id = %row.user_id, "Token revoked");
        }
        Ok(())
    }

    /// Revoke every token of a user, regardless of kind ("log out everywhere")
    #[instrument(skip(self))]
    pub async fn revoke_all(&self, user_id: Snowflake) -> ServiceResult<()> {
        let revoked = self.ctx.token_repo().revoke_all_for_user(user_id).await?;
        info!(%user_id, revoked, "All tokens revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::requests::LoginRequest;
    use crate::services::testing::test_context;
    use chrono::Duration;

    async fn register_alice(ctx: &ServiceContext) -> UserResponse {
        SessionService::new(ctx)
            .register(RegisterRequest {
                email: "a@x.com".to_string(),
                username: "alice".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap()
    }

    fn login_request() -> LoginRequest {
        LoginRequest {
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email_and_username() {
        let ctx = test_context();
        register_alice(&ctx).await;

        let service = SessionService::new(&ctx);
        let dup_email = service
            .register(RegisterRequest {
                email: "a@x.com".to_string(),
                username: "alice2".to_string(),
                password: "secret1".to_string(),
            })
            .await;
        assert!(matches!(dup_email, Err(ServiceError::Conflict(_))));
        assert_eq!(dup_email.unwrap_err().status_code(), 400);

        let dup_username = service
            .register(RegisterRequest {
                email: "b@x.com".to_string(),
                username: "alice".to_string(),
                password: "secret1".to_string(),
            })
            .await;
        assert!(matches!(dup_username, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_authenticate_failures_are_uniform() {
        let ctx = test_context();
        register_alice(&ctx).await;
        let service = SessionService::new(&ctx);

        assert!(service.authenticate("a@x.com", "secret1").await.is_ok());

        // Wrong password and unknown email fail with the same kind
        let wrong_password = service.authenticate("a@x.com", "secret2").await;
        let unknown_email = service.authenticate("nobody@x.com", "secret1").await;

        assert!(matches!(
            wrong_password,
            Err(ServiceError::App(AppError::InvalidCredentials))
        ));
        assert!(matches!(
            unknown_email,
            Err(ServiceError::App(AppError::InvalidCredentials))
        ));
    }

    #[tokio::test]
    async fn test_login_then_validate_access() {
        let ctx = test_context();
        let profile = register_alice(&ctx).await;
        let service = SessionService::new(&ctx);

        let pair = service.login(login_request()).await.unwrap();
        assert_eq!(pair.token_type, "bearer");

        let user = service.validate_access(&pair.access_token).await.unwrap();
        assert_eq!(user.id, profile.id);
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_valid_for_access() {
        let ctx = test_context();
        register_alice(&ctx).await;
        let service = SessionService::new(&ctx);

        let pair = service.login(login_request()).await.unwrap();
        let result = service.validate_access(&pair.refresh_token).await;
        assert_eq!(result.unwrap_err().status_code(), 401);
    }

    #[tokio::test]
    async fn test_revoked_access_token_stops_validating() {
        let ctx = test_context();
        register_alice(&ctx).await;
        let service = SessionService::new(&ctx);

        let pair = service.login(login_request()).await.unwrap();
        assert!(service.validate_access(&pair.access_token).await.is_ok());

        service.revoke(&pair.access_token).await.unwrap();
        let result = service.validate_access(&pair.access_token).await;
        assert!(matches!(
            result,
            Err(ServiceError::App(AppError::TokenRevoked))
        ));
    }

    #[tokio::test]
    async fn test_unknown_token_fails_validation() {
        let ctx = test_context();
        register_alice(&ctx).await;
        let service = SessionService::new(&ctx);

        // Properly signed but never persisted
        let pair = ctx
            .jwt_service()
            .issue_pair(clipchat_core::Snowflake::new(42))
            .unwrap();
        let result = service.validate_access(&pair.access.token).await;
        assert_eq!(result.unwrap_err().status_code(), 401);
    }

    #[tokio::test]
    async fn test_rotation_is_one_time_use() {
        let ctx = test_context();
        register_alice(&ctx).await;
        let service = SessionService::new(&ctx);

        let pair = service.login(login_request()).await.unwrap();
        let rotated = service.rotate_on_refresh(&pair.refresh_token).await.unwrap();
        assert_ne!(rotated.refresh_token, pair.refresh_token);

        // Replaying the consumed refresh token fails
        let replay = service.rotate_on_refresh(&pair.refresh_token).await;
        assert_eq!(replay.unwrap_err().status_code(), 401);

        // The fresh pair still works
        assert!(service.validate_access(&rotated.access_token).await.is_ok());
        assert!(service.rotate_on_refresh(&rotated.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_rotation_kills_prior_access_tokens() {
        let ctx = test_context();
        register_alice(&ctx).await;
        let service = SessionService::new(&ctx);

        let first = service.login(login_request()).await.unwrap();
        let second = service.login(login_request()).await.unwrap();
        assert!(service.validate_access(&first.access_token).await.is_ok());

        let rotated = service.rotate_on_refresh(&second.refresh_token).await.unwrap();

        // Every previously issued access token fails, expiry notwithstanding
        assert!(service.validate_access(&first.access_token).await.is_err());
        assert!(service.validate_access(&second.access_token).await.is_err());
        assert!(service.validate_access(&rotated.access_token).await.is_ok());

        // Other refresh tokens survive rotation
        assert!(service.rotate_on_refresh(&first.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_expired_refresh_row_is_lazily_revoked() {
        let ctx = test_context();
        let profile = register_alice(&ctx).await;
        let service = SessionService::new(&ctx);

        // Plant a ledger row whose stored expiry has already passed
        let stale = AuthToken::new(
            ctx.generate_id(),
            "stale-refresh-token".to_string(),
            TokenKind::Refresh,
            profile.id,
            Utc::now() - Duration::minutes(5),
        );
        ctx.token_repo().insert(&stale).await.unwrap();

        let result = service.rotate_on_refresh("stale-refresh-token").await;
        assert!(matches!(
            result,
            Err(ServiceError::App(AppError::TokenExpired))
        ));

        // The row collapsed to revoked; a second attempt now fails the
        // revocation check instead
        let row = ctx
            .token_repo()
            .find_by_token("stale-refresh-token")
            .await
            .unwrap()
            .unwrap();
        assert!(row.revoked);
    }

    #[tokio::test]
    async fn test_revoke_unknown_token_is_silent() {
        let ctx = test_context();
        let service = SessionService::new(&ctx);
        assert!(service.revoke("never-issued").await.is_ok());
    }

    #[tokio::test]
    async fn test_revoke_all_logs_out_everywhere() {
        let ctx = test_context();
        let profile = register_alice(&ctx).await;
        let service = SessionService::new(&ctx);

        let a = service.login(login_request()).await.unwrap();
        let b = service.login(login_request()).await.unwrap();

        service.revoke_all(profile.id).await.unwrap();

        assert!(service.validate_access(&a.access_token).await.is_err());
        assert!(service.validate_access(&b.access_token).await.is_err());
        assert!(service.rotate_on_refresh(&a.refresh_token).await.is_err());
        assert!(service.rotate_on_refresh(&b.refresh_token).await.is_err());
    }
}
