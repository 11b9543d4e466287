//! JWT utilities for authentication
//!
//! Provides token encoding, decoding, and validation using the `jsonwebtoken`
//! crate. Tokens are signed (tamper-evident, not encrypted) with a secret
//! injected at construction; acceptance additionally requires a live ledger
//! row, which is the service layer's concern.

use chrono::{DateTime, Duration, TimeZone, Utc};
use clipchat_core::{Snowflake, TokenKind};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID, as a string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token kind (access or refresh)
    pub kind: TokenKind,
    /// Unique token id; two tokens minted in the same second stay distinct
    pub jti: String,
}

impl Claims {
    /// Get the user ID as a Snowflake
    ///
    /// # Errors
    /// Returns an error if the subject cannot be parsed as a Snowflake
    pub fn user_id(&self) -> Result<Snowflake, AppError> {
        self.sub
            .parse::<i64>()
            .map(Snowflake::new)
            .map_err(|_| AppError::InvalidToken)
    }

    /// Check if this is an access token
    #[must_use]
    pub fn is_access(&self) -> bool {
        self.kind == TokenKind::Access
    }

    /// Check if this is a refresh token
    #[must_use]
    pub fn is_refresh(&self) -> bool {
        self.kind == TokenKind::Refresh
    }
}

/// A signed token together with the expiry recorded in its claims
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Freshly minted access/refresh pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// JWT service for encoding and decoding tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

impl JwtService {
    /// Create a new JWT service with the given secret and expiry times (seconds)
    #[must_use]
    pub fn new(secret: &str, access_token_expiry: i64, refresh_token_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry,
            refresh_token_expiry,
        }
    }

    /// Mint an access/refresh pair for a user
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue_pair(&self, user_id: Snowflake) -> Result<TokenPair, AppError> {
        let access = self.encode_token(user_id, TokenKind::Access)?;
        let refresh = self.encode_token(user_id, TokenKind::Refresh)?;

        Ok(TokenPair {
            access,
            refresh,
            expires_in: self.access_token_expiry,
        })
    }

    /// Encode a single token of the given kind
    fn encode_token(
        &self,
        user_id: Snowflake,
        kind: TokenKind,
    ) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let expiry = match kind {
            TokenKind::Access => self.access_token_expiry,
            TokenKind::Refresh => self.refresh_token_expiry,
        };
        let expires_at = now + Duration::seconds(expiry);

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            kind,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode JWT")))?;

        // Store the second-precision expiry that the claims actually carry
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .unwrap_or(expires_at);

        Ok(IssuedToken { token, expires_at })
    }

    /// Decode and validate a JWT token
    ///
    /// The library rejects expired claims, so a successful decode implies
    /// the signed expiry is still in the future.
    ///
    /// # Errors
    /// Returns an error if the token is invalid or expired
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            }
        })?;

        Ok(token_data.claims)
    }

    /// Decode a token and require the access kind
    ///
    /// # Errors
    /// Returns an error if the token is invalid, expired, or not an access token
    pub fn decode_access(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;

        if !claims.is_access() {
            return Err(AppError::InvalidToken);
        }

        Ok(claims)
    }

    /// Decode a token and require the refresh kind
    ///
    /// # Errors
    /// Returns an error if the token is invalid, expired, or not a refresh token
    pub fn decode_refresh(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;

        if !claims.is_refresh() {
            return Err(AppError::InvalidToken);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret-key-that-is-long-enough", 1800, 604800)
    }

    #[test]
    fn test_issue_pair() {
        let service = create_test_service();
        let user_id = Snowflake::new(12345);

        let pair = service.issue_pair(user_id).unwrap();

        assert!(!pair.access.token.is_empty());
        assert!(!pair.refresh.token.is_empty());
        assert_eq!(pair.expires_in, 1800);
        assert!(pair.access.expires_at < pair.refresh.expires_at);
    }

    #[test]
    fn test_pair_tokens_are_distinct() {
        let service = create_test_service();
        let pair = service.issue_pair(Snowflake::new(1)).unwrap();
        // Same subject, same second - the jti keeps the raw strings apart
        assert_ne!(pair.access.token, pair.refresh.token);

        let pair2 = service.issue_pair(Snowflake::new(1)).unwrap();
        assert_ne!(pair.access.token, pair2.access.token);
        assert_ne!(pair.refresh.token, pair2.refresh.token);
    }

    #[test]
    fn test_decode_access_token() {
        let service = create_test_service();
        let pair = service.issue_pair(Snowflake::new(12345)).unwrap();

        let claims = service.decode_token(&pair.access.token).unwrap();
        assert_eq!(claims.sub, "12345");
        assert!(claims.is_access());
        assert_eq!(claims.exp, pair.access.expires_at.timestamp());
    }

    #[test]
    fn test_decode_refresh_token() {
        let service = create_test_service();
        let pair = service.issue_pair(Snowflake::new(12345)).unwrap();

        let claims = service.decode_token(&pair.refresh.token).unwrap();
        assert_eq!(claims.sub, "12345");
        assert!(claims.is_refresh());
    }

    #[test]
    fn test_kinds_are_not_interchangeable() {
        let service = create_test_service();
        let pair = service.issue_pair(Snowflake::new(12345)).unwrap();

        assert!(service.decode_access(&pair.access.token).is_ok());
        assert!(service.decode_access(&pair.refresh.token).is_err());
        assert!(service.decode_refresh(&pair.refresh.token).is_ok());
        assert!(service.decode_refresh(&pair.access.token).is_err());
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();

        let result = service.decode_token("invalid.token.here");
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let service = create_test_service();
        let other = JwtService::new("a-different-secret-entirely", 1800, 604800);

        let pair = other.issue_pair(Snowflake::new(12345)).unwrap();
        assert!(matches!(
            service.decode_token(&pair.access.token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_claims_user_id() {
        let claims = Claims {
            sub: "12345".to_string(),
            iat: 0,
            exp: i64::MAX,
            kind: TokenKind::Access,
            jti: "jti".to_string(),
        };

        assert_eq!(claims.user_id().unwrap(), Snowflake::new(12345));

        let bad = Claims {
            sub: "not-a-number".to_string(),
            ..claims
        };
        assert!(bad.user_id().is_err());
    }
}
