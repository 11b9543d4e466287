//! Pagination extractor
//!
//! Extracts offset-based pagination parameters from query strings.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use clipchat_core::Page;
use serde::Deserialize;

use crate::response::ApiError;

/// Default page size
const DEFAULT_LIMIT: i64 = 50;
/// Maximum page size
const MAX_LIMIT: i64 = 100;

/// Raw pagination query parameters
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    /// Number of items to skip
    #[serde(default)]
    pub skip: Option<i64>,
    /// Maximum number of items to return
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Validated pagination window
#[derive(Debug, Clone, Copy)]
pub struct Pagination(pub Page);

impl Default for Pagination {
    fn default() -> Self {
        Self(Page {
            offset: 0,
            limit: DEFAULT_LIMIT,
        })
    }
}

impl Pagination {
    /// The validated offset/limit window
    pub fn page(&self) -> Page {
        self.0
    }
}

impl TryFrom<PaginationParams> for Pagination {
    type Error = ApiError;

    fn try_from(params: PaginationParams) -> Result<Self, Self::Error> {
        let offset = params.skip.unwrap_or(0);
        if offset < 0 {
            return Err(ApiError::invalid_query("'skip' must be non-negative"));
        }

        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

        Ok(Pagination(Page { offset, limit }))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        Pagination::try_from(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pagination() {
        let pagination = Pagination::default();
        assert_eq!(pagination.page().offset, 0);
        assert_eq!(pagination.page().limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_limit_clamping() {
        let over = Pagination::try_from(PaginationParams {
            skip: None,
            limit: Some(500),
        })
        .unwrap();
        assert_eq!(over.page().limit, MAX_LIMIT);

        let under = Pagination::try_from(PaginationParams {
            skip: None,
            limit: Some(0),
        })
        .unwrap();
        assert_eq!(under.page().limit, 1);
    }

    #[test]
    fn test_negative_skip_is_rejected() {
        let result = Pagination::try_from(PaginationParams {
            skip: Some(-1),
            limit: None,
        });
        assert!(result.is_err());
    }
}
