//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. JSON API handlers return
//! `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rocket_shoes_core::CartRejection;
use serde_json::json;
use thiserror::Error;

use crate::cart::CartError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// A cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),
}

impl AppError {
    /// Stable machine-readable code returned in the response body.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Cart(err) => err.code(),
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Cart(CartError::Rejected(CartRejection::NotFound(_))) => StatusCode::NOT_FOUND,
            Self::Cart(CartError::Rejected(CartRejection::OutOfStock { .. })) => {
                StatusCode::CONFLICT
            }
            Self::Cart(CartError::Fetch(_)) => StatusCode::BAD_GATEWAY,
            Self::Cart(CartError::Persistence(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Cart(CartError::Rejected(rejection)) => rejection.to_string(),
            Self::Cart(CartError::Fetch(_)) => "External service error".to_string(),
            Self::Cart(CartError::Persistence(_)) => "Internal server error".to_string(),
        };

        (
            status,
            Json(json!({ "error": self.code(), "message": message })),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use rocket_shoes_core::ProductId;

    use super::*;
    use crate::api::ApiError;
    use crate::storage::StorageError;

    #[test]
    fn test_app_error_display() {
        let err = AppError::from(CartError::from(CartRejection::NotFound(ProductId::new(4))));
        assert_eq!(err.to_string(), "Cart error: product 4 is not in the cart");
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(CartError::from(CartRejection::NotFound(ProductId::new(1))).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(
                CartError::from(CartRejection::OutOfStock {
                    product_id: ProductId::new(1),
                    requested: 2,
                    available: 1,
                })
                .into()
            ),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(CartError::from(ApiError::Unavailable("down".to_string())).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(
                CartError::from(StorageError::Io(std::io::Error::other("disk full"))).into()
            ),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
