//! Engagement Error Types
//!
//! This module provides engagement-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::{PasswordHashError, PasswordPolicyError};
use thiserror::Error;

/// Engagement-specific result type alias
pub type EngagementResult<T> = Result<T, EngagementError>;

/// Engagement-specific error variants
///
/// Callers only ever see three classes: 400, 404 and 500. The variants
/// exist so logs can tell the causes apart.
#[derive(Debug, Error)]
pub enum EngagementError {
    /// Request body failed schema validation
    #[error("Invalid data")]
    InvalidData,

    /// Resolved user already checked in on this calendar day
    #[error("Already checked in today")]
    AlreadyCheckedIn,

    /// Referral completion without both code and target user
    #[error("Referral code and user ID are required")]
    MissingReferralFields,

    #[error("Notification not found")]
    NotificationNotFound,

    #[error("Invalid referral code")]
    InvalidReferralCode,

    #[error("User not found")]
    UserNotFound,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Server-side failure already logged, reported with the endpoint's message
    #[error("{0}")]
    Failed(&'static str),
}

impl EngagementError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngagementError::InvalidData
            | EngagementError::AlreadyCheckedIn
            | EngagementError::MissingReferralFields => ErrorKind::BadRequest,
            EngagementError::NotificationNotFound
            | EngagementError::InvalidReferralCode
            | EngagementError::UserNotFound => ErrorKind::NotFound,
            EngagementError::Database(_)
            | EngagementError::Internal(_)
            | EngagementError::Failed(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            // Storage detail stays in the logs
            EngagementError::Database(_) | EngagementError::Internal(_) => {
                AppError::internal("Internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Replace a server-class failure with the endpoint's own message.
    ///
    /// Client and not-found errors pass through untouched.
    pub fn or_failed(self, message: &'static str) -> Self {
        if self.kind().is_server_error() {
            self.log();
            EngagementError::Failed(message)
        } else {
            self
        }
    }

    /// Fold any failure into 400 "Invalid data".
    ///
    /// Used by create/update endpoints whose only failure response is 400.
    pub fn or_invalid_data(self) -> Self {
        self.log();
        EngagementError::InvalidData
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            EngagementError::Database(e) => {
                tracing::error!(error = %e, "Engagement database error");
            }
            EngagementError::Internal(msg) => {
                tracing::error!(message = %msg, "Engagement internal error");
            }
            EngagementError::AlreadyCheckedIn => {
                tracing::warn!("Repeated check-in rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Engagement error");
            }
        }
    }
}

impl IntoResponse for EngagementError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<PasswordPolicyError> for EngagementError {
    fn from(_: PasswordPolicyError) -> Self {
        EngagementError::InvalidData
    }
}

impl From<PasswordHashError> for EngagementError {
    fn from(err: PasswordHashError) -> Self {
        EngagementError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classes() {
        assert_eq!(EngagementError::InvalidData.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            EngagementError::AlreadyCheckedIn.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EngagementError::MissingReferralFields.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EngagementError::NotificationNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            EngagementError::InvalidReferralCode.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            EngagementError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            EngagementError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_or_failed_only_touches_server_errors() {
        let err = EngagementError::Internal("pool closed".into()).or_failed("Failed to fetch user");
        assert!(matches!(err, EngagementError::Failed("Failed to fetch user")));
        assert_eq!(err.to_app_error().message(), "Failed to fetch user");

        let err = EngagementError::NotificationNotFound.or_failed("Failed to delete notification");
        assert!(matches!(err, EngagementError::NotificationNotFound));
    }

    #[test]
    fn test_or_invalid_data_folds_everything() {
        let err = EngagementError::Database(sqlx::Error::PoolTimedOut).or_invalid_data();
        assert!(matches!(err, EngagementError::InvalidData));
        assert_eq!(err.to_app_error().message(), "Invalid data");
    }

    #[test]
    fn test_storage_detail_not_exposed() {
        let err = EngagementError::Internal("relation \"users\" does not exist".into());
        assert_eq!(err.to_app_error().message(), "Internal server error");
    }

    #[test]
    fn test_client_messages() {
        assert_eq!(
            EngagementError::AlreadyCheckedIn.to_app_error().message(),
            "Already checked in today"
        );
        assert_eq!(
            EngagementError::MissingReferralFields.to_app_error().message(),
            "Referral code and user ID are required"
        );
    }
}
