//! Request Extractors

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::EngagementError;

/// JSON body checked against `T`'s shape.
///
/// Any rejection (bad syntax, wrong shape, missing content type) becomes
/// 400 "Invalid data"; the serde detail goes to the debug log only.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = EngagementError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(reason = %rejection.body_text(), "Request body rejected");
                Err(EngagementError::InvalidData)
            }
        }
    }
}
