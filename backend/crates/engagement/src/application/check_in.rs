//! Daily Check-in Use Case

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::application::config::EngagementConfig;
use crate::application::current_user::CurrentUserResolver;
use crate::domain::entities::{NewNotification, User};
use crate::domain::repository::{NotificationRepository, UserRepository};
use crate::domain::services::can_check_in;
use crate::error::{EngagementError, EngagementResult};

/// Check-in use case
///
/// Steps run strictly in order; a failure aborts the rest:
/// resolve user → same-day check → record check-in → notify.
pub struct CheckInUseCase<U, N>
where
    U: UserRepository,
    N: NotificationRepository,
{
    user_repo: Arc<U>,
    notification_repo: Arc<N>,
    config: Arc<EngagementConfig>,
}

impl<U, N> CheckInUseCase<U, N>
where
    U: UserRepository,
    N: NotificationRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        notification_repo: Arc<N>,
        config: Arc<EngagementConfig>,
    ) -> Self {
        Self {
            user_repo,
            notification_repo,
            config,
        }
    }

    /// Check in now, judging "today" by the server's local calendar
    pub async fn execute(&self) -> EngagementResult<User> {
        self.execute_at(Utc::now(), &Local).await
    }

    pub async fn execute_at<Tz>(&self, now: DateTime<Utc>, tz: &Tz) -> EngagementResult<User>
    where
        Tz: TimeZone + Sync,
    {
        let user = CurrentUserResolver::new(self.user_repo.clone(), self.config.clone())
            .resolve()
            .await?;

        if !can_check_in(user.last_checkin, now, tz) {
            tracing::warn!(user_id = %user.id, "Already checked in today");
            return Err(EngagementError::AlreadyCheckedIn);
        }

        let user = self.user_repo.record_checkin(user.id, now).await?;

        self.notification_repo
            .create_notification(
                &NewNotification {
                    title: self.config.checkin_notification_title.clone(),
                    message: self.config.checkin_notification_message.clone(),
                    read: false,
                },
                user.id,
            )
            .await?;

        tracing::info!(user_id = %user.id, points = user.points, "Checked in");

        Ok(user)
    }
}
