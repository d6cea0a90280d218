//! Notification Use Cases
//!
//! Listing, creating and mark-all act as the resolved user. Mark-read and
//! delete address a notification directly by id.

use std::sync::Arc;

use kernel::id::NotificationId;

use crate::application::config::EngagementConfig;
use crate::application::current_user::CurrentUserResolver;
use crate::domain::entities::{NewNotification, Notification};
use crate::domain::repository::{NotificationRepository, UserRepository};
use crate::error::{EngagementError, EngagementResult};

/// Create notification input
pub struct CreateNotificationInput {
    pub title: String,
    pub message: String,
    pub read: bool,
}

pub struct NotificationsUseCase<U, N>
where
    U: UserRepository,
    N: NotificationRepository,
{
    user_repo: Arc<U>,
    notification_repo: Arc<N>,
    config: Arc<EngagementConfig>,
}

impl<U, N> NotificationsUseCase<U, N>
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

    pub async fn list(&self) -> EngagementResult<Vec<Notification>> {
        let user = self.resolver().resolve().await?;
        self.notification_repo.list_notifications(user.id).await
    }

    pub async fn create(&self, input: CreateNotificationInput) -> EngagementResult<Notification> {
        let user = self.resolver().resolve().await?;

        let notification = self
            .notification_repo
            .create_notification(
                &NewNotification {
                    title: input.title,
                    message: input.message,
                    read: input.read,
                },
                user.id,
            )
            .await?;

        tracing::info!(
            user_id = %user.id,
            notification_id = %notification.id,
            "Notification created"
        );

        Ok(notification)
    }

    /// `raw_id` is the path segment; anything unparseable is an unknown id
    pub async fn mark_read(&self, raw_id: &str) -> EngagementResult<Notification> {
        let id = parse_notification_id(raw_id)?;

        let notification = self
            .notification_repo
            .mark_notification_read(id)
            .await?
            .ok_or(EngagementError::NotificationNotFound)?;

        tracing::info!(notification_id = %id, "Notification marked as read");

        Ok(notification)
    }

    pub async fn mark_all_read(&self) -> EngagementResult<()> {
        let user = self.resolver().resolve().await?;
        self.notification_repo
            .mark_all_notifications_read(user.id)
            .await?;

        tracing::info!(user_id = %user.id, "All notifications marked as read");
        Ok(())
    }

    pub async fn delete(&self, raw_id: &str) -> EngagementResult<()> {
        let id = parse_notification_id(raw_id)?;

        if !self.notification_repo.delete_notification(id).await? {
            return Err(EngagementError::NotificationNotFound);
        }

        tracing::info!(notification_id = %id, "Notification deleted");
        Ok(())
    }

    fn resolver(&self) -> CurrentUserResolver<U> {
        CurrentUserResolver::new(self.user_repo.clone(), self.config.clone())
    }
}

fn parse_notification_id(raw_id: &str) -> EngagementResult<NotificationId> {
    raw_id.parse().map_err(|_| {
        tracing::warn!(raw_id, "Unparseable notification id");
        EngagementError::NotificationNotFound
    })
}
