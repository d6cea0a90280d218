//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.

use chrono::{DateTime, Utc};
use kernel::id::{NotificationId, UserId};

use crate::domain::entities::{
    Message, NewMessage, NewNotification, NewSettings, NewUser, Notification, ReferralStats,
    Settings, User,
};
use crate::domain::value_objects::{Page, SettingsPatch};
use crate::error::EngagementResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// All users, in no particular order
    async fn list_users(&self) -> EngagementResult<Vec<User>>;

    async fn find_user(&self, user_id: UserId) -> EngagementResult<Option<User>>;

    async fn create_user(&self, new_user: &NewUser) -> EngagementResult<User>;

    /// Add `delta` to the user's points and return the updated user
    async fn add_points(&self, user_id: UserId, delta: i32) -> EngagementResult<User>;

    /// Set the last check-in to `at` and award the check-in reward
    async fn record_checkin(&self, user_id: UserId, at: DateTime<Utc>) -> EngagementResult<User>;

    /// Users ranked by points (descending, ties by id), one page
    async fn leaderboard(&self, page: Page) -> EngagementResult<Vec<User>>;
}

/// Message repository trait
#[trait_variant::make(MessageRepository: Send)]
pub trait LocalMessageRepository {
    async fn list_messages(&self, user_id: UserId) -> EngagementResult<Vec<Message>>;

    async fn create_message(
        &self,
        new_message: &NewMessage,
        user_id: UserId,
    ) -> EngagementResult<Message>;
}

/// Notification repository trait
#[trait_variant::make(NotificationRepository: Send)]
pub trait LocalNotificationRepository {
    async fn create_notification(
        &self,
        new_notification: &NewNotification,
        user_id: UserId,
    ) -> EngagementResult<Notification>;

    async fn list_notifications(&self, user_id: UserId) -> EngagementResult<Vec<Notification>>;

    /// `None` if no notification has this id
    async fn mark_notification_read(&self, id: NotificationId) -> EngagementResult<Option<Notification>>;

    async fn mark_all_notifications_read(&self, user_id: UserId) -> EngagementResult<()>;

    /// `false` if no notification has this id
    async fn delete_notification(&self, id: NotificationId) -> EngagementResult<bool>;
}

/// Settings repository trait
#[trait_variant::make(SettingsRepository: Send)]
pub trait LocalSettingsRepository {
    async fn find_settings(&self, user_id: UserId) -> EngagementResult<Option<Settings>>;

    async fn create_settings(
        &self,
        new_settings: &NewSettings,
        user_id: UserId,
    ) -> EngagementResult<Settings>;

    /// Apply the supplied fields to the user's existing settings
    async fn update_settings(
        &self,
        user_id: UserId,
        patch: &SettingsPatch,
    ) -> EngagementResult<Settings>;
}

/// Referral repository trait
#[trait_variant::make(ReferralRepository: Send)]
pub trait LocalReferralRepository {
    /// Stats for the user's own code, creating the code on first use
    async fn referral_stats(&self, user_id: UserId) -> EngagementResult<ReferralStats>;

    /// Record `user_id` as referred by `code`'s owner.
    ///
    /// `false` if the code does not exist. Completing the same pair twice
    /// is a no-op that still returns `true`.
    async fn complete_referral(&self, code: &str, user_id: UserId) -> EngagementResult<bool>;
}

/// Everything the handler layer needs from storage
pub trait EngagementRepository:
    UserRepository
    + MessageRepository
    + NotificationRepository
    + SettingsRepository
    + ReferralRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<R> EngagementRepository for R where
    R: UserRepository
        + MessageRepository
        + NotificationRepository
        + SettingsRepository
        + ReferralRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
