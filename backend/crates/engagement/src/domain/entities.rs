//! Domain Entities
//!
//! Shapes owned by the storage collaborator. The handler layer only reads
//! them and hands creation data back.

use chrono::{DateTime, Utc};
use kernel::id::{MessageId, NotificationId, SettingsId, UserId};
use platform::password::HashedPassword;

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Argon2id hash; never leaves the server
    pub password: HashedPassword,
    pub points: i32,
    pub last_checkin: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: HashedPassword,
}

/// Message entity
#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub user_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub content: String,
}

/// Notification entity
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub read: bool,
}

/// Settings entity (one per user)
#[derive(Debug, Clone)]
pub struct Settings {
    pub id: SettingsId,
    pub user_id: UserId,
    pub theme: String,
    pub notifications: bool,
    pub email_notifications: bool,
}

/// Fully specified settings for creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSettings {
    pub theme: String,
    pub notifications: bool,
    pub email_notifications: bool,
}

impl Default for NewSettings {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            notifications: true,
            email_notifications: false,
        }
    }
}

/// Referral summary for one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralStats {
    /// The user's own code, handed out to invitees
    pub referral_code: String,
    pub completed_referrals: i64,
    pub points_earned: i64,
}
