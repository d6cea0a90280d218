//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::{MessageId, NotificationId, SettingsId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Message, Notification, ReferralStats, Settings, User};
use crate::domain::value_objects::SettingsPatch;

// ============================================================================
// Users
// ============================================================================

/// User as returned by GET /user, /leaderboard and POST /checkin.
/// The stored credential is deliberately absent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub points: i32,
    pub last_checkin: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            points: user.points,
            last_checkin: user.last_checkin,
            created_at: user.created_at,
        }
    }
}

/// POST /api/users
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
}

/// GET /api/leaderboard?page=N
///
/// Kept as text so a malformed page falls back to 0 instead of failing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub page: Option<String>,
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: MessageId,
    pub user_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            user_id: message.user_id,
            content: message.content,
            created_at: message.created_at,
        }
    }
}

/// POST /api/messages
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub content: String,
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: NotificationId,
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            user_id: notification.user_id,
            title: notification.title,
            message: notification.message,
            read: notification.read,
            created_at: notification.created_at,
        }
    }
}

/// POST /api/notifications
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
}

// ============================================================================
// Settings
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub id: SettingsId,
    pub user_id: UserId,
    pub theme: String,
    pub notifications: bool,
    pub email_notifications: bool,
}

impl From<Settings> for SettingsResponse {
    fn from(settings: Settings) -> Self {
        Self {
            id: settings.id,
            user_id: settings.user_id,
            theme: settings.theme,
            notifications: settings.notifications,
            email_notifications: settings.email_notifications,
        }
    }
}

/// PATCH /api/settings - any subset of fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub theme: Option<String>,
    pub notifications: Option<bool>,
    pub email_notifications: Option<bool>,
}

impl From<UpdateSettingsRequest> for SettingsPatch {
    fn from(req: UpdateSettingsRequest) -> Self {
        Self {
            theme: req.theme,
            notifications: req.notifications,
            email_notifications: req.email_notifications,
        }
    }
}

// ============================================================================
// Referral
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralStatsResponse {
    pub referral_code: String,
    pub completed_referrals: i64,
    pub points_earned: i64,
}

impl From<ReferralStats> for ReferralStatsResponse {
    fn from(stats: ReferralStats) -> Self {
        Self {
            referral_code: stats.referral_code,
            completed_referrals: stats.completed_referrals,
            points_earned: stats.points_earned,
        }
    }
}

/// POST /api/referral/complete
///
/// Both fields are optional at the schema level so their absence can be
/// reported as its own error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteReferralRequest {
    pub referral_code: Option<String>,
    pub user_id: Option<i64>,
}

// ============================================================================
// Common
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
