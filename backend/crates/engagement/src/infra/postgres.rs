//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{NotificationId, UserId};
use platform::crypto::random_code;
use platform::password::HashedPassword;
use sqlx::PgPool;

use crate::domain::entities::{
    Message, NewMessage, NewNotification, NewSettings, NewUser, Notification, ReferralStats,
    Settings, User,
};
use crate::domain::repository::{
    MessageRepository, NotificationRepository, ReferralRepository, SettingsRepository,
    UserRepository,
};
use crate::domain::services::{CHECKIN_POINTS, REFERRAL_CODE_LEN, REFERRAL_POINTS};
use crate::domain::value_objects::{Page, SettingsPatch};
use crate::error::{EngagementError, EngagementResult};

/// Attempts at drawing an unused referral code before giving up
const REFERRAL_CODE_ATTEMPTS: usize = 5;

/// PostgreSQL-backed engagement repository
#[derive(Clone)]
pub struct PgEngagementRepository {
    pool: PgPool,
}

impl PgEngagementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgEngagementRepository {
    async fn list_users(&self) -> EngagementResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password, points, last_checkin, created_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn find_user(&self, user_id: UserId) -> EngagementResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password, points, last_checkin, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn create_user(&self, new_user: &NewUser) -> EngagementResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password)
            VALUES ($1, $2)
            RETURNING id, username, password, points, last_checkin, created_at
            "#,
        )
        .bind(&new_user.username)
        .bind(new_user.password.as_phc_string())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id = row.id, "User row inserted");

        row.into_user()
    }

    async fn add_points(&self, user_id: UserId, delta: i32) -> EngagementResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET points = points + $2
            WHERE id = $1
            RETURNING id, username, password, points, last_checkin, created_at
            "#,
        )
        .bind(user_id.value())
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(EngagementError::UserNotFound)?.into_user()
    }

    async fn record_checkin(&self, user_id: UserId, at: DateTime<Utc>) -> EngagementResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET last_checkin = $2, points = points + $3
            WHERE id = $1
            RETURNING id, username, password, points, last_checkin, created_at
            "#,
        )
        .bind(user_id.value())
        .bind(at)
        .bind(CHECKIN_POINTS)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(EngagementError::UserNotFound)?.into_user()
    }

    async fn leaderboard(&self, page: Page) -> EngagementResult<Vec<User>> {
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password, points, last_checkin, created_at
            FROM users
            ORDER BY points DESC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(page.size()))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }
}

// ============================================================================
// Message Repository Implementation
// ============================================================================

impl MessageRepository for PgEngagementRepository {
    async fn list_messages(&self, user_id: UserId) -> EngagementResult<Vec<Message>> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, user_id, content, created_at
            FROM messages
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MessageRow::into_message).collect())
    }

    async fn create_message(
        &self,
        new_message: &NewMessage,
        user_id: UserId,
    ) -> EngagementResult<Message> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (user_id, content)
            VALUES ($1, $2)
            RETURNING id, user_id, content, created_at
            "#,
        )
        .bind(user_id.value())
        .bind(&new_message.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_message())
    }
}

// ============================================================================
// Notification Repository Implementation
// ============================================================================

impl NotificationRepository for PgEngagementRepository {
    async fn create_notification(
        &self,
        new_notification: &NewNotification,
        user_id: UserId,
    ) -> EngagementResult<Notification> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO notifications (user_id, title, message, read)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, message, read, created_at
            "#,
        )
        .bind(user_id.value())
        .bind(&new_notification.title)
        .bind(&new_notification.message)
        .bind(new_notification.read)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_notification())
    }

    async fn list_notifications(&self, user_id: UserId) -> EngagementResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, user_id, title, message, read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY id DESC
            "#,
        )
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(NotificationRow::into_notification)
            .collect())
    }

    async fn mark_notification_read(
        &self,
        id: NotificationId,
    ) -> EngagementResult<Option<Notification>> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            UPDATE notifications
            SET read = TRUE
            WHERE id = $1
            RETURNING id, user_id, title, message, read, created_at
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(NotificationRow::into_notification))
    }

    async fn mark_all_notifications_read(&self, user_id: UserId) -> EngagementResult<()> {
        let updated = sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1")
            .bind(user_id.value())
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::debug!(user_id = %user_id, updated, "Notifications marked read");
        Ok(())
    }

    async fn delete_notification(&self, id: NotificationId) -> EngagementResult<bool> {
        let deleted = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Settings Repository Implementation
// ============================================================================

impl SettingsRepository for PgEngagementRepository {
    async fn find_settings(&self, user_id: UserId) -> EngagementResult<Option<Settings>> {
        let row = sqlx::query_as::<_, SettingsRow>(
            r#"
            SELECT id, user_id, theme, notifications, email_notifications
            FROM settings
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SettingsRow::into_settings))
    }

    async fn create_settings(
        &self,
        new_settings: &NewSettings,
        user_id: UserId,
    ) -> EngagementResult<Settings> {
        let row = sqlx::query_as::<_, SettingsRow>(
            r#"
            INSERT INTO settings (user_id, theme, notifications, email_notifications)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, theme, notifications, email_notifications
            "#,
        )
        .bind(user_id.value())
        .bind(&new_settings.theme)
        .bind(new_settings.notifications)
        .bind(new_settings.email_notifications)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_settings())
    }

    async fn update_settings(
        &self,
        user_id: UserId,
        patch: &SettingsPatch,
    ) -> EngagementResult<Settings> {
        // NULL binds keep the stored value
        let row = sqlx::query_as::<_, SettingsRow>(
            r#"
            UPDATE settings
            SET theme = COALESCE($2, theme),
                notifications = COALESCE($3, notifications),
                email_notifications = COALESCE($4, email_notifications),
                updated_at = now()
            WHERE user_id = $1
            RETURNING id, user_id, theme, notifications, email_notifications
            "#,
        )
        .bind(user_id.value())
        .bind(patch.theme.as_deref())
        .bind(patch.notifications)
        .bind(patch.email_notifications)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SettingsRow::into_settings)
            .ok_or_else(|| EngagementError::Internal(format!("no settings for user {user_id}")))
    }
}

// ============================================================================
// Referral Repository Implementation
// ============================================================================

impl PgEngagementRepository {
    /// The user's referral code, inserting a fresh one if absent
    async fn ensure_referral_code(&self, user_id: UserId) -> EngagementResult<String> {
        for _ in 0..REFERRAL_CODE_ATTEMPTS {
            // A code collision also lands in DO NOTHING; the SELECT below
            // then finds no row and we draw again.
            sqlx::query(
                r#"
                INSERT INTO referral_codes (code, user_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(random_code(REFERRAL_CODE_LEN))
            .bind(user_id.value())
            .execute(&self.pool)
            .await?;

            let code = sqlx::query_scalar::<_, String>(
                "SELECT code FROM referral_codes WHERE user_id = $1",
            )
            .bind(user_id.value())
            .fetch_optional(&self.pool)
            .await?;

            if let Some(code) = code {
                return Ok(code);
            }
        }

        Err(EngagementError::Internal(
            "could not allocate a unique referral code".to_string(),
        ))
    }
}

impl ReferralRepository for PgEngagementRepository {
    async fn referral_stats(&self, user_id: UserId) -> EngagementResult<ReferralStats> {
        let referral_code = self.ensure_referral_code(user_id).await?;

        let completed_referrals =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM referrals WHERE referrer_id = $1")
                .bind(user_id.value())
                .fetch_one(&self.pool)
                .await?;

        Ok(ReferralStats {
            referral_code,
            completed_referrals,
            points_earned: completed_referrals * i64::from(REFERRAL_POINTS),
        })
    }

    async fn complete_referral(&self, code: &str, user_id: UserId) -> EngagementResult<bool> {
        let mut tx = self.pool.begin().await?;

        let referrer_id =
            sqlx::query_scalar::<_, i64>("SELECT user_id FROM referral_codes WHERE code = $1")
                .bind(code)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(referrer_id) = referrer_id else {
            return Ok(false);
        };

        let inserted = sqlx::query(
            r#"
            INSERT INTO referrals (code, referrer_id, referred_user_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (code, referred_user_id) DO NOTHING
            "#,
        )
        .bind(code)
        .bind(referrer_id)
        .bind(user_id.value())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted > 0 {
            sqlx::query("UPDATE users SET points = points + $2 WHERE id = $1")
                .bind(referrer_id)
                .bind(REFERRAL_POINTS)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            referrer_id,
            referred_user_id = %user_id,
            newly_completed = inserted > 0,
            "Referral recorded"
        );

        Ok(true)
    }
}

// Internal row types for sqlx mapping
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password: String,
    points: i32,
    last_checkin: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> EngagementResult<User> {
        let password = HashedPassword::from_phc_string(self.password)?;
        Ok(User {
            id: UserId::new(self.id),
            username: self.username,
            password,
            points: self.points,
            last_checkin: self.last_checkin,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: i64,
    user_id: i64,
    content: String,
    created_at: DateTime<Utc>,
}

impl MessageRow {
    fn into_message(self) -> Message {
        Message {
            id: self.id.into(),
            user_id: self.user_id.into(),
            content: self.content,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: i64,
    user_id: i64,
    title: String,
    message: String,
    read: bool,
    created_at: DateTime<Utc>,
}

impl NotificationRow {
    fn into_notification(self) -> Notification {
        Notification {
            id: self.id.into(),
            user_id: self.user_id.into(),
            title: self.title,
            message: self.message,
            read: self.read,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SettingsRow {
    id: i64,
    user_id: i64,
    theme: String,
    notifications: bool,
    email_notifications: bool,
}

impl SettingsRow {
    fn into_settings(self) -> Settings {
        Settings {
            id: self.id.into(),
            user_id: self.user_id.into(),
            theme: self.theme,
            notifications: self.notifications,
            email_notifications: self.email_notifications,
        }
    }
}
