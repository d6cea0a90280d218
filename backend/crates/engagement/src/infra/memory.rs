//! In-Memory Repository Implementation
//!
//! Process-local storage behind a single lock. Used by tests and by the
//! server when no database is configured; contents vanish on restart.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::{Id, NotificationId, UserId};
use platform::crypto::random_code;
use tokio::sync::RwLock;

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

/// In-memory engagement repository
#[derive(Clone, Default)]
pub struct InMemoryEngagementRepository {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    sequences: Sequences,
    users: Vec<User>,
    messages: Vec<Message>,
    notifications: Vec<Notification>,
    settings: Vec<Settings>,
    /// owner → code
    referral_codes: HashMap<UserId, String>,
    referrals: Vec<CompletedReferral>,
}

/// Per-table id counters, starting at 1 like a serial column
#[derive(Default)]
struct Sequences {
    users: i64,
    messages: i64,
    notifications: i64,
    settings: i64,
}

fn next<T>(counter: &mut i64) -> Id<T> {
    *counter += 1;
    Id::new(*counter)
}

struct CompletedReferral {
    code: String,
    referrer_id: UserId,
    referred_user_id: UserId,
}

impl InMemoryEngagementRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryState {
    fn user_mut(&mut self, user_id: UserId) -> EngagementResult<&mut User> {
        self.users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(EngagementError::UserNotFound)
    }
}

impl UserRepository for InMemoryEngagementRepository {
    async fn list_users(&self) -> EngagementResult<Vec<User>> {
        Ok(self.state.read().await.users.clone())
    }

    async fn find_user(&self, user_id: UserId) -> EngagementResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn create_user(&self, new_user: &NewUser) -> EngagementResult<User> {
        let mut state = self.state.write().await;
        let user = User {
            id: next(&mut state.sequences.users),
            username: new_user.username.clone(),
            password: new_user.password.clone(),
            points: 0,
            last_checkin: None,
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn add_points(&self, user_id: UserId, delta: i32) -> EngagementResult<User> {
        let mut state = self.state.write().await;
        let user = state.user_mut(user_id)?;
        user.points = user.points.saturating_add(delta);
        Ok(user.clone())
    }

    async fn record_checkin(&self, user_id: UserId, at: DateTime<Utc>) -> EngagementResult<User> {
        let mut state = self.state.write().await;
        let user = state.user_mut(user_id)?;
        user.last_checkin = Some(at);
        user.points = user.points.saturating_add(CHECKIN_POINTS);
        Ok(user.clone())
    }

    async fn leaderboard(&self, page: Page) -> EngagementResult<Vec<User>> {
        let state = self.state.read().await;
        let mut ranked = state.users.clone();
        ranked.sort_by(|a, b| b.points.cmp(&a.points).then(a.id.cmp(&b.id)));

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        Ok(ranked
            .into_iter()
            .skip(offset)
            .take(page.size() as usize)
            .collect())
    }
}

impl MessageRepository for InMemoryEngagementRepository {
    async fn list_messages(&self, user_id: UserId) -> EngagementResult<Vec<Message>> {
        let state = self.state.read().await;
        Ok(state
            .messages
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_message(
        &self,
        new_message: &NewMessage,
        user_id: UserId,
    ) -> EngagementResult<Message> {
        let mut state = self.state.write().await;
        let message = Message {
            id: next(&mut state.sequences.messages),
            user_id,
            content: new_message.content.clone(),
            created_at: Utc::now(),
        };
        state.messages.push(message.clone());
        Ok(message)
    }
}

impl NotificationRepository for InMemoryEngagementRepository {
    async fn create_notification(
        &self,
        new_notification: &NewNotification,
        user_id: UserId,
    ) -> EngagementResult<Notification> {
        let mut state = self.state.write().await;
        let notification = Notification {
            id: next(&mut state.sequences.notifications),
            user_id,
            title: new_notification.title.clone(),
            message: new_notification.message.clone(),
            read: new_notification.read,
            created_at: Utc::now(),
        };
        state.notifications.push(notification.clone());
        Ok(notification)
    }

    /// Newest first
    async fn list_notifications(&self, user_id: UserId) -> EngagementResult<Vec<Notification>> {
        let state = self.state.read().await;
        Ok(state
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn mark_notification_read(
        &self,
        id: NotificationId,
    ) -> EngagementResult<Option<Notification>> {
        let mut state = self.state.write().await;
        Ok(state
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .map(|n| {
                n.read = true;
                n.clone()
            }))
    }

    async fn mark_all_notifications_read(&self, user_id: UserId) -> EngagementResult<()> {
        let mut state = self.state.write().await;
        state
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id)
            .for_each(|n| n.read = true);
        Ok(())
    }

    async fn delete_notification(&self, id: NotificationId) -> EngagementResult<bool> {
        let mut state = self.state.write().await;
        let before = state.notifications.len();
        state.notifications.retain(|n| n.id != id);
        Ok(state.notifications.len() != before)
    }
}

impl SettingsRepository for InMemoryEngagementRepository {
    async fn find_settings(&self, user_id: UserId) -> EngagementResult<Option<Settings>> {
        let state = self.state.read().await;
        Ok(state.settings.iter().find(|s| s.user_id == user_id).cloned())
    }

    async fn create_settings(
        &self,
        new_settings: &NewSettings,
        user_id: UserId,
    ) -> EngagementResult<Settings> {
        let mut state = self.state.write().await;
        if state.settings.iter().any(|s| s.user_id == user_id) {
            return Err(EngagementError::Internal(format!(
                "settings already exist for user {user_id}"
            )));
        }
        let settings = Settings {
            id: next(&mut state.sequences.settings),
            user_id,
            theme: new_settings.theme.clone(),
            notifications: new_settings.notifications,
            email_notifications: new_settings.email_notifications,
        };
        state.settings.push(settings.clone());
        Ok(settings)
    }

    async fn update_settings(
        &self,
        user_id: UserId,
        patch: &SettingsPatch,
    ) -> EngagementResult<Settings> {
        let mut state = self.state.write().await;
        let settings = state
            .settings
            .iter_mut()
            .find(|s| s.user_id == user_id)
            .ok_or_else(|| EngagementError::Internal(format!("no settings for user {user_id}")))?;

        if let Some(theme) = &patch.theme {
            settings.theme = theme.clone();
        }
        if let Some(notifications) = patch.notifications {
            settings.notifications = notifications;
        }
        if let Some(email_notifications) = patch.email_notifications {
            settings.email_notifications = email_notifications;
        }
        Ok(settings.clone())
    }
}

impl ReferralRepository for InMemoryEngagementRepository {
    async fn referral_stats(&self, user_id: UserId) -> EngagementResult<ReferralStats> {
        let mut state = self.state.write().await;

        let referral_code = match state.referral_codes.get(&user_id).cloned() {
            Some(code) => code,
            None => {
                let code = loop {
                    let candidate = random_code(REFERRAL_CODE_LEN);
                    if !state.referral_codes.values().any(|c| *c == candidate) {
                        break candidate;
                    }
                };
                state.referral_codes.insert(user_id, code.clone());
                code
            }
        };

        let completed_referrals = state
            .referrals
            .iter()
            .filter(|r| r.referrer_id == user_id)
            .count() as i64;

        Ok(ReferralStats {
            referral_code,
            completed_referrals,
            points_earned: completed_referrals * i64::from(REFERRAL_POINTS),
        })
    }

    async fn complete_referral(&self, code: &str, user_id: UserId) -> EngagementResult<bool> {
        let mut state = self.state.write().await;

        let Some(referrer_id) = state
            .referral_codes
            .iter()
            .find(|(_, c)| c.as_str() == code)
            .map(|(owner, _)| *owner)
        else {
            return Ok(false);
        };

        let already_completed = state
            .referrals
            .iter()
            .any(|r| r.code == code && r.referred_user_id == user_id);
        if already_completed {
            return Ok(true);
        }

        state.referrals.push(CompletedReferral {
            code: code.to_string(),
            referrer_id,
            referred_user_id: user_id,
        });
        let referrer = state.user_mut(referrer_id)?;
        referrer.points = referrer.points.saturating_add(REFERRAL_POINTS);

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::ClearTextPassword;

    async fn seed_user(repo: &InMemoryEngagementRepository, name: &str) -> User {
        let password = ClearTextPassword::new("pw".to_string())
            .unwrap()
            .hash()
            .unwrap();
        repo.create_user(&NewUser {
            username: name.to_string(),
            password,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let repo = InMemoryEngagementRepository::new();
        let a = seed_user(&repo, "a").await;
        let b = seed_user(&repo, "b").await;
        assert_eq!(a.id.value(), 1);
        assert_eq!(b.id.value(), 2);
    }

    #[tokio::test]
    async fn test_leaderboard_ranking_and_paging() {
        let repo = InMemoryEngagementRepository::new();
        let mut ids = Vec::new();
        for i in 0..12 {
            let user = seed_user(&repo, &format!("user{i}")).await;
            repo.add_points(user.id, i % 4).await.unwrap();
            ids.push(user.id);
        }

        let first = repo.leaderboard(Page::new(0, 10)).await.unwrap();
        assert_eq!(first.len(), 10);
        assert!(first.windows(2).all(|w| w[0].points >= w[1].points));
        // ties keep id order
        assert_eq!(first[0].id, ids[3]);
        assert_eq!(first[1].id, ids[7]);

        let second = repo.leaderboard(Page::new(1, 10)).await.unwrap();
        assert_eq!(second.len(), 2);

        let beyond = repo.leaderboard(Page::new(u32::MAX, 10)).await.unwrap();
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn test_record_checkin_awards_points() {
        let repo = InMemoryEngagementRepository::new();
        let user = seed_user(&repo, "a").await;
        let now = Utc::now();
        let updated = repo.record_checkin(user.id, now).await.unwrap();
        assert_eq!(updated.points, CHECKIN_POINTS);
        assert_eq!(updated.last_checkin, Some(now));
    }

    #[tokio::test]
    async fn test_unknown_notification() {
        let repo = InMemoryEngagementRepository::new();
        let id = NotificationId::new(99);
        assert!(repo.mark_notification_read(id).await.unwrap().is_none());
        assert!(!repo.delete_notification(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_referral_completion_awards_once() {
        let repo = InMemoryEngagementRepository::new();
        let owner = seed_user(&repo, "owner").await;
        let friend = seed_user(&repo, "friend").await;

        let stats = repo.referral_stats(owner.id).await.unwrap();
        assert_eq!(stats.referral_code.len(), REFERRAL_CODE_LEN);
        assert_eq!(stats.completed_referrals, 0);

        assert!(repo.complete_referral(&stats.referral_code, friend.id).await.unwrap());
        assert!(repo.complete_referral(&stats.referral_code, friend.id).await.unwrap());
        assert!(!repo.complete_referral("NOPE0000", friend.id).await.unwrap());

        let stats_after = repo.referral_stats(owner.id).await.unwrap();
        assert_eq!(stats_after.referral_code, stats.referral_code);
        assert_eq!(stats_after.completed_referrals, 1);
        assert_eq!(stats_after.points_earned, i64::from(REFERRAL_POINTS));

        let owner = repo.find_user(owner.id).await.unwrap().unwrap();
        assert_eq!(owner.points, REFERRAL_POINTS);
    }

    #[tokio::test]
    async fn test_update_settings_requires_existing_row() {
        let repo = InMemoryEngagementRepository::new();
        let user = seed_user(&repo, "a").await;
        let err = repo
            .update_settings(user.id, &SettingsPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EngagementError::Internal(_)));
    }
}
