//! Current User Resolution
//!
//! There is no authentication: "the caller" is the most recently created
//! user, or a freshly created demo user when storage is empty. This is the
//! only place that convention lives; swapping in real identity means
//! replacing this resolver.
//!
//! Creating another user silently changes who every later request acts as.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::EngagementConfig;
use crate::domain::entities::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::error::EngagementResult;

/// Resolves the acting user
pub struct CurrentUserResolver<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<EngagementConfig>,
}

impl<U> CurrentUserResolver<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<EngagementConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Most recently created user wins
    pub async fn resolve(&self) -> EngagementResult<User> {
        let users = self.user_repo.list_users().await?;

        match users.into_iter().max_by_key(|u| (u.created_at, u.id)) {
            Some(user) => Ok(user),
            None => self.create_demo_user().await,
        }
    }

    async fn create_demo_user(&self) -> EngagementResult<User> {
        let password = ClearTextPassword::new(self.config.demo_password.clone())?.hash()?;

        let user = self
            .user_repo
            .create_user(&NewUser {
                username: self.config.demo_user_name.clone(),
                password,
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "Created demo user");

        Ok(user)
    }
}
