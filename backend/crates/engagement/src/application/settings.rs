//! Settings Use Cases
//!
//! Creation and partial update stay two separate paths: a user with no
//! settings gets the patch merged over the defaults, a user with settings
//! gets only the supplied fields changed.

use std::sync::Arc;

use crate::application::config::EngagementConfig;
use crate::application::current_user::CurrentUserResolver;
use crate::domain::entities::Settings;
use crate::domain::repository::{SettingsRepository, UserRepository};
use crate::domain::value_objects::SettingsPatch;
use crate::error::EngagementResult;

pub struct SettingsUseCase<U, S>
where
    U: UserRepository,
    S: SettingsRepository,
{
    user_repo: Arc<U>,
    settings_repo: Arc<S>,
    config: Arc<EngagementConfig>,
}

impl<U, S> SettingsUseCase<U, S>
where
    U: UserRepository,
    S: SettingsRepository,
{
    pub fn new(user_repo: Arc<U>, settings_repo: Arc<S>, config: Arc<EngagementConfig>) -> Self {
        Self {
            user_repo,
            settings_repo,
            config,
        }
    }

    /// Existing settings, or the defaults persisted on first read
    pub async fn get(&self) -> EngagementResult<Settings> {
        let user = self.resolver().resolve().await?;

        if let Some(settings) = self.settings_repo.find_settings(user.id).await? {
            return Ok(settings);
        }

        let settings = self
            .settings_repo
            .create_settings(&self.config.default_settings, user.id)
            .await?;

        tracing::info!(user_id = %user.id, "Default settings created");

        Ok(settings)
    }

    pub async fn update(&self, patch: SettingsPatch) -> EngagementResult<Settings> {
        let user = self.resolver().resolve().await?;

        let settings = match self.settings_repo.find_settings(user.id).await? {
            None => {
                let new_settings = patch.over_defaults(&self.config.default_settings);
                self.settings_repo
                    .create_settings(&new_settings, user.id)
                    .await?
            }
            Some(_) => self.settings_repo.update_settings(user.id, &patch).await?,
        };

        tracing::info!(user_id = %user.id, theme = %settings.theme, "Settings updated");

        Ok(settings)
    }

    fn resolver(&self) -> CurrentUserResolver<U> {
        CurrentUserResolver::new(self.user_repo.clone(), self.config.clone())
    }
}
