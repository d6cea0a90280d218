//! Leaderboard Use Case

use std::sync::Arc;

use crate::application::config::EngagementConfig;
use crate::domain::entities::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_objects::Page;
use crate::error::EngagementResult;

pub struct LeaderboardUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<EngagementConfig>,
}

impl<U> LeaderboardUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<EngagementConfig>) -> Self {
        Self { user_repo, config }
    }

    /// `raw_page` is the unparsed `page` query value
    pub async fn execute(&self, raw_page: Option<&str>) -> EngagementResult<Vec<User>> {
        let page = Page::from_query(raw_page, self.config.leaderboard_page_size);
        let users = self.user_repo.leaderboard(page).await?;

        tracing::debug!(page = page.index(), returned = users.len(), "Leaderboard page");

        Ok(users)
    }
}
