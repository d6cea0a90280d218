//! Referral Use Cases

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::EngagementConfig;
use crate::application::current_user::CurrentUserResolver;
use crate::domain::entities::ReferralStats;
use crate::domain::repository::{ReferralRepository, UserRepository};
use crate::error::{EngagementError, EngagementResult};

/// Complete referral input, fields as received
pub struct CompleteReferralInput {
    pub referral_code: Option<String>,
    pub user_id: Option<i64>,
}

pub struct ReferralUseCase<U, R>
where
    U: UserRepository,
    R: ReferralRepository,
{
    user_repo: Arc<U>,
    referral_repo: Arc<R>,
    config: Arc<EngagementConfig>,
}

impl<U, R> ReferralUseCase<U, R>
where
    U: UserRepository,
    R: ReferralRepository,
{
    pub fn new(user_repo: Arc<U>, referral_repo: Arc<R>, config: Arc<EngagementConfig>) -> Self {
        Self {
            user_repo,
            referral_repo,
            config,
        }
    }

    pub async fn stats(&self) -> EngagementResult<ReferralStats> {
        let user = CurrentUserResolver::new(self.user_repo.clone(), self.config.clone())
            .resolve()
            .await?;
        self.referral_repo.referral_stats(user.id).await
    }

    /// Acts on the addressed user, not the resolved one
    pub async fn complete(&self, input: CompleteReferralInput) -> EngagementResult<()> {
        let code = input.referral_code.filter(|c| !c.is_empty());
        let user_id = input.user_id.filter(|id| *id != 0).map(UserId::new);

        let (Some(code), Some(user_id)) = (code, user_id) else {
            return Err(EngagementError::MissingReferralFields);
        };

        if self.user_repo.find_user(user_id).await?.is_none() {
            return Err(EngagementError::UserNotFound);
        }

        if !self.referral_repo.complete_referral(&code, user_id).await? {
            tracing::warn!(code = %code, "Unknown referral code");
            return Err(EngagementError::InvalidReferralCode);
        }

        tracing::info!(code = %code, user_id = %user_id, "Referral completed");
        Ok(())
    }
}
