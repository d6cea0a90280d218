//! Message Use Cases

use std::sync::Arc;

use crate::application::config::EngagementConfig;
use crate::application::current_user::CurrentUserResolver;
use crate::domain::entities::{Message, NewMessage};
use crate::domain::repository::{MessageRepository, UserRepository};
use crate::error::EngagementResult;

/// Send message input
pub struct SendMessageInput {
    pub content: String,
}

/// Listing and sending messages as the resolved user
pub struct MessagesUseCase<U, M>
where
    U: UserRepository,
    M: MessageRepository,
{
    user_repo: Arc<U>,
    message_repo: Arc<M>,
    config: Arc<EngagementConfig>,
}

impl<U, M> MessagesUseCase<U, M>
where
    U: UserRepository,
    M: MessageRepository,
{
    pub fn new(user_repo: Arc<U>, message_repo: Arc<M>, config: Arc<EngagementConfig>) -> Self {
        Self {
            user_repo,
            message_repo,
            config,
        }
    }

    pub async fn list(&self) -> EngagementResult<Vec<Message>> {
        let user = self.resolver().resolve().await?;
        self.message_repo.list_messages(user.id).await
    }

    /// Store the message, then award the sender
    pub async fn send(&self, input: SendMessageInput) -> EngagementResult<Message> {
        let user = self.resolver().resolve().await?;

        let message = self
            .message_repo
            .create_message(
                &NewMessage {
                    content: input.content,
                },
                user.id,
            )
            .await?;

        let user = self
            .user_repo
            .add_points(user.id, self.config.message_points)
            .await?;

        tracing::info!(
            user_id = %user.id,
            message_id = %message.id,
            points = user.points,
            "Message sent"
        );

        Ok(message)
    }

    fn resolver(&self) -> CurrentUserResolver<U> {
        CurrentUserResolver::new(self.user_repo.clone(), self.config.clone())
    }
}
