//! Create User Use Case
//!
//! Explicit user creation. The new user becomes the resolved user for
//! every request that follows.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::domain::entities::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::error::EngagementResult;

/// Create user input
pub struct CreateUserInput {
    pub username: String,
    pub password: String,
}

/// Create user use case
pub struct CreateUserUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> CreateUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, input: CreateUserInput) -> EngagementResult<User> {
        let password = ClearTextPassword::new(input.password)?.hash()?;

        let user = self
            .user_repo
            .create_user(&NewUser {
                username: input.username,
                password,
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User created");

        Ok(user)
    }
}
