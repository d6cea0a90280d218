//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Every use case that acts "as the caller" goes through
//! [`current_user::CurrentUserResolver`].

pub mod check_in;
pub mod config;
pub mod current_user;
pub mod leaderboard;
pub mod messages;
pub mod notifications;
pub mod referral;
pub mod settings;
pub mod users;

// Re-exports
pub use check_in::CheckInUseCase;
pub use config::EngagementConfig;
pub use current_user::CurrentUserResolver;
pub use leaderboard::LeaderboardUseCase;
pub use messages::{MessagesUseCase, SendMessageInput};
pub use notifications::{CreateNotificationInput, NotificationsUseCase};
pub use referral::{CompleteReferralInput, ReferralUseCase};
pub use settings::SettingsUseCase;
pub use users::{CreateUserInput, CreateUserUseCase};
