//! Engagement Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, calendar rules, repository traits
//! - `application/` - Use cases and the current-user resolver
//! - `infra/` - PostgreSQL and in-memory storage
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Chat messages that earn points for the sender
//! - Daily check-in, limited to one per calendar day
//! - Paged points leaderboard
//! - Notifications, settings, and referral rewards
//!
//! There is no authentication. Every request acts as the most recently
//! created user, and a demo user is created when storage is empty.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::EngagementConfig;
pub use error::{EngagementError, EngagementResult};
pub use infra::memory::InMemoryEngagementRepository;
pub use infra::postgres::PgEngagementRepository;
pub use presentation::router::{engagement_router, engagement_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
