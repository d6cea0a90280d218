//! Engagement Router

use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;

use crate::application::config::EngagementConfig;
use crate::domain::repository::EngagementRepository;
use crate::infra::postgres::PgEngagementRepository;
use crate::presentation::handlers::{self, EngagementAppState};

/// Create the engagement router with PostgreSQL repository
pub fn engagement_router(repo: PgEngagementRepository, config: EngagementConfig) -> Router {
    engagement_router_generic(repo, config)
}

/// Create a generic engagement router for any repository implementation
pub fn engagement_router_generic<R>(repo: R, config: EngagementConfig) -> Router
where
    R: EngagementRepository,
{
    let state = EngagementAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/messages",
            get(handlers::list_messages::<R>).post(handlers::send_message::<R>),
        )
        .route("/checkin", post(handlers::check_in::<R>))
        .route("/user", get(handlers::current_user::<R>))
        .route("/users", post(handlers::create_user::<R>))
        .route("/leaderboard", get(handlers::leaderboard::<R>))
        .route(
            "/notifications",
            get(handlers::list_notifications::<R>).post(handlers::create_notification::<R>),
        )
        .route(
            "/notifications/mark-all-read",
            post(handlers::mark_all_notifications_read::<R>),
        )
        .route(
            "/notifications/{id}/read",
            patch(handlers::mark_notification_read::<R>),
        )
        .route(
            "/notifications/{id}",
            delete(handlers::delete_notification::<R>),
        )
        .route(
            "/settings",
            get(handlers::get_settings::<R>).patch(handlers::update_settings::<R>),
        )
        .route("/referral", get(handlers::referral_stats::<R>))
        .route("/referral/complete", post(handlers::complete_referral::<R>))
        .with_state(state)
}
