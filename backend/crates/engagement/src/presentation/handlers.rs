//! HTTP Handlers
//!
//! One handler per endpoint. Each maps its own failures: server-class
//! errors become the endpoint's message via `or_failed`, and endpoints
//! whose only failure response is 400 fold everything via
//! `or_invalid_data`.

use axum::Json;
use axum::extract::{Path, Query, State};
use std::sync::Arc;

use crate::application::{
    CheckInUseCase, CompleteReferralInput, CreateNotificationInput, CreateUserInput,
    CreateUserUseCase, CurrentUserResolver, EngagementConfig, LeaderboardUseCase,
    MessagesUseCase, NotificationsUseCase, ReferralUseCase, SendMessageInput, SettingsUseCase,
};
use crate::domain::repository::EngagementRepository;
use crate::error::{EngagementError, EngagementResult};
use crate::presentation::dto::{
    CompleteReferralRequest, CreateNotificationRequest, CreateUserRequest, LeaderboardQuery,
    MessageResponse, NotificationResponse, ReferralStatsResponse, SendMessageRequest,
    SettingsResponse, SuccessResponse, UpdateSettingsRequest, UserResponse,
};
use crate::presentation::extract::ValidatedJson;

/// Shared state for engagement handlers
#[derive(Clone)]
pub struct EngagementAppState<R>
where
    R: EngagementRepository,
{
    pub repo: Arc<R>,
    pub config: Arc<EngagementConfig>,
}

// ============================================================================
// Messages
// ============================================================================

/// GET /api/messages
pub async fn list_messages<R>(
    State(state): State<EngagementAppState<R>>,
) -> EngagementResult<Json<Vec<MessageResponse>>>
where
    R: EngagementRepository,
{
    let use_case =
        MessagesUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let messages = use_case
        .list()
        .await
        .map_err(|e| e.or_failed("Failed to fetch messages"))?;

    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}

/// POST /api/messages
pub async fn send_message<R>(
    State(state): State<EngagementAppState<R>>,
    ValidatedJson(req): ValidatedJson<SendMessageRequest>,
) -> EngagementResult<Json<MessageResponse>>
where
    R: EngagementRepository,
{
    let use_case =
        MessagesUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let message = use_case
        .send(SendMessageInput {
            content: req.content,
        })
        .await
        .map_err(EngagementError::or_invalid_data)?;

    Ok(Json(message.into()))
}

// ============================================================================
// Check-in
// ============================================================================

/// POST /api/checkin
pub async fn check_in<R>(
    State(state): State<EngagementAppState<R>>,
) -> EngagementResult<Json<UserResponse>>
where
    R: EngagementRepository,
{
    let use_case =
        CheckInUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let user = use_case
        .execute()
        .await
        .map_err(|e| e.or_failed("Failed to check in"))?;

    Ok(Json(user.into()))
}

// ============================================================================
// Users
// ============================================================================

/// GET /api/user
pub async fn current_user<R>(
    State(state): State<EngagementAppState<R>>,
) -> EngagementResult<Json<UserResponse>>
where
    R: EngagementRepository,
{
    let user = CurrentUserResolver::new(state.repo.clone(), state.config.clone())
        .resolve()
        .await
        .map_err(|e| e.or_failed("Failed to fetch user"))?;

    Ok(Json(user.into()))
}

/// POST /api/users
pub async fn create_user<R>(
    State(state): State<EngagementAppState<R>>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> EngagementResult<Json<UserResponse>>
where
    R: EngagementRepository,
{
    let use_case = CreateUserUseCase::new(state.repo.clone());

    let user = use_case
        .execute(CreateUserInput {
            username: req.username,
            password: req.password,
        })
        .await
        .map_err(EngagementError::or_invalid_data)?;

    Ok(Json(user.into()))
}

/// GET /api/leaderboard?page=N
pub async fn leaderboard<R>(
    State(state): State<EngagementAppState<R>>,
    Query(query): Query<LeaderboardQuery>,
) -> EngagementResult<Json<Vec<UserResponse>>>
where
    R: EngagementRepository,
{
    let use_case = LeaderboardUseCase::new(state.repo.clone(), state.config.clone());

    let users = use_case
        .execute(query.page.as_deref())
        .await
        .map_err(|e| e.or_failed("Failed to fetch leaderboard"))?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ============================================================================
// Notifications
// ============================================================================

fn notifications_use_case<R>(state: &EngagementAppState<R>) -> NotificationsUseCase<R, R>
where
    R: EngagementRepository,
{
    NotificationsUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone())
}

/// GET /api/notifications
pub async fn list_notifications<R>(
    State(state): State<EngagementAppState<R>>,
) -> EngagementResult<Json<Vec<NotificationResponse>>>
where
    R: EngagementRepository,
{
    let notifications = notifications_use_case(&state)
        .list()
        .await
        .map_err(|e| e.or_failed("Failed to fetch notifications"))?;

    Ok(Json(
        notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    ))
}

/// POST /api/notifications
pub async fn create_notification<R>(
    State(state): State<EngagementAppState<R>>,
    ValidatedJson(req): ValidatedJson<CreateNotificationRequest>,
) -> EngagementResult<Json<NotificationResponse>>
where
    R: EngagementRepository,
{
    let notification = notifications_use_case(&state)
        .create(CreateNotificationInput {
            title: req.title,
            message: req.message,
            read: req.read,
        })
        .await
        .map_err(EngagementError::or_invalid_data)?;

    Ok(Json(notification.into()))
}

/// PATCH /api/notifications/{id}/read
pub async fn mark_notification_read<R>(
    State(state): State<EngagementAppState<R>>,
    Path(id): Path<String>,
) -> EngagementResult<Json<NotificationResponse>>
where
    R: EngagementRepository,
{
    let notification = notifications_use_case(&state)
        .mark_read(&id)
        .await
        .map_err(|e| e.or_failed("Failed to mark notification as read"))?;

    Ok(Json(notification.into()))
}

/// POST /api/notifications/mark-all-read
pub async fn mark_all_notifications_read<R>(
    State(state): State<EngagementAppState<R>>,
) -> EngagementResult<Json<SuccessResponse>>
where
    R: EngagementRepository,
{
    notifications_use_case(&state)
        .mark_all_read()
        .await
        .map_err(|e| e.or_failed("Failed to mark all notifications as read"))?;

    Ok(Json(SuccessResponse::ok()))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification<R>(
    State(state): State<EngagementAppState<R>>,
    Path(id): Path<String>,
) -> EngagementResult<Json<SuccessResponse>>
where
    R: EngagementRepository,
{
    notifications_use_case(&state)
        .delete(&id)
        .await
        .map_err(|e| e.or_failed("Failed to delete notification"))?;

    Ok(Json(SuccessResponse::ok()))
}

// ============================================================================
// Settings
// ============================================================================

/// GET /api/settings
pub async fn get_settings<R>(
    State(state): State<EngagementAppState<R>>,
) -> EngagementResult<Json<SettingsResponse>>
where
    R: EngagementRepository,
{
    let use_case =
        SettingsUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let settings = use_case
        .get()
        .await
        .map_err(|e| e.or_failed("Failed to fetch settings"))?;

    Ok(Json(settings.into()))
}

/// PATCH /api/settings
pub async fn update_settings<R>(
    State(state): State<EngagementAppState<R>>,
    ValidatedJson(req): ValidatedJson<UpdateSettingsRequest>,
) -> EngagementResult<Json<SettingsResponse>>
where
    R: EngagementRepository,
{
    let use_case =
        SettingsUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let settings = use_case
        .update(req.into())
        .await
        .map_err(EngagementError::or_invalid_data)?;

    Ok(Json(settings.into()))
}

// ============================================================================
// Referral
// ============================================================================

/// GET /api/referral
pub async fn referral_stats<R>(
    State(state): State<EngagementAppState<R>>,
) -> EngagementResult<Json<ReferralStatsResponse>>
where
    R: EngagementRepository,
{
    let use_case =
        ReferralUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let stats = use_case
        .stats()
        .await
        .map_err(|e| e.or_failed("Failed to fetch referral stats"))?;

    Ok(Json(stats.into()))
}

/// POST /api/referral/complete
pub async fn complete_referral<R>(
    State(state): State<EngagementAppState<R>>,
    ValidatedJson(req): ValidatedJson<CompleteReferralRequest>,
) -> EngagementResult<Json<SuccessResponse>>
where
    R: EngagementRepository,
{
    let use_case =
        ReferralUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    use_case
        .complete(CompleteReferralInput {
            referral_code: req.referral_code,
            user_id: req.user_id,
        })
        .await
        .map_err(|e| e.or_failed("Failed to complete referral"))?;

    Ok(Json(SuccessResponse::ok()))
}
