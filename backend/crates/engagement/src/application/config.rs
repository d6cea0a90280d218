//! Application Configuration
//!
//! Business constants for the engagement application layer.

use crate::domain::entities::NewSettings;
use crate::domain::services::CHECKIN_POINTS;
use crate::domain::value_objects::Page;

/// Engagement application configuration
#[derive(Debug, Clone)]
pub struct EngagementConfig {
    /// Users per leaderboard page
    pub leaderboard_page_size: u32,
    /// Points awarded per message sent
    pub message_points: i32,
    /// Name of the user created when storage has none
    pub demo_user_name: String,
    /// Clear text password of the demo user (hashed before storage)
    pub demo_password: String,
    /// Settings for users who never saved any
    pub default_settings: NewSettings,
    /// Title of the notification created by a successful check-in
    pub checkin_notification_title: String,
    /// Body of the notification created by a successful check-in
    pub checkin_notification_message: String,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            leaderboard_page_size: Page::DEFAULT_SIZE,
            message_points: 1,
            demo_user_name: "demo_user".to_string(),
            demo_password: "demo_password".to_string(),
            default_settings: NewSettings::default(),
            checkin_notification_title: "Daily Check-in Complete!".to_string(),
            checkin_notification_message: format!(
                "You earned {CHECKIN_POINTS} points for checking in today."
            ),
        }
    }
}
