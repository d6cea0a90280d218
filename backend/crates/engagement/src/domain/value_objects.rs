//! Domain Value Objects
//!
//! Immutable value types for the engagement domain.

use crate::domain::entities::NewSettings;

/// One leaderboard page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    index: u32,
    size: u32,
}

impl Page {
    pub const DEFAULT_SIZE: u32 = 10;

    pub fn new(index: u32, size: u32) -> Self {
        Self { index, size }
    }

    /// Lenient parse of the `page` query parameter.
    ///
    /// Absent, negative or non-numeric input means the first page.
    pub fn from_query(raw: Option<&str>, size: u32) -> Self {
        let index = raw.and_then(|s| s.trim().parse::<u32>().ok()).unwrap_or(0);
        Self::new(index, size)
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Rows to skip before this page
    pub fn offset(&self) -> u64 {
        u64::from(self.index).saturating_mul(u64::from(self.size))
    }
}

/// Partial settings update: any subset of fields
///
/// `None` means "leave alone"; `Some(false)` is a real value and must
/// never be replaced by a default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub theme: Option<String>,
    pub notifications: Option<bool>,
    pub email_notifications: Option<bool>,
}

impl SettingsPatch {
    /// Supplied fields over `defaults`, for users with no settings yet
    pub fn over_defaults(self, defaults: &NewSettings) -> NewSettings {
        NewSettings {
            theme: self.theme.unwrap_or_else(|| defaults.theme.clone()),
            notifications: self.notifications.unwrap_or(defaults.notifications),
            email_notifications: self
                .email_notifications
                .unwrap_or(defaults.email_notifications),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.theme.is_none() && self.notifications.is_none() && self.email_notifications.is_none()
    }
}
