//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (User, Message, Notification, Settings, ReferralStats)
//! - Domain value objects (Page, SettingsPatch)
//! - Domain services (calendar-day check-in rule)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
