//! Presentation Layer
//!
//! HTTP handlers, DTOs and extractors for the API.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod router;
