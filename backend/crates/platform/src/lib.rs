//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Random code generation
//! - Credential hashing (Argon2id)

pub mod crypto;
pub mod password;
