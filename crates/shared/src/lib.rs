//! Shared utilities and common types for the care home backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Session token generation and hashing
//! - Password hashing with Argon2id
//! - Payload reading and field-level validation

pub mod crypto;
pub mod password;
pub mod validation;
