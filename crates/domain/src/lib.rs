//! Domain layer for the care home backend.
//!
//! This crate contains:
//! - Entity models and their insert shapes (users, residents, staff,
//!   daily logs, incidents, calendar events, documents)
//! - Per-entity payload validation
//! - The AI-assist service and its text-generation port

pub mod models;
pub mod services;
