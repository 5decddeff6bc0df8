//! Custom Axum extractors.

pub mod json;
pub mod session;

pub use json::JsonPayload;
pub use session::CurrentUser;
