//! Application services: sessions, cookies, bootstrap and the OpenAI client.

pub mod bootstrap;
pub mod cookies;
pub mod openai;
pub mod sessions;

pub use bootstrap::bootstrap_users;
pub use cookies::CookieHelper;
pub use openai::OpenAiClient;
pub use sessions::{Session, SessionStore};
