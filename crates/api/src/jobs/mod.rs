//! Background job scheduler and job implementations.

mod prune_sessions;
mod scheduler;

pub use prune_sessions::PruneSessionsJob;
pub use scheduler::{Job, JobScheduler};
