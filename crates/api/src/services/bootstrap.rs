//! Startup bootstrap of the well-known accounts.
//!
//! Ensures an `admin` and a `staff` login exist. Idempotent: accounts that
//! are already present are left untouched.

use domain::models::{NewUser, UserRole};
use persistence::{EntityStore, StoreError};
use shared::password::{hash_password, PasswordError};
use tracing::{info, warn};

use crate::config::BootstrapConfig;

/// Error types for user bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),
}

struct SeedAccount<'a> {
    username: &'static str,
    password: &'a str,
    email: &'static str,
    name: &'static str,
    position: &'static str,
    role: UserRole,
}

fn seed_accounts(config: &BootstrapConfig) -> [SeedAccount<'_>; 2] {
    [
        SeedAccount {
            username: "admin",
            password: &config.admin_password,
            email: "admin@carehome.org",
            name: "Admin User",
            position: "System Administrator",
            role: UserRole::Admin,
        },
        SeedAccount {
            username: "staff",
            password: &config.staff_password,
            email: "staff@carehome.org",
            name: "Staff User",
            position: "Care Worker",
            role: UserRole::Staff,
        },
    ]
}

/// Create any missing seed accounts. Returns how many were created.
pub async fn bootstrap_users(
    store: &dyn EntityStore,
    config: &BootstrapConfig,
) -> Result<usize, BootstrapError> {
    if !config.enabled {
        info!("User bootstrap disabled - skipping");
        return Ok(0);
    }

    let mut created = 0;
    for seed in seed_accounts(config) {
        if store.find_user_by_username(seed.username).await?.is_some() {
            continue;
        }

        let new_user = NewUser {
            username: seed.username.to_string(),
            email: seed.email.to_string(),
            password_hash: hash_password(seed.password)?,
            role: seed.role,
            name: Some(seed.name.to_string()),
            position: Some(seed.position.to_string()),
        };

        match store.create_user(new_user).await {
            Ok(user) => {
                info!(user_id = user.id, username = %user.username, "Bootstrap user created");
                created += 1;
            }
            Err(StoreError::Conflict { field }) => {
                warn!(username = seed.username, field, "Bootstrap user conflicts with an existing account - skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }

    if created > 0 && config.admin_password == "admin123" {
        warn!("SECURITY: bootstrap accounts use default passwords. Set CH__BOOTSTRAP__ADMIN_PASSWORD and CH__BOOTSTRAP__STAFF_PASSWORD outside development.");
    }

    Ok(created)
}
