//! First-run seeding: an admin account so a fresh database can be logged into.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::auth::{PasswordService, Role};
use crate::config::AuthConfig;
use crate::database::{Repository, User, UserRecord};

/// Creates the configured admin user when the `users` table is empty.
/// Returns the new user id, or `None` when nothing was created.
pub async fn ensure_bootstrap_admin(repository: &Repository, auth: &AuthConfig) -> Result<Option<i32>> {
    let (email, password) = match (&auth.bootstrap_admin_email, &auth.bootstrap_admin_password) {
        (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
            (email.trim().to_string(), password.clone())
        }
        (None, None) => return Ok(None),
        _ => {
            warn!("Bootstrap admin needs both an email and a password; skipping");
            return Ok(None);
        }
    };

    if repository.count::<User>().await? > 0 {
        return Ok(None);
    }

    let hash = PasswordService::hash(password)
        .await
        .context("hashing bootstrap admin password")?;

    let id = repository
        .insert_user(&UserRecord {
            first_name: None,
            last_name: None,
            other_names: None,
            role: Role::Admin.as_str().to_string(),
            email: email.clone(),
            username: None,
            default_password: None,
            actual_password: hash,
            phone_number: None,
            address: None,
        })
        .await
        .context("creating bootstrap admin")?;

    info!("Bootstrap admin {} created as user {}", email, id);
    Ok(Some(id))
}
