use tracing::info;

use crate::database::error::{DbError, DbResult};
use crate::database::models::{User, UserChanges};
use crate::database::resource::Resource;
use crate::database::Repository;

/// Columns of a user row ready for insertion. Passwords are already hashed.
pub struct UserRecord {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub other_names: Option<String>,
    pub role: String,
    pub email: String,
    pub username: Option<String>,
    pub default_password: Option<String>,
    pub actual_password: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

/// Stored form of an email: trimmed and lowercased, so uniqueness and login
/// agree on what counts as the same address.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Repository {
    pub async fn insert_user(&self, user: &UserRecord) -> DbResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"INSERT INTO users
                (first_name, last_name, other_names, role, email, username,
                 default_password, actual_password, phone_number, address)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
               RETURNING id"#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.other_names)
        .bind(&user.role)
        .bind(normalize_email(&user.email))
        .bind(&user.username)
        .bind(&user.default_password)
        .bind(&user.actual_password)
        .bind(&user.phone_number)
        .bind(&user.address)
        .fetch_one(self.pool.get_pool())
        .await?;

        info!("Created user {} with role {}", id, user.role);
        Ok(id)
    }

    /// `password_hash` replaces the stored password when present.
    pub async fn update_user(
        &self,
        id: i32,
        changes: &UserChanges,
        password_hash: Option<&str>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                other_names = COALESCE($4, other_names),
                role = COALESCE($5, role),
                email = COALESCE($6, email),
                username = COALESCE($7, username),
                actual_password = COALESCE($8, actual_password),
                phone_number = COALESCE($9, phone_number),
                address = COALESCE($10, address)
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.other_names)
        .bind(&changes.role)
        .bind(changes.email.as_deref().map(normalize_email))
        .bind(&changes.username)
        .bind(password_hash)
        .bind(&changes.phone_number)
        .bind(&changes.address)
        .execute(self.pool.get_pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: User::SINGULAR,
                id,
            });
        }
        Ok(())
    }

    pub async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = $1",
            User::COLUMNS
        ))
        .bind(normalize_email(email))
        .fetch_optional(self.pool.get_pool())
        .await?;

        Ok(user)
    }

    /// Usernames match exactly.
    pub async fn find_user_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            User::COLUMNS
        ))
        .bind(username)
        .fetch_optional(self.pool.get_pool())
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_stored_lowercase() {
        assert_eq!(normalize_email("  Ada@School.Test "), "ada@school.test");
        assert_eq!(normalize_email("ada@school.test"), "ada@school.test");
    }
}
