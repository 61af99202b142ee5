use tracing::info;

use crate::database::error::{DbError, DbResult};
use crate::database::models::{Admin, AdminChanges, NewAdmin};
use crate::database::resource::Resource;
use crate::database::Repository;

impl Repository {
    /// `password_hash` is the already hashed `admin_password`, if one was given.
    pub async fn insert_admin(&self, admin: &NewAdmin, password_hash: Option<&str>) -> DbResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"INSERT INTO admins (user_id, course_id, student_id, instructor_id, admin_password)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id"#,
        )
        .bind(admin.user_id)
        .bind(admin.course_id)
        .bind(admin.student_id)
        .bind(admin.instructor_id)
        .bind(password_hash)
        .fetch_one(self.pool.get_pool())
        .await?;

        info!("Created admin {} for user {}", id, admin.user_id);
        Ok(id)
    }

    pub async fn update_admin(
        &self,
        id: i32,
        changes: &AdminChanges,
        password_hash: Option<&str>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"UPDATE admins SET
                user_id = COALESCE($2, user_id),
                course_id = COALESCE($3, course_id),
                student_id = COALESCE($4, student_id),
                instructor_id = COALESCE($5, instructor_id),
                admin_password = COALESCE($6, admin_password)
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(changes.user_id)
        .bind(changes.course_id)
        .bind(changes.student_id)
        .bind(changes.instructor_id)
        .bind(password_hash)
        .execute(self.pool.get_pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: Admin::SINGULAR,
                id,
            });
        }
        Ok(())
    }
}
