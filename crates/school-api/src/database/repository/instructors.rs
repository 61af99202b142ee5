use tracing::info;

use crate::database::error::{DbError, DbResult};
use crate::database::models::{Instructor, InstructorChanges, NewInstructor};
use crate::database::resource::Resource;
use crate::database::Repository;

impl Repository {
    pub async fn insert_instructor(&self, instructor: &NewInstructor) -> DbResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"INSERT INTO instructors
                (user_id, student_id, course_id, instructor_course, weekly_project, project_grade)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id"#,
        )
        .bind(instructor.user_id)
        .bind(instructor.student_id)
        .bind(instructor.course_id)
        .bind(&instructor.instructor_course)
        .bind(&instructor.weekly_project)
        .bind(&instructor.project_grade)
        .fetch_one(self.pool.get_pool())
        .await?;

        info!("Created instructor {} on course {}", id, instructor.course_id);
        Ok(id)
    }

    pub async fn update_instructor(&self, id: i32, changes: &InstructorChanges) -> DbResult<()> {
        let result = sqlx::query(
            r#"UPDATE instructors SET
                user_id = COALESCE($2, user_id),
                student_id = COALESCE($3, student_id),
                course_id = COALESCE($4, course_id),
                instructor_course = COALESCE($5, instructor_course),
                weekly_project = COALESCE($6, weekly_project),
                project_grade = COALESCE($7, project_grade)
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(changes.user_id)
        .bind(changes.student_id)
        .bind(changes.course_id)
        .bind(&changes.instructor_course)
        .bind(&changes.weekly_project)
        .bind(&changes.project_grade)
        .execute(self.pool.get_pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: Instructor::SINGULAR,
                id,
            });
        }
        Ok(())
    }
}
