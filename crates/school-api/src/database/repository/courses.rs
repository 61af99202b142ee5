use tracing::info;

use crate::database::error::{DbError, DbResult};
use crate::database::models::{Course, CourseChanges, NewCourse};
use crate::database::resource::Resource;
use crate::database::Repository;

impl Repository {
    pub async fn insert_course(&self, course: &NewCourse) -> DbResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"INSERT INTO courses
                (user_id, course_title, course_description, course_instructor, course_outline,
                 course_material, registered_students, course_start_date, course_end_date,
                 course_project, course_assignment)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
               RETURNING id"#,
        )
        .bind(course.user_id)
        .bind(&course.course_title)
        .bind(&course.course_description)
        .bind(&course.course_instructor)
        .bind(&course.course_outline)
        .bind(&course.course_material)
        .bind(&course.registered_students)
        .bind(course.course_start_date)
        .bind(course.course_end_date)
        .bind(&course.course_project)
        .bind(&course.course_assignment)
        .fetch_one(self.pool.get_pool())
        .await?;

        info!("Created course {} ({})", id, course.course_title);
        Ok(id)
    }

    pub async fn update_course(&self, id: i32, changes: &CourseChanges) -> DbResult<()> {
        let result = sqlx::query(
            r#"UPDATE courses SET
                user_id = COALESCE($2, user_id),
                course_title = COALESCE($3, course_title),
                course_description = COALESCE($4, course_description),
                course_instructor = COALESCE($5, course_instructor),
                course_outline = COALESCE($6, course_outline),
                course_material = COALESCE($7, course_material),
                registered_students = COALESCE($8, registered_students),
                course_start_date = COALESCE($9, course_start_date),
                course_end_date = COALESCE($10, course_end_date),
                course_project = COALESCE($11, course_project),
                course_assignment = COALESCE($12, course_assignment)
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(changes.user_id)
        .bind(&changes.course_title)
        .bind(&changes.course_description)
        .bind(&changes.course_instructor)
        .bind(&changes.course_outline)
        .bind(&changes.course_material)
        .bind(&changes.registered_students)
        .bind(changes.course_start_date)
        .bind(changes.course_end_date)
        .bind(&changes.course_project)
        .bind(&changes.course_assignment)
        .execute(self.pool.get_pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: Course::SINGULAR,
                id,
            });
        }
        Ok(())
    }
}
