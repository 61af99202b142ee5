use tracing::info;

use crate::database::error::{DbError, DbResult};
use crate::database::models::{NewStudent, Student, StudentChanges};
use crate::database::resource::Resource;
use crate::database::Repository;

impl Repository {
    pub async fn insert_student(&self, student: &NewStudent) -> DbResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"INSERT INTO students
                (user_id, course_id, date_of_birth, program_start_date, program_end_date,
                 accommodation, amount_paid, gender, student_program, marital_status,
                 health_condition, disability, profile_picture)
               VALUES ($1, $2, $3, COALESCE($4, now()), COALESCE($5, now()),
                       $6, $7, $8, $9, $10, $11, $12, $13)
               RETURNING id"#,
        )
        .bind(student.user_id)
        .bind(student.course_id)
        .bind(student.date_of_birth)
        .bind(student.program_start_date)
        .bind(student.program_end_date)
        .bind(student.accommodation)
        .bind(student.amount_paid)
        .bind(&student.gender)
        .bind(&student.student_program)
        .bind(&student.marital_status)
        .bind(&student.health_condition)
        .bind(&student.disability)
        .bind(&student.profile_picture)
        .fetch_one(self.pool.get_pool())
        .await?;

        info!("Created student {} for user {}", id, student.user_id);
        Ok(id)
    }

    pub async fn update_student(&self, id: i32, changes: &StudentChanges) -> DbResult<()> {
        let result = sqlx::query(
            r#"UPDATE students SET
                user_id = COALESCE($2, user_id),
                course_id = COALESCE($3, course_id),
                date_of_birth = COALESCE($4, date_of_birth),
                program_start_date = COALESCE($5, program_start_date),
                program_end_date = COALESCE($6, program_end_date),
                accommodation = COALESCE($7, accommodation),
                amount_paid = COALESCE($8, amount_paid),
                gender = COALESCE($9, gender),
                student_program = COALESCE($10, student_program),
                marital_status = COALESCE($11, marital_status),
                health_condition = COALESCE($12, health_condition),
                disability = COALESCE($13, disability),
                profile_picture = COALESCE($14, profile_picture)
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(changes.user_id)
        .bind(changes.course_id)
        .bind(changes.date_of_birth)
        .bind(changes.program_start_date)
        .bind(changes.program_end_date)
        .bind(changes.accommodation)
        .bind(changes.amount_paid)
        .bind(&changes.gender)
        .bind(&changes.student_program)
        .bind(&changes.marital_status)
        .bind(&changes.health_condition)
        .bind(&changes.disability)
        .bind(&changes.profile_picture)
        .execute(self.pool.get_pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: Student::SINGULAR,
                id,
            });
        }
        Ok(())
    }
}
