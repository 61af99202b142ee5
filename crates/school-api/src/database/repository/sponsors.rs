use tracing::info;

use crate::database::error::{DbError, DbResult};
use crate::database::models::{NewSponsor, Sponsor, SponsorChanges};
use crate::database::resource::Resource;
use crate::database::Repository;

impl Repository {
    pub async fn insert_sponsor(&self, sponsor: &NewSponsor) -> DbResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"INSERT INTO sponsors
                (user_id, student_id, state_of_origin, lga_of_origin, home_address)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id"#,
        )
        .bind(sponsor.user_id)
        .bind(sponsor.student_id)
        .bind(&sponsor.state_of_origin)
        .bind(&sponsor.lga_of_origin)
        .bind(&sponsor.home_address)
        .fetch_one(self.pool.get_pool())
        .await?;

        info!("Created sponsor {} for student {}", id, sponsor.student_id);
        Ok(id)
    }

    pub async fn update_sponsor(&self, id: i32, changes: &SponsorChanges) -> DbResult<()> {
        let result = sqlx::query(
            r#"UPDATE sponsors SET
                user_id = COALESCE($2, user_id),
                student_id = COALESCE($3, student_id),
                state_of_origin = COALESCE($4, state_of_origin),
                lga_of_origin = COALESCE($5, lga_of_origin),
                home_address = COALESCE($6, home_address)
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(changes.user_id)
        .bind(changes.student_id)
        .bind(&changes.state_of_origin)
        .bind(&changes.lga_of_origin)
        .bind(&changes.home_address)
        .execute(self.pool.get_pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: Sponsor::SINGULAR,
                id,
            });
        }
        Ok(())
    }
}
