//! Generic list / search / paginate over any table-backed record.

use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow, Postgres, QueryBuilder};
use tracing::debug;

use super::error::{DbError, DbResult};
use super::Repository;
use crate::utils::pagination::{Page, Paginated};

/// A record stored in one table with an integer `id` primary key.
pub trait Resource: for<'r> FromRow<'r, PgRow> + Serialize + Send + Unpin + 'static {
    const TABLE: &'static str;
    /// Select list, in struct field order.
    const COLUMNS: &'static str;
    /// Plural key used in JSON responses (`students`, `total_students`).
    const COLLECTION: &'static str;
    const SINGULAR: &'static str;
    /// Column matched by `search`, if the resource supports it.
    const SEARCH_COLUMN: Option<&'static str>;
}

/// Escape `LIKE` metacharacters so the term matches literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

fn push_filter<'a, R: Resource>(qb: &mut QueryBuilder<'a, Postgres>, search: Option<&str>) {
    if let (Some(column), Some(term)) = (R::SEARCH_COLUMN, search) {
        qb.push(" WHERE ")
            .push(column)
            .push(" ILIKE ")
            .push_bind(contains_pattern(term));
    }
}

impl Repository {
    /// Rows of `R` ordered by id, optionally filtered by a case-insensitive
    /// substring of `R::SEARCH_COLUMN`, cut to `page`.
    pub async fn list<R: Resource>(
        &self,
        search: Option<&str>,
        page: Page,
    ) -> DbResult<Paginated<R>> {
        let mut count = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", R::TABLE));
        push_filter::<R>(&mut count, search);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(self.pool.get_pool())
            .await?;

        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM {}",
            R::COLUMNS,
            R::TABLE
        ));
        push_filter::<R>(&mut select, search);
        select
            .push(" ORDER BY id LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let items = select
            .build_query_as::<R>()
            .fetch_all(self.pool.get_pool())
            .await?;

        debug!(
            "Listed {} of {} {} (page {}, search={:?})",
            items.len(),
            total,
            R::COLLECTION,
            page.number,
            search
        );

        Ok(Paginated {
            items,
            total,
            page: page.number,
            per_page: page.size,
        })
    }

    pub async fn find<R: Resource>(&self, id: i32) -> DbResult<Option<R>> {
        let row = sqlx::query_as::<_, R>(&format!(
            "SELECT {} FROM {} WHERE id = $1",
            R::COLUMNS,
            R::TABLE
        ))
        .bind(id)
        .fetch_optional(self.pool.get_pool())
        .await?;

        Ok(row)
    }

    /// Returns false when no row had that id.
    pub async fn delete<R: Resource>(&self, id: i32) -> DbResult<bool> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", R::TABLE))
            .bind(id)
            .execute(self.pool.get_pool())
            .await
            .map_err(|e| DbError::from_delete(e, R::SINGULAR, id))?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count<R: Resource>(&self) -> DbResult<i64> {
        let total = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", R::TABLE))
            .fetch_one(self.pool.get_pool())
            .await?;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Admin, Student};

    #[test]
    fn escape_like_metacharacters() {
        assert_eq!(escape_like("web dev"), "web dev");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\path"), "c:\\\\path");
    }

    #[test]
    fn pattern_wraps_term() {
        assert_eq!(contains_pattern("Data"), "%Data%");
    }

    #[test]
    fn filter_only_when_column_and_term_present() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM students");
        push_filter::<Student>(&mut qb, Some("data"));
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM students WHERE student_program ILIKE $1"
        );

        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM students");
        push_filter::<Student>(&mut qb, None);
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM students");

        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM admins");
        push_filter::<Admin>(&mut qb, Some("x"));
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM admins");
    }
}
