mod admins;
mod courses;
mod instructors;
mod sponsors;
mod students;
mod users;

pub use users::UserRecord;

use super::DbPool;

pub struct Repository {
    pub pool: DbPool,
}

impl Repository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}
