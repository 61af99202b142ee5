pub mod error;
pub mod models;
pub mod pool;
pub mod repository;
pub mod resource;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pool::DbPool;
pub use repository::{Repository, UserRecord};
pub use resource::Resource;
