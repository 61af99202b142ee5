pub mod error;
pub mod extract;
pub mod pagination;

pub use error::ApiError;
pub use extract::{ValidJson, ValidPath, ValidQuery};
pub use pagination::{paginate, Page, PageParams, Paginated, DEFAULT_PAGE_SIZE};
