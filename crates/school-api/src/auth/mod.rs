pub mod jwt;
pub mod middleware;
pub mod password;
pub mod scopes;

pub use jwt::{Claims, JwtManager};
pub use middleware::{require_scope, ScopeGuard};
pub use password::PasswordService;
pub use scopes::{scopes_for_role, Role};
