use std::sync::Arc;

use crate::auth::JwtManager;
use crate::config::Settings;
use crate::database::{DbPool, Repository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<Repository>,
    pub jwt: Arc<JwtManager>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(db_pool: DbPool, settings: Settings) -> Self {
        let jwt = JwtManager::new(
            &settings.auth.jwt_secret,
            settings.auth.token_expiration_seconds,
        );
        Self {
            repository: Arc::new(Repository::new(db_pool)),
            jwt: Arc::new(jwt),
            settings: Arc::new(settings),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.settings.pagination.page_size
    }
}
