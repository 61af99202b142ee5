use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;

use crate::utils::DEFAULT_PAGE_SIZE;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub pagination: PaginationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    /// Full connection string. When absent the parts below are used.
    pub url: Option<String>,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub pool_max_size: u32,
    pub pool_timeout_seconds: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    /// No default; startup fails until one is configured.
    #[serde(default)]
    pub jwt_secret: String,
    pub token_expiration_seconds: u64,
    pub bootstrap_admin_email: Option<String>,
    pub bootstrap_admin_password: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PaginationConfig {
    pub page_size: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// `json` or `pretty`
    pub format: String,
}

impl DatabaseConfig {
    /// Credentials are passed as fields, never spliced into a URL, so any
    /// character is safe in a password.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match &self.url {
            Some(url) if !url.is_empty() => url.parse(),
            _ => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.name)),
        }
    }
}

/// Secrets that must never sign tokens.
const PLACEHOLDER_SECRETS: [&str; 2] = ["", "change-me"];

impl AuthConfig {
    pub fn ensure_secret(&self) -> Result<(), ConfigError> {
        if PLACEHOLDER_SECRETS.contains(&self.jwt_secret.trim()) {
            return Err(ConfigError::Message(
                "auth.jwt_secret must be set (APP__AUTH__JWT_SECRET)".into(),
            ));
        }
        Ok(())
    }
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Self::builder()?
            .add_source(File::with_name("config/settings").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Plain DB_* variables win over everything else.
            .set_override_option("database.user", std::env::var("DB_USER").ok())?
            .set_override_option("database.password", std::env::var("DB_PASSWORD").ok())?
            .set_override_option("database.host", std::env::var("DB_HOST").ok())?
            .set_override_option("database.port", std::env::var("DB_PORT").ok())?
            .set_override_option("database.name", std::env::var("DB_NAME").ok())?
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.auth.ensure_secret()?;
        Ok(settings)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("database.user", "postgres")?
            .set_default("database.password", "postgres")?
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432)?
            .set_default("database.name", "school")?
            .set_default("database.pool_max_size", 10)?
            .set_default("database.pool_timeout_seconds", 5)?
            .set_default("database.run_migrations", true)?
            .set_default("auth.token_expiration_seconds", 3600)?
            .set_default("pagination.page_size", i64::from(DEFAULT_PAGE_SIZE))?
            .set_default("logging.format", "json")
    }

    /// Settings built from defaults only, without touching files or the environment.
    /// The JWT secret is left empty.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_deserialize() {
        let settings = Settings::defaults().unwrap();
        assert_eq!(settings.pagination.page_size, 10);
        assert_eq!(settings.server.port, 5000);
        assert!(settings.database.url.is_none());
        assert!(settings.auth.bootstrap_admin_email.is_none());
    }

    #[test]
    fn options_from_parts() {
        let mut db = Settings::defaults().unwrap().database;
        db.user = "nupat".into();
        db.host = "db.local".into();
        db.port = 6543;
        db.name = "classes".into();

        let options = db.connect_options().unwrap();
        assert_eq!(options.get_host(), "db.local");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "nupat");
        assert_eq!(options.get_database(), Some("classes"));
    }

    #[test]
    fn url_characters_in_password_do_not_move_the_host() {
        let mut db = Settings::defaults().unwrap().database;
        db.password = "p@ss/w#rd:1".into();

        let options = db.connect_options().unwrap();
        assert_eq!(options.get_host(), "localhost");
        assert_eq!(options.get_port(), 5432);
        assert_eq!(options.get_username(), "postgres");
        assert_eq!(options.get_database(), Some("school"));
    }

    #[test]
    fn explicit_url_wins() {
        let mut db = Settings::defaults().unwrap().database;
        db.url = Some("postgres://a:b@c:1/d".into());
        let options = db.connect_options().unwrap();
        assert_eq!(options.get_host(), "c");
        assert_eq!(options.get_port(), 1);
        assert_eq!(options.get_database(), Some("d"));

        db.url = Some(String::new());
        assert_eq!(db.connect_options().unwrap().get_host(), "localhost");
    }

    #[test]
    fn jwt_secret_has_no_default() {
        let auth = Settings::defaults().unwrap().auth;
        assert!(auth.jwt_secret.is_empty());
        assert!(auth.ensure_secret().is_err());
    }

    #[test]
    fn placeholder_secret_is_refused() {
        let mut auth = Settings::defaults().unwrap().auth;
        auth.jwt_secret = "change-me".into();
        assert!(auth.ensure_secret().is_err());

        auth.jwt_secret = "a-real-deployment-secret".into();
        assert!(auth.ensure_secret().is_ok());
    }
}
