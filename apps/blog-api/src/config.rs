use axum_helpers::JwtConfig;
use core_config::{
    AppInfo, ConfigError, FromEnv, app_info, env_or_default, env_parse_or, server::ServerConfig,
};
use domain_posts::DEFAULT_POSTS_PER_PAGE;
use std::path::PathBuf;

use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Blog-specific settings.
///
/// Environment variables:
/// - `IMAGES_DIR` (default: `images`)
/// - `POSTS_PER_PAGE` (default: 2, must be positive)
/// - `CORS_ALLOWED_ORIGIN` (optional; comma-separated, `*` or unset allows any origin)
#[derive(Clone, Debug)]
pub struct BlogConfig {
    pub images_dir: PathBuf,
    pub posts_per_page: u64,
    pub cors_allowed_origin: Option<String>,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from("images"),
            posts_per_page: DEFAULT_POSTS_PER_PAGE,
            cors_allowed_origin: None,
        }
    }
}

impl FromEnv for BlogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let posts_per_page = env_parse_or("POSTS_PER_PAGE", DEFAULT_POSTS_PER_PAGE)?;
        if posts_per_page == 0 {
            return Err(ConfigError::ParseError {
                key: "POSTS_PER_PAGE".to_string(),
                details: "must be positive".to_string(),
            });
        }

        Ok(Self {
            images_dir: PathBuf::from(env_or_default("IMAGES_DIR", "images")),
            posts_per_page,
            cors_allowed_origin: std::env::var("CORS_ALLOWED_ORIGIN").ok(),
        })
    }
}

/// Application configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub mongodb: MongoConfig,
    pub jwt: JwtConfig,
    pub blog: BlogConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let app = app_info!();

        let mut mongodb = MongoConfig::from_env()?;
        if mongodb.app_name.is_none() {
            mongodb = mongodb.with_app_name(app.name);
        }

        Ok(Self {
            app,
            server: ServerConfig::from_env()?,
            mongodb,
            jwt: JwtConfig::from_env()?,
            blog: BlogConfig::from_env()?,
            environment: Environment::from_env(),
        })
    }
}
