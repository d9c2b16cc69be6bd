use std::sync::Arc;

use sqlx::PgPool;

use shelfwise_config::{CorsConfig, EmailConfig, JwtConfig, ServerConfig};
use shelfwise_db::init_db_pool;

use crate::middleware::cookies::CookieKeys;
use crate::utils::email::{Mailer, mailer_from_config};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cookie_keys: CookieKeys,
    pub email_config: EmailConfig,
    pub server_config: ServerConfig,
    pub cors_config: CorsConfig,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(
        db: PgPool,
        jwt_config: JwtConfig,
        email_config: EmailConfig,
        server_config: ServerConfig,
        cors_config: CorsConfig,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let cookie_keys = CookieKeys::from_config(&jwt_config);

        Self {
            db,
            jwt_config,
            cookie_keys,
            email_config,
            server_config,
            cors_config,
            mailer,
        }
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let db = init_db_pool().await?;
    let email_config = EmailConfig::from_env();
    let mailer = mailer_from_config(&email_config).map_err(|e| e.error)?;

    Ok(AppState::new(
        db,
        JwtConfig::from_env(),
        email_config,
        ServerConfig::from_env(),
        CorsConfig::from_env(),
        mailer,
    ))
}
