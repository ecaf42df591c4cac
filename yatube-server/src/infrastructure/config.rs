use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    pub posts_per_page: u32,
    pub index_cache_ttl: Duration,
    pub session_ttl_hours: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = var("PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let database_url =
            var("DATABASE_URL").ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let jwt_secret =
            var("JWT_SECRET").ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let posts_per_page: u32 = var("POSTS_PER_PAGE")
            .unwrap_or_else(|| "10".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid POSTS_PER_PAGE: {}", e))?;
        if posts_per_page == 0 {
            anyhow::bail!("POSTS_PER_PAGE must be greater than zero");
        }
        let index_cache_secs: u64 = var("INDEX_CACHE_SECONDS")
            .unwrap_or_else(|| "20".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid INDEX_CACHE_SECONDS: {}", e))?;
        let session_ttl_hours: i64 = var("SESSION_TTL_HOURS")
            .unwrap_or_else(|| "24".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid SESSION_TTL_HOURS: {}", e))?;

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            cors_origins,
            posts_per_page,
            index_cache_ttl: Duration::from_secs(index_cache_secs),
            session_ttl_hours,
        })
    }
}
