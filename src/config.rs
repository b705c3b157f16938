use anyhow::Context;
use axum::http::HeaderValue;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub geojson_path: String,
    pub cors_origins: Vec<String>,
    pub jwt: JwtConfig,
}

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5000,http://127.0.0.1:5000";

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Split a comma separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: env_or("JWT_ISSUER", "sportspotter"),
            audience: env_or("JWT_AUDIENCE", "sportspotter-users"),
            ttl_minutes: env_parse_or("JWT_TTL_MINUTES", 30),
        };
        Ok(Self {
            database_url,
            db_max_connections: env_parse_or("DB_MAX_CONNECTIONS", 10),
            host: env_or("APP_HOST", "0.0.0.0"),
            port: env_parse_or("APP_PORT", 8000),
            geojson_path: env_or("GEOJSON_PATH", "./data.geojson"),
            cors_origins: parse_origins(&env_or("CORS_ORIGINS", DEFAULT_CORS_ORIGINS)),
            jwt,
        })
    }

    /// Origins as header values for the CORS layer.
    pub fn cors_header_values(&self) -> anyhow::Result<Vec<HeaderValue>> {
        self.cors_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin {o:?}"))
            })
            .collect()
    }
}
