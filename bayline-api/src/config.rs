use r2e::prelude::ConfigProperties;

/// Typed view over the environment, loaded the way `r2e-core::config` loads
/// any other `ConfigProperties` struct: `.env` first, then explicit
/// environment-variable overrides per field.
#[derive(ConfigProperties, Clone, Debug)]
#[config(prefix = "bayline")]
pub struct AppConfig {
    #[config(env = "DATABASE_URL")]
    pub database_url: String,
    #[config(env = "DATABASE_MAX_CONNECTIONS", default = 20)]
    pub database_max_connections: i64,
    #[config(env = "JWT_SECRET")]
    pub jwt_secret: String,
    #[config(env = "JWT_ACCESS_TTL", default = "15m")]
    pub jwt_access_ttl: String,
    #[config(env = "JWT_REFRESH_TTL", default = "7d")]
    pub jwt_refresh_ttl: String,
    #[config(env = "PORT", default = 8847)]
    pub port: i64,
    #[config(env = "CORS_ORIGINS", default = "")]
    pub cors_origins: String,
    #[config(env = "UPLOAD_PATH", default = "./uploads")]
    pub upload_path: String,
    #[config(env = "ENABLE_SMS", default = false)]
    pub enable_sms: bool,
}

/// Parses simple duration shorthands used by `JWT_ACCESS_TTL`/`JWT_REFRESH_TTL`
/// (`"15m"`, `"7d"`, `"30s"`, `"1h"`). Falls back to the given default on any
/// malformed input rather than failing startup over a typo.
pub fn parse_duration(spec: &str, default: chrono::Duration) -> chrono::Duration {
    let spec = spec.trim();
    let (digits, unit) = spec.split_at(spec.len().saturating_sub(1));
    match (digits.parse::<i64>(), unit) {
        (Ok(n), "s") => chrono::Duration::seconds(n),
        (Ok(n), "m") => chrono::Duration::minutes(n),
        (Ok(n), "h") => chrono::Duration::hours(n),
        (Ok(n), "d") => chrono::Duration::days(n),
        _ => default,
    }
}
