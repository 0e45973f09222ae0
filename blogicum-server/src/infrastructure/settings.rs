use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_seconds: i64,
    pub http_addr: String,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub http_request_body_limit_bytes: usize,
    pub http_concurrency_limit: usize,
    pub http_request_timeout_secs: u64,
    pub posts_per_page: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url =
            get_required(&lookup, "DATABASE_URL").context("DATABASE_URL is required")?;
        let jwt_secret = get_required(&lookup, "JWT_SECRET").context("JWT_SECRET is required")?;
        let jwt_ttl_seconds: i64 = lookup("JWT_TTL_SECONDS")
            .unwrap_or_else(|| "3600".to_string())
            .parse()
            .context("Failed to parse JWT_TTL_SECONDS, expecting integer")?;

        if jwt_secret.chars().count() < 32 {
            return Err(anyhow!("JWT_SECRET must be at least 32 characters"));
        }

        let http_addr = lookup("HTTP_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let cors_origins = parse_cors_origins(
            lookup("CORS_ORIGINS")
                .unwrap_or_else(|| "http://localhost:8000,http://127.0.0.1:8000".to_string()),
        );
        let log_level = lookup("LOG_LEVEL")
            .or_else(|| lookup("RUST_LOG"))
            .unwrap_or_else(|| "info".to_string());

        Ok(Self {
            database_url,
            database_max_connections: parse_positive(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            jwt_secret,
            jwt_ttl_seconds,
            http_addr,
            cors_origins,
            log_level,
            http_request_body_limit_bytes: parse_positive(
                &lookup,
                "HTTP_REQUEST_BODY_LIMIT_BYTES",
                1024 * 1024,
            )?,
            http_concurrency_limit: parse_positive(&lookup, "HTTP_CONCURRENCY_LIMIT", 256)?,
            http_request_timeout_secs: parse_positive(&lookup, "HTTP_REQUEST_TIMEOUT_SECS", 10)?,
            posts_per_page: parse_positive(&lookup, "POSTS_PER_PAGE", 10)?,
        })
    }
}

fn get_required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    let value = lookup(key).ok_or_else(|| anyhow!("{key} is not set"))?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}

fn parse_cors_origins(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_positive<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr + PartialEq + Default + ToString,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = lookup(key)
        .unwrap_or_else(|| default.to_string())
        .parse::<T>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == T::default() {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}
