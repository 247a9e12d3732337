use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub client_base_url: String,
    pub bootstrap_timeout_secs: u64,
    pub user_page_size: i64,
    pub demo_mode: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // A missing .env is fine; real deployments set the environment directly.
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Reads the process environment without consulting `.env`.
    pub fn from_env_only() -> Result<Self> {
        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://postgres@localhost:54322/postgres".to_string()),
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| "http://localhost:54321".to_string()),
            supabase_anon_key: env::var("SUPABASE_ANON_KEY").unwrap_or_default(),
            jwt_secret: env::var("SUPABASE_JWT_SECRET").unwrap_or_else(|_| {
                "super-secret-jwt-token-with-at-least-32-characters-long".to_string()
            }),
            jwt_expiration_hours: parse_var("JWT_EXPIRATION_HOURS", 1)?,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 8080)?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            client_base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            bootstrap_timeout_secs: parse_var("BOOTSTRAP_TIMEOUT_SECS", 3)?,
            user_page_size: parse_var("USER_PAGE_SIZE", 50)?,
            demo_mode: parse_var("DEMO_MODE", false)?,
        })
    }

    /// Fixed configuration for tests: demo mode, no network.
    pub fn test_config() -> Self {
        Config {
            database_url: "postgres://postgres@localhost:54322/postgres".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
            jwt_expiration_hours: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            client_base_url: "http://localhost:3000".to_string(),
            bootstrap_timeout_secs: 3,
            user_page_size: 50,
            demo_mode: true,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn bootstrap_timeout(&self) -> Duration {
        Duration::from_secs(self.bootstrap_timeout_secs)
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("Invalid value for {}: {}", key, value)),
        Err(_) => Ok(default),
    }
}
