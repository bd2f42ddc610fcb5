//! CLI configuration from the environment.

use ratedesk_engine::cache::DEFAULT_TTL_MINUTES;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Cache entry lifetime in minutes.
    pub cache_ttl_minutes: i64,
    /// Postgres connection string; only favorites commands need it.
    pub database_url: Option<String>,
    /// Override for the REST provider endpoint.
    pub rest_base_url: Option<String>,
    /// Override for the bulletin endpoint.
    pub bulletin_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_ttl_minutes: DEFAULT_TTL_MINUTES,
            database_url: None,
            rest_base_url: None,
            bulletin_url: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(minutes) = std::env::var("CACHE_TTL_MINUTES") {
            if let Ok(minutes) = minutes.parse() {
                config.cache_ttl_minutes = minutes;
            }
        }

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = Some(url);
        }

        if let Ok(url) = std::env::var("FRANKFURTER_URL") {
            config.rest_base_url = Some(url);
        }

        if let Ok(url) = std::env::var("CBR_URL") {
            config.bulletin_url = Some(url);
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.cache_ttl_minutes < 0 {
            return Err("CACHE_TTL_MINUTES cannot be negative".to_string());
        }

        Ok(())
    }
}
