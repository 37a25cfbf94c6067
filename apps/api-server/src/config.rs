//! Application configuration loaded from environment variables.

use std::env;

use inkwell_infra::{DatabaseConfig, SeedConfig};

/// RSS channel metadata and the public site URL.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Base URL for feed links. Derived from the request when unset.
    pub url: Option<String>,
    pub title: String,
    pub description: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: None,
            title: "Inkwell".to_string(),
            description: "Latest posts from Inkwell".to_string(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub site: SiteConfig,
    /// `None` disables seeding.
    pub seed: Option<SeedConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parse_var("DB_MAX_CONNECTIONS") {
                config.max_connections = max;
            }
            if let Some(min) = parse_var("DB_MIN_CONNECTIONS") {
                config.min_connections = min;
            }
            config
        });

        let defaults = SiteConfig::default();
        let site = SiteConfig {
            url: env::var("SITE_URL")
                .ok()
                .map(|u| u.trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty()),
            title: env::var("SITE_TITLE").unwrap_or(defaults.title),
            description: env::var("SITE_DESCRIPTION").unwrap_or(defaults.description),
        };

        let seed_enabled = env::var("SEED_DEMO_DATA")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);
        let seed = seed_enabled.then(|| {
            let defaults = SeedConfig::default();
            SeedConfig {
                admin_username: env::var("SEED_ADMIN_USERNAME").unwrap_or(defaults.admin_username),
                admin_password: env::var("SEED_ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
            }
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            site,
            seed,
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
