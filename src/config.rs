use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;

use crate::constants::{DEFAULT_FEED_LIMIT, DEFAULT_LOG_CAPACITY};

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub feed_limit: usize,
    pub cache_ttl_secs: u64,
    pub seed_path: Option<String>,
    pub locale: String,
    pub log_capacity: usize,
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();

        Self {
            port: env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(3000),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            feed_limit: env::var("FEED_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_FEED_LIMIT),
            cache_ttl_secs: env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            seed_path: env::var("SEED_PATH").ok().filter(|p| !p.trim().is_empty()),
            locale: env::var("LOCALE").unwrap_or_else(|_| "pt-BR".to_string()),
            log_capacity: env::var("LOG_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_LOG_CAPACITY),
        }
    }
}

// Global static accessible everywhere
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
