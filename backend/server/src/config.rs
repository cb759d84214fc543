use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use ink::CanvasSize;
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Redis,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store {other:?}, expected redis or memory")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub store: StoreKind,
    pub redis_url: String,
    pub canvas: CanvasSize,
    pub cors_max_age: u64,
    pub list_cache_capacity: u64,
    pub session_capacity: u64,
    pub session_idle_secs: u64,
}

impl Config {
    pub fn load() -> Self {
        let redis_url: String = try_load("REDIS_URL", "redis://127.0.0.1:6379");

        Self {
            port: try_load("RUST_PORT", "1111"),
            store: try_load("STORE", "redis"),
            redis_url: with_password(redis_url, read_secret("REDIS_PASSWORD")),
            canvas: CanvasSize {
                width: try_load("CANVAS_WIDTH", "800"),
                height: try_load("CANVAS_HEIGHT", "600"),
            },
            cors_max_age: try_load("CORS_MAX_AGE", "3600"),
            list_cache_capacity: try_load("LIST_CACHE_CAPACITY", "10000"),
            session_capacity: try_load("SESSION_CAPACITY", "10000"),
            session_idle_secs: try_load("SESSION_IDLE_SECS", "1800"),
        }
    }

    /// In-memory store with default settings.
    pub fn memory() -> Self {
        Self {
            port: 0,
            store: StoreKind::Memory,
            redis_url: String::new(),
            canvas: CanvasSize::default(),
            cors_max_age: 3600,
            list_cache_capacity: 1000,
            session_capacity: 1000,
            session_idle_secs: 1800,
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            info!("No {secret_name} secret, continuing without it: {e}");
        })
        .ok()
        .filter(|s| !s.is_empty())
}

fn with_password(redis_url: String, password: Option<String>) -> String {
    match password {
        Some(password) if !redis_url.contains('@') => {
            redis_url.replacen("://", &format!("://:{password}@"), 1)
        }
        _ => redis_url,
    }
}
