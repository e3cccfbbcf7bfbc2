// src/config.rs

use std::env;
use std::net::SocketAddr;

use dotenvy::dotenv;

/// Local hour from which a check-in counts as late.
pub const LATE_FROM_HOUR: u32 = 8;

/// Number of attendance entries shown in a student's history.
pub const ATTENDANCE_HISTORY_LIMIT: i64 = 30;

/// Default size of a game leaderboard.
pub const LEADERBOARD_LIMIT: i64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Session lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    pub log_dir: String,
    /// Latency of the simulated barcode decoder, in milliseconds.
    pub scan_delay_ms: u64,
    /// Whether the server's virtual camera grants access.
    pub camera_available: bool,
    pub seed_demo_accounts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://narang.db?mode=rwc".to_string(),
            jwt_secret: "development-secret-change-in-production".to_string(),
            jwt_expiration: 60 * 60 * 24,
            rust_log: "info".to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            log_dir: "logs".to_string(),
            scan_delay_ms: 2000,
            camera_available: true,
            seed_demo_accounts: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using the development secret");
            defaults.jwt_secret.clone()
        });

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            jwt_secret,
            jwt_expiration: parse_var("JWT_EXPIRATION", defaults.jwt_expiration),
            rust_log: env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            bind_addr: parse_var("BIND_ADDR", defaults.bind_addr),
            log_dir: env::var("LOG_DIR").unwrap_or(defaults.log_dir),
            scan_delay_ms: parse_var("SCAN_DELAY_MS", defaults.scan_delay_ms),
            camera_available: parse_var("CAMERA_AVAILABLE", defaults.camera_available),
            seed_demo_accounts: parse_var("SEED_DEMO_ACCOUNTS", defaults.seed_demo_accounts),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparsable {}={:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}
