use std::env;
use std::net::SocketAddr;

use anyhow::Context as _;
use roster_utils::parse::{normalize_path_prefix, parse_flag};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_API_PREFIX: &str = "/rest";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Debug)]
pub struct Config {
    /// PostgreSQL URL; `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub auto_run_migrations: bool,
    pub bind_addr: SocketAddr,
    /// Path the player routes are nested under; empty mounts them at the root.
    pub api_prefix: String,
}

impl Config {
    /// Read settings from the process environment (after `.env` has been loaded).
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned())
            .parse::<SocketAddr>()
            .context("BIND_ADDR is not a valid socket address")?;

        let api_prefix = normalize_path_prefix(
            &env::var("API_PREFIX").unwrap_or_else(|_| DEFAULT_API_PREFIX.to_owned()),
        );

        Ok(Self {
            database_url,
            max_connections: env_u32("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
            auto_run_migrations: env_bool("AUTO_RUN_MIGRATIONS", true),
            bind_addr,
            api_prefix,
        })
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => parse_flag(&value).unwrap_or(default),
        Err(_) => default,
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    match env::var(key) {
        Ok(value) => value.trim().parse::<u32>().unwrap_or(default),
        Err(_) => default,
    }
}
