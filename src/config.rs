//! Runtime settings read from `LIFTLOG_*` environment variables.

use std::path::PathBuf;

use anyhow::Context;

use crate::db;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_USER_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite file (`LIFTLOG_DB_PATH`).
    pub db_path: PathBuf,
    /// Request header carrying the authenticated user id (`LIFTLOG_USER_HEADER`).
    pub user_header: String,
    /// HTTP port (`LIFTLOG_PORT`).
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let db_path = match lookup("LIFTLOG_DB_PATH").filter(|v| !v.is_empty()) {
            Some(path) => PathBuf::from(path),
            None => db::default_path()?,
        };

        let user_header = lookup("LIFTLOG_USER_HEADER")
            .map(|v| v.trim().to_ascii_lowercase())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_HEADER.to_string());

        let port = match lookup("LIFTLOG_PORT") {
            Some(port) => port
                .trim()
                .parse()
                .with_context(|| format!("Invalid LIFTLOG_PORT: {port}"))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            db_path,
            user_header,
            port,
        })
    }
}
