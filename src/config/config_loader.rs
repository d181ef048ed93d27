use anyhow::{Context, Result};
use std::{path::PathBuf, str::FromStr};

use super::config_model::{Database, DotEnvyConfig, Server};

pub const DEFAULT_PROJECT_LOCAL_PATH: &str = "data.sqlite";

/// Environment variables set by hosting platforms whose filesystem is
/// read-only apart from `/tmp`.
pub const MANAGED_RUNTIME_MARKERS: [&str; 4] =
    ["VERCEL", "AWS_LAMBDA_FUNCTION_NAME", "NETLIFY", "K_SERVICE"];

/// Reads the process environment. `.env` is loaded by the caller.
pub fn load() -> Result<DotEnvyConfig> {
    load_from(env_string)
}

fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<DotEnvyConfig> {
    let server = Server {
        port: parse_or_default("SERVER_PORT", lookup("SERVER_PORT"), 3000)?,
        body_limit: parse_or_default("SERVER_BODY_LIMIT", lookup("SERVER_BODY_LIMIT"), 1)?,
        timeout: parse_or_default("SERVER_TIMEOUT", lookup("SERVER_TIMEOUT"), 30)?,
    };

    let database = Database {
        explicit_path: lookup("PROPOSALS_DB_PATH").map(PathBuf::from),
        project_local_path: lookup("PROPOSALS_DB_DEFAULT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT_LOCAL_PATH)),
        managed_runtime: detect_managed_runtime(&lookup),
        pool_max_size: parse_or_default("DB_POOL_MAX_SIZE", lookup("DB_POOL_MAX_SIZE"), 8)?,
        busy_timeout_ms: parse_or_default(
            "DB_BUSY_TIMEOUT_MS",
            lookup("DB_BUSY_TIMEOUT_MS"),
            5_000,
        )?,
    };

    Ok(DotEnvyConfig { server, database })
}

/// Set and non-blank.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_or_default<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .parse()
            .with_context(|| format!("{key} is invalid: {value:?}")),
        None => Ok(default),
    }
}

fn detect_managed_runtime(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    MANAGED_RUNTIME_MARKERS
        .iter()
        .find(|marker| lookup(marker).is_some())
        .map(|marker| marker.to_string())
}
