use std::{path::PathBuf, time::Duration};

use crate::infrastructure::sqlite::sqlite_connection::ConnectionOptions;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    /// MiB
    pub body_limit: u64,
    /// Seconds
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    /// Operator override; always tried first when set.
    pub explicit_path: Option<PathBuf>,
    pub project_local_path: PathBuf,
    /// The marker variable that identified a managed runtime, if any.
    pub managed_runtime: Option<String>,
    pub pool_max_size: u32,
    pub busy_timeout_ms: u64,
}

impl Database {
    pub fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            max_size: self.pool_max_size,
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
        }
    }
}
