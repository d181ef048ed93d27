use anyhow::{Context, Result};
use diesel::{
    Connection, SqliteConnection,
    connection::SimpleConnection,
    r2d2::{ConnectionManager, CustomizeConnection, Error as R2d2Error, Pool},
};
use std::{fs, path::Path, time::Duration};

pub const IN_MEMORY_DATABASE_URL: &str = ":memory:";

pub type SqlitePoolSquad = Pool<ConnectionManager<SqliteConnection>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionOptions {
    pub max_size: u32,
    pub busy_timeout: Duration,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            max_size: 8,
            busy_timeout: Duration::from_millis(5_000),
        }
    }
}

impl CustomizeConnection<SqliteConnection, R2d2Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), R2d2Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ))
        .map_err(R2d2Error::QueryError)
    }
}

/// Opens (creating if needed) the database file at `path` in WAL mode and
/// returns a pool over it. Fails unless the file can actually be written.
pub fn establish_file_connection(path: &Path, options: &ConnectionOptions) -> Result<SqlitePoolSquad> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let database_url = path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", path.display()))?;

    let mut probe = SqliteConnection::establish(database_url)
        .with_context(|| format!("Failed to open database at {}", path.display()))?;
    // Another writer may hold the lock briefly; wait like pooled connections do.
    options
        .on_acquire(&mut probe)
        .with_context(|| format!("Failed to set busy timeout at {}", path.display()))?;
    probe
        .batch_execute("PRAGMA journal_mode = WAL;")
        .with_context(|| format!("Failed to enable WAL journaling at {}", path.display()))?;
    probe
        .batch_execute("BEGIN IMMEDIATE; ROLLBACK;")
        .with_context(|| format!("Database at {} is not writable", path.display()))?;
    drop(probe);

    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(options.max_size.max(1))
        .connection_customizer(Box::new(*options))
        .build(manager)
        .with_context(|| format!("Failed to build connection pool for {}", path.display()))?;

    Ok(pool)
}

/// A process-local database. Every `:memory:` connection is its own database,
/// so the pool holds exactly one connection and never recycles it.
pub fn establish_in_memory(options: &ConnectionOptions) -> Result<SqlitePoolSquad> {
    let manager = ConnectionManager::<SqliteConnection>::new(IN_MEMORY_DATABASE_URL);
    let pool = Pool::builder()
        .max_size(1)
        .min_idle(Some(1))
        .idle_timeout(None)
        .max_lifetime(None)
        .connection_customizer(Box::new(*options))
        .build(manager)
        .context("Failed to build in-memory connection pool")?;

    Ok(pool)
}
