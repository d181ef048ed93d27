use anyhow::{Context, Result};
use diesel::{
    QueryableByName, RunQueryDsl, SqliteConnection, connection::SimpleConnection, sql_query,
    sql_types::Text,
};
use tracing::{debug, info};

use crate::infrastructure::sqlite::sqlite_connection::SqlitePoolSquad;

const PROPOSALS_TABLE: &str = "proposals";

const CREATE_PROPOSALS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS proposals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    companyName TEXT NOT NULL,
    personName TEXT NOT NULL,
    planName TEXT NOT NULL,
    date TEXT NOT NULL,
    amount TEXT NOT NULL,
    createdAt DATETIME NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
);
"#;

/// Columns introduced after the first release, in the order they were added.
const ADDED_COLUMNS: [(&str, &str); 4] = [
    ("usersCount", "INTEGER"),
    ("annualPricePerUser", "TEXT"),
    ("annualDiscountPercent", "TEXT"),
    ("discountedAnnualPricing", "TEXT"),
];

#[derive(Debug, QueryableByName)]
struct TableColumn {
    #[diesel(sql_type = Text)]
    name: String,
}

/// Creates the proposals table when missing and adds any later column an
/// older database lacks. Existing rows are never touched. Returns the columns
/// that had to be added.
pub fn ensure_schema(db_pool: &SqlitePoolSquad) -> Result<Vec<&'static str>> {
    let mut conn = db_pool.get()?;
    let added = conn.immediate_transaction(|conn| ensure_schema_in(conn))?;

    if added.is_empty() {
        debug!(table = PROPOSALS_TABLE, "schema: already up to date");
    } else {
        info!(table = PROPOSALS_TABLE, columns = ?added, "schema: added columns");
    }

    Ok(added)
}

fn ensure_schema_in(conn: &mut SqliteConnection) -> Result<Vec<&'static str>> {
    conn.batch_execute(CREATE_PROPOSALS_TABLE)
        .context("Failed to create proposals table")?;

    let existing = existing_columns(conn)?;
    let mut added = Vec::new();
    for (column, sql_type) in ADDED_COLUMNS {
        if existing.iter().any(|name| name == column) {
            continue;
        }

        conn.batch_execute(&format!(
            "ALTER TABLE {PROPOSALS_TABLE} ADD COLUMN {column} {sql_type};"
        ))
        .with_context(|| format!("Failed to add column {column}"))?;
        added.push(column);
    }

    Ok(added)
}

fn existing_columns(conn: &mut SqliteConnection) -> Result<Vec<String>> {
    let columns = sql_query(format!("PRAGMA table_info({PROPOSALS_TABLE})"))
        .load::<TableColumn>(conn)
        .context("Failed to inspect proposals table")?;

    Ok(columns.into_iter().map(|column| column.name).collect())
}
