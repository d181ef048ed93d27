use std::{
    fmt::Display,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    config::config_model::Database,
    infrastructure::sqlite::sqlite_connection::{
        ConnectionOptions, SqlitePoolSquad, establish_file_connection, establish_in_memory,
    },
};

const STORAGE_DIR_NAME: &str = "proposal-desk";
const DATABASE_FILE_NAME: &str = "data.sqlite";
/// Managed runtimes only guarantee `/tmp` to be writable.
const MANAGED_RUNTIME_TEMP_ROOT: &str = "/tmp";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Explicit,
    Temporary,
    ProjectLocal,
}

impl Display for CandidateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            CandidateKind::Explicit => "explicit",
            CandidateKind::Temporary => "temporary",
            CandidateKind::ProjectLocal => "project_local",
        };
        write!(f, "{}", kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageCandidate {
    pub kind: CandidateKind,
    pub path: PathBuf,
}

impl StorageCandidate {
    pub fn new(kind: CandidateKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    /// Candidates in the order they are tried. The temporary path is only
    /// offered on managed runtimes.
    pub fn from_config(database: &Database) -> Vec<Self> {
        let mut candidates = Vec::with_capacity(3);

        if let Some(explicit_path) = &database.explicit_path {
            candidates.push(Self::new(CandidateKind::Explicit, explicit_path.clone()));
        }
        if database.managed_runtime.is_some() {
            candidates.push(Self::new(
                CandidateKind::Temporary,
                temporary_database_path(),
            ));
        }
        candidates.push(Self::new(
            CandidateKind::ProjectLocal,
            database.project_local_path.clone(),
        ));

        candidates
    }
}

pub fn temporary_database_path() -> PathBuf {
    PathBuf::from(MANAGED_RUNTIME_TEMP_ROOT)
        .join(STORAGE_DIR_NAME)
        .join(DATABASE_FILE_NAME)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    File { kind: CandidateKind, path: PathBuf },
    InMemory,
}

impl StorageLocation {
    pub fn is_persistent(&self) -> bool {
        matches!(self, StorageLocation::File { .. })
    }
}

impl Display for StorageLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageLocation::File { kind, path } => write!(f, "{} ({})", path.display(), kind),
            StorageLocation::InMemory => write!(f, "in-memory"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no storage could be opened after {attempts} attempts: {reason}")]
    AllCandidatesFailed { attempts: usize, reason: String },
}

pub struct ResolvedStorage {
    pub db_pool: SqlitePoolSquad,
    pub location: StorageLocation,
}

/// Opens the first candidate that works, falling back to an in-memory
/// database when none does. Only the failure of that fallback is fatal.
pub fn resolve(
    candidates: &[StorageCandidate],
    options: &ConnectionOptions,
) -> Result<ResolvedStorage, StorageError> {
    for candidate in candidates {
        match try_candidate(candidate, options) {
            Ok(db_pool) => {
                info!(
                    kind = %candidate.kind,
                    path = %candidate.path.display(),
                    "storage: database opened"
                );
                return Ok(ResolvedStorage {
                    db_pool,
                    location: StorageLocation::File {
                        kind: candidate.kind,
                        path: candidate.path.clone(),
                    },
                });
            }
            Err(error) => {
                warn!(
                    kind = %candidate.kind,
                    path = %candidate.path.display(),
                    error = %format!("{error:#}"),
                    "storage: candidate failed, trying next"
                );
            }
        }
    }

    match establish_in_memory(options) {
        Ok(db_pool) => {
            warn!(
                attempted = candidates.len(),
                "storage: no file candidate could be opened, using in-memory database; data will not survive a restart"
            );
            Ok(ResolvedStorage {
                db_pool,
                location: StorageLocation::InMemory,
            })
        }
        Err(error) => {
            error!(error = %format!("{error:#}"), "storage: in-memory fallback failed");
            Err(StorageError::AllCandidatesFailed {
                attempts: candidates.len() + 1,
                reason: format!("{error:#}"),
            })
        }
    }
}

fn try_candidate(
    candidate: &StorageCandidate,
    options: &ConnectionOptions,
) -> anyhow::Result<SqlitePoolSquad> {
    info!(
        kind = %candidate.kind,
        path = %candidate.path.display(),
        "storage: trying candidate"
    );
    establish_file_connection(Path::new(&candidate.path), options)
}
