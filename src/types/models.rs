use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: i64,
    pub domain: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: i64,
    pub name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub last_changed: DateTime<Utc>,
}

/// A template that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub name: String,
    pub content: String,
}

/// Outcome counts for one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub created: usize,
    pub files_to_database: usize,
    pub database_to_files: usize,
    pub skipped: usize,
    pub files_deleted: usize,
    pub records_deleted: usize,
    pub orphans_written: usize,
}
