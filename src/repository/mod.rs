// src/repository/mod.rs

//! Data access over the document collections.
//!
//! Every collection gets `create`, `get` and `list` style operations on
//! [`Repository`]. Rows are read into loosely typed `*Row` structs and then
//! parsed into the domain models; a row that does not parse is reported as
//! [`RepoError::Malformed`] rather than coerced. Calls are single attempts:
//! no retries and no cross-collection transactions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;

mod attendance;
mod exams;
mod games;
mod materials;
mod payments;
mod questions;
mod stats;
mod students;
mod users;

#[derive(Debug)]
pub enum RepoError {
    /// The store rejected or could not serve the call.
    Database(sqlx::Error),
    /// A stored document failed validation on read.
    Malformed {
        collection: &'static str,
        id: String,
        reason: String,
    },
    /// A uniqueness constraint was violated.
    Conflict(String),
}

impl fmt::Display for RepoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoError::Database(e) => write!(f, "database error: {}", e),
            RepoError::Malformed {
                collection,
                id,
                reason,
            } => write!(f, "malformed {} document '{}': {}", collection, id, reason),
            RepoError::Conflict(msg) => write!(f, "conflict: {}", msg),
        }
    }
}

impl std::error::Error for RepoError {}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        let unique = err
            .as_database_error()
            .map(|db| db.is_unique_violation())
            .unwrap_or(false);
        if unique {
            RepoError::Conflict(err.to_string())
        } else {
            RepoError::Database(err)
        }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Typed access to all collections.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Applies the bundled migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Fixed-width UTC text so that lexical order matches time order.
pub(crate) fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Validates stored values while turning a row into a model.
pub(crate) struct RowParser {
    collection: &'static str,
    id: String,
}

impl RowParser {
    pub(crate) fn new(collection: &'static str, id: &str) -> Self {
        Self {
            collection,
            id: id.to_string(),
        }
    }

    fn malformed(&self, field: &str, reason: impl fmt::Display) -> RepoError {
        RepoError::Malformed {
            collection: self.collection,
            id: self.id.clone(),
            reason: format!("{}: {}", field, reason),
        }
    }

    pub(crate) fn enumeration<T>(&self, field: &str, raw: &str) -> RepoResult<T>
    where
        T: FromStr<Err = String>,
    {
        raw.parse().map_err(|e| self.malformed(field, e))
    }

    pub(crate) fn timestamp(&self, field: &str, raw: &str) -> RepoResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|e| self.malformed(field, e))
    }

    pub(crate) fn opt_timestamp(
        &self,
        field: &str,
        raw: Option<&str>,
    ) -> RepoResult<Option<DateTime<Utc>>> {
        raw.map(|r| self.timestamp(field, r)).transpose()
    }

    pub(crate) fn date(&self, field: &str, raw: &str) -> RepoResult<NaiveDate> {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| self.malformed(field, e))
    }

    pub(crate) fn json<T: DeserializeOwned>(&self, field: &str, raw: &str) -> RepoResult<T> {
        serde_json::from_str(raw).map_err(|e| self.malformed(field, e))
    }

    pub(crate) fn non_negative(&self, field: &str, value: i64) -> RepoResult<i64> {
        if value < 0 {
            return Err(self.malformed(field, "negative value"));
        }
        Ok(value)
    }
}

/// Caps a caller supplied limit.
pub(crate) fn clamp_limit(limit: Option<i64>, default: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, 500)
}
