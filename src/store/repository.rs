//! Table repository for CRUD operations.
//!
//! Every write quotes the sha observed by the read it was derived from, so a
//! concurrent commit to the same file surfaces as a conflict instead of being
//! silently overwritten.

use std::sync::Arc;

use serde_json::Value;

use super::Table;
use crate::errors::AppError;
use crate::github::{GitHubApi, GitHubError, PutContents, RepoRef};
use crate::models::Record;

/// Decoded table contents plus the blob sha they were read at.
///
/// `sha` is `None` when the file does not exist yet.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub data: T,
    pub sha: Option<String>,
}

/// Repository of tables for one authenticated session.
#[derive(Clone)]
pub struct TableStore {
    github: Arc<dyn GitHubApi>,
    repo: RepoRef,
    token: String,
}

impl TableStore {
    pub fn new(github: Arc<dyn GitHubApi>, repo: RepoRef, token: impl Into<String>) -> Self {
        Self {
            github,
            repo,
            token: token.into(),
        }
    }

    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }

    // ==================== RAW TABLE ACCESS ====================

    /// Fetch a table and decode it as a JSON array.
    ///
    /// A missing file reads as an empty array with no sha.
    pub async fn read(&self, table: Table) -> Result<Snapshot<Value>, AppError> {
        let file = self
            .github
            .get_contents(&self.token, &self.repo, table.path())
            .await?;

        let Some(file) = file else {
            tracing::debug!(repo = %self.repo, table = %table, "table file missing, reading as empty");
            return Ok(Snapshot {
                data: Value::Array(Vec::new()),
                sha: None,
            });
        };

        let value: Value = serde_json::from_slice(&file.bytes).map_err(|e| {
            AppError::Upstream(format!("{} is not valid JSON: {}", table.path(), e))
        })?;
        if !value.is_array() {
            return Err(AppError::Upstream(format!(
                "{} does not hold a JSON array",
                table.path()
            )));
        }

        Ok(Snapshot {
            data: value,
            sha: Some(file.sha),
        })
    }

    /// Commit a new table value. `sha` must be the sha the value was derived from.
    pub async fn write(
        &self,
        table: Table,
        value: &Value,
        message: &str,
        sha: Option<&str>,
    ) -> Result<String, AppError> {
        if !value.is_array() {
            return Err(AppError::Validation(format!(
                "{} must be a JSON array",
                table.path()
            )));
        }

        let mut bytes = serde_json::to_vec_pretty(value)?;
        bytes.push(b'\n');

        let put = PutContents {
            message,
            bytes: &bytes,
            sha,
        };
        match self
            .github
            .put_contents(&self.token, &self.repo, table.path(), put)
            .await
        {
            Ok(new_sha) => {
                tracing::info!(repo = %self.repo, table = %table, sha = %new_sha, "{}", message);
                Ok(new_sha)
            }
            Err(GitHubError::ShaConflict {
                path,
                current_sha: None,
            }) => {
                // The HTTP backend cannot see the winning sha; look it up so the
                // client can reload against it.
                let current_sha = self.read(table).await.ok().and_then(|s| s.sha);
                tracing::warn!(repo = %self.repo, table = %table, "write rejected: stale sha");
                Err(GitHubError::ShaConflict { path, current_sha }.into())
            }
            Err(e) => {
                if matches!(e, GitHubError::ShaConflict { .. }) {
                    tracing::warn!(repo = %self.repo, table = %table, "write rejected: stale sha");
                }
                Err(e.into())
            }
        }
    }

    // ==================== TYPED RECORD ACCESS ====================

    /// Read all records of a table.
    pub async fn load<R: Record>(&self) -> Result<Snapshot<Vec<R>>, AppError> {
        let snapshot = self.read(R::TABLE).await?;
        let rows: Vec<R> = serde_json::from_value(snapshot.data).map_err(|e| {
            AppError::Upstream(format!(
                "{} holds malformed records: {}",
                R::TABLE.path(),
                e
            ))
        })?;
        Ok(Snapshot {
            data: rows,
            sha: snapshot.sha,
        })
    }

    /// Read-modify-write of one table.
    ///
    /// `expected_sha` lets a caller assert that its own copy is still current.
    /// The closure runs at most once; conflicts are returned, never retried.
    pub async fn modify<R, T, F>(
        &self,
        message: &str,
        expected_sha: Option<&str>,
        f: F,
    ) -> Result<(T, String), AppError>
    where
        R: Record,
        F: FnOnce(&mut Vec<R>) -> Result<T, AppError>,
    {
        let Snapshot { data: mut rows, sha } = self.load::<R>().await?;

        if let Some(expected) = expected_sha {
            if sha.as_deref() != Some(expected) {
                return Err(AppError::Conflict {
                    message: format!(
                        "{} changed since it was loaded; reload and try again",
                        R::TABLE.path()
                    ),
                    current_sha: sha,
                });
            }
        }

        let outcome = f(&mut rows)?;
        let value = serde_json::to_value(&rows)?;
        let new_sha = self
            .write(R::TABLE, &value, message, sha.as_deref())
            .await?;
        Ok((outcome, new_sha))
    }

    /// Get a record by ID.
    pub async fn get<R: Record>(&self, id: &R::Id) -> Result<Snapshot<Option<R>>, AppError> {
        let snapshot = self.load::<R>().await?;
        let found = snapshot.data.into_iter().find(|r| r.id() == id);
        Ok(Snapshot {
            data: found,
            sha: snapshot.sha,
        })
    }

    /// Append a record built from a freshly generated id.
    pub async fn create<R, F>(
        &self,
        expected_sha: Option<&str>,
        build: F,
    ) -> Result<(R, String), AppError>
    where
        R: Record,
        F: FnOnce(R::Id) -> R,
    {
        let noun = R::TABLE.record_noun();
        let (record, sha) = self
            .modify::<R, _, _>(&format!("Add {}", noun), expected_sha, |rows| {
                let record = build(R::next_id(rows)?);
                rows.push(record.clone());
                Ok(record)
            })
            .await?;
        tracing::debug!(table = %R::TABLE, id = %record.id(), "record created");
        Ok((record, sha))
    }

    /// Replace a record in place after applying `apply` to it.
    pub async fn update<R, F>(
        &self,
        id: &R::Id,
        expected_sha: Option<&str>,
        apply: F,
    ) -> Result<(R, String), AppError>
    where
        R: Record,
        F: FnOnce(&mut R) -> Result<(), AppError>,
    {
        let noun = R::TABLE.record_noun();
        self.modify::<R, _, _>(&format!("Update {} {}", noun, id), expected_sha, |rows| {
            let record = rows
                .iter_mut()
                .find(|r| r.id() == id)
                .ok_or_else(|| AppError::NotFound(format!("{} {} not found", noun, id)))?;
            apply(record)?;
            Ok(record.clone())
        })
        .await
    }
}
