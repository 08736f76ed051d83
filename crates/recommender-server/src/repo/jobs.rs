//! Job repository for database operations.

use std::path::{Path, PathBuf};
use std::sync::MutexGuard;

use chrono::{SecondsFormat, Utc};
use recommender::AnalysisResults;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};
use thiserror::Error;

use crate::db::DbPool;
use crate::models::{Job, JobStatus};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to encode results: {0}")]
    Json(#[from] serde_json::Error),
    #[error("database lock poisoned")]
    Poisoned,
}

const JOB_COLUMNS: &str = "id, filename, file_path, status, message, results, error,
                           created_at, updated_at, completed_at, processing_time";

/// RFC 3339 with fixed precision so stored timestamps sort lexically.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Repository for job database operations.
pub struct JobRepo {
    db: DbPool,
}

impl JobRepo {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, RepoError> {
        self.db.lock().map_err(|_| RepoError::Poisoned)
    }

    /// Inserts a new pending job.
    pub fn create(&self, id: &str, filename: &str, file_path: &Path) -> Result<Job, RepoError> {
        let now = now_timestamp();
        let status = JobStatus::Pending;
        self.conn()?.execute(
            "INSERT INTO jobs (id, filename, file_path, status, message, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            (
                id,
                filename,
                file_path.to_string_lossy(),
                status.as_str(),
                status.message(),
                &now,
            ),
        )?;

        Ok(Job {
            id: id.to_string(),
            filename: filename.to_string(),
            file_path: file_path.to_path_buf(),
            status,
            message: status.message().to_string(),
            results: None,
            error: None,
            created_at: now.clone(),
            updated_at: now,
            completed_at: None,
            processing_time: None,
        })
    }

    /// Returns `None` if the job doesn't exist.
    pub fn get(&self, id: &str) -> Result<Option<Job>, RepoError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ?1"))?;
        Ok(stmt.query_row([id], Self::map_row).optional()?)
    }

    /// All jobs, most recent first.
    pub fn list(&self) -> Result<Vec<Job>, RepoError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs ORDER BY created_at DESC, rowid DESC"
        ))?;
        let jobs = stmt
            .query_map([], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(jobs)
    }

    /// Marks a job as processing. Returns false if the job no longer exists.
    pub fn set_processing(&self, id: &str) -> Result<bool, RepoError> {
        let status = JobStatus::Processing;
        let updated = self.conn()?.execute(
            "UPDATE jobs SET status = ?2, message = ?3, updated_at = ?4 WHERE id = ?1",
            (id, status.as_str(), status.message(), now_timestamp()),
        )?;
        Ok(updated > 0)
    }

    /// Stores the results of a finished analysis.
    pub fn complete(
        &self,
        id: &str,
        results: &AnalysisResults,
        processing_time: f64,
    ) -> Result<bool, RepoError> {
        let encoded = serde_json::to_string(results)?;
        self.finish(id, JobStatus::Completed, Some(&encoded), None, processing_time)
    }

    pub fn fail(&self, id: &str, error: &str, processing_time: f64) -> Result<bool, RepoError> {
        self.finish(id, JobStatus::Failed, None, Some(error), processing_time)
    }

    fn finish(
        &self,
        id: &str,
        status: JobStatus,
        results: Option<&str>,
        error: Option<&str>,
        processing_time: f64,
    ) -> Result<bool, RepoError> {
        let now = now_timestamp();
        let updated = self.conn()?.execute(
            "UPDATE jobs
             SET status = ?2, message = ?3, results = ?4, error = ?5,
                 updated_at = ?6, completed_at = ?6, processing_time = ?7
             WHERE id = ?1",
            (
                id,
                status.as_str(),
                status.message(),
                results,
                error,
                &now,
                processing_time,
            ),
        )?;
        Ok(updated > 0)
    }

    /// Fails every job still pending or processing, returning how many.
    ///
    /// Run at startup: analyses from a previous server process never finish.
    pub fn fail_unfinished(&self, error: &str) -> Result<usize, RepoError> {
        let status = JobStatus::Failed;
        let now = now_timestamp();
        let updated = self.conn()?.execute(
            "UPDATE jobs
             SET status = ?1, message = ?2, error = ?3, updated_at = ?4, completed_at = ?4
             WHERE status IN ('pending', 'processing')",
            (status.as_str(), status.message(), error, &now),
        )?;
        Ok(updated)
    }

    /// Removes the job record. Returns false if it did not exist.
    pub fn delete(&self, id: &str) -> Result<bool, RepoError> {
        let deleted = self.conn()?.execute("DELETE FROM jobs WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Job> {
        let status: String = row.get(3)?;
        let status = status.parse::<JobStatus>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into())
        })?;
        let results: Option<String> = row.get(5)?;
        let results = results
            .map(|json| serde_json::from_str::<AnalysisResults>(&json))
            .transpose()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;
        let file_path: String = row.get(2)?;

        Ok(Job {
            id: row.get(0)?,
            filename: row.get(1)?,
            file_path: PathBuf::from(file_path),
            status,
            message: row.get(4)?,
            results,
            error: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
            completed_at: row.get(9)?,
            processing_time: row.get(10)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;

    fn repo() -> JobRepo {
        JobRepo::new(init_db(":memory:").expect("Failed to init test db"))
    }

    #[test]
    fn test_create_and_get() {
        let repo = repo();
        let created = repo
            .create("job1", "games.pgn", Path::new("/data/job1.pgn"))
            .unwrap();

        let fetched = repo.get("job1").unwrap().expect("job should exist");
        assert_eq!(fetched, created);
        assert_eq!(fetched.status, JobStatus::Pending);
        assert_eq!(fetched.message, "Analysis job created");
        assert_eq!(fetched.file_path, PathBuf::from("/data/job1.pgn"));
    }

    #[test]
    fn test_get_missing_job() {
        assert!(repo().get("nonexistent").unwrap().is_none());
    }

    #[test]
    fn test_list_most_recent_first() {
        let repo = repo();
        repo.create("first", "a.pgn", Path::new("a")).unwrap();
        repo.create("second", "b.pgn", Path::new("b")).unwrap();

        let ids: Vec<String> = repo.list().unwrap().into_iter().map(|j| j.id).collect();
        assert_eq!(ids, vec!["second", "first"]);
    }

    #[test]
    fn test_complete_stores_results() {
        let repo = repo();
        repo.create("job1", "games.pgn", Path::new("x")).unwrap();
        assert!(repo.set_processing("job1").unwrap());
        assert_eq!(repo.get("job1").unwrap().unwrap().status, JobStatus::Processing);

        let results = AnalysisResults {
            games_parsed: 3,
            moves_evaluated: 40,
            ..AnalysisResults::default()
        };
        assert!(repo.complete("job1", &results, 1.5).unwrap());

        let job = repo.get("job1").unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.results, Some(results));
        assert_eq!(job.processing_time, Some(1.5));
        assert!(job.completed_at.is_some());
        assert!(job.error.is_none());
    }

    #[test]
    fn test_fail_stores_error() {
        let repo = repo();
        repo.create("job1", "games.pgn", Path::new("x")).unwrap();
        repo.fail("job1", "Analysis timed out after 5 seconds", 5.0)
            .unwrap();

        let job = repo.get("job1").unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("Analysis timed out after 5 seconds"));
        assert!(job.results.is_none());
    }

    #[test]
    fn test_updates_on_missing_job_report_false() {
        let repo = repo();
        assert!(!repo.set_processing("ghost").unwrap());
        assert!(!repo.fail("ghost", "boom", 0.0).unwrap());
        assert!(!repo.delete("ghost").unwrap());
    }

    #[test]
    fn test_fail_unfinished_only_touches_open_jobs() {
        let repo = repo();
        repo.create("pending", "a.pgn", Path::new("a")).unwrap();
        repo.create("processing", "b.pgn", Path::new("b")).unwrap();
        repo.set_processing("processing").unwrap();
        repo.create("done", "c.pgn", Path::new("c")).unwrap();
        repo.complete("done", &AnalysisResults::default(), 1.0)
            .unwrap();

        assert_eq!(repo.fail_unfinished("Server restarted").unwrap(), 2);

        for id in ["pending", "processing"] {
            let job = repo.get(id).unwrap().unwrap();
            assert_eq!(job.status, JobStatus::Failed);
            assert_eq!(job.error.as_deref(), Some("Server restarted"));
            assert!(job.completed_at.is_some());
        }
        let done = repo.get("done").unwrap().unwrap();
        assert_eq!(done.status, JobStatus::Completed);
        assert!(done.error.is_none());
        assert_eq!(repo.fail_unfinished("Server restarted").unwrap(), 0);
    }

    #[test]
    fn test_delete() {
        let repo = repo();
        repo.create("job1", "games.pgn", Path::new("x")).unwrap();
        assert!(repo.delete("job1").unwrap());
        assert!(repo.get("job1").unwrap().is_none());
    }
}
