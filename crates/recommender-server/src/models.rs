//! API models for serialization.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use recommender::AnalysisResults;
use serde::{Deserialize, Serialize};

/// Lifecycle of an analysis job: pending, then processing, then completed or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Message shown to clients for a job in this state.
    pub fn message(self) -> &'static str {
        match self {
            JobStatus::Pending => "Analysis job created",
            JobStatus::Processing => "Analysis in progress",
            JobStatus::Completed => "Analysis completed",
            JobStatus::Failed => "Analysis failed",
        }
    }

    pub fn is_finished(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "processing" => Ok(JobStatus::Processing),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            other => Err(format!("unknown job status: {other}")),
        }
    }
}

/// A stored analysis job.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: String,
    /// Name of the uploaded file as sent by the client.
    pub filename: String,
    /// Where the upload is stored on disk.
    pub file_path: PathBuf,
    pub status: JobStatus,
    pub message: String,
    pub results: Option<AnalysisResults>,
    pub error: Option<String>,
    /// RFC 3339 timestamps.
    pub created_at: String,
    pub updated_at: String,
    pub completed_at: Option<String>,
    /// Seconds spent processing.
    pub processing_time: Option<f64>,
}

impl Job {
    pub fn response(&self) -> JobResponse {
        JobResponse {
            job_id: self.id.clone(),
            status: self.status,
            message: self.message.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }
}

/// Summary of a job, returned on creation and in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub message: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Full job state including analysis results once available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<AnalysisResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
}

impl From<Job> for JobResult {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
            results: job.results,
            error: job.error,
            created_at: job.created_at,
            completed_at: job.completed_at,
            processing_time: job.processing_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

/// Response for `GET /`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            JobStatus::Pending,
            JobStatus::Processing,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<JobStatus>(), Ok(status));
        }
        assert!("done".parse::<JobStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Processing).unwrap(),
            "\"processing\""
        );
    }

    #[test]
    fn test_job_result_omits_missing_fields() {
        let result = JobResult {
            job_id: "abc".to_string(),
            status: JobStatus::Pending,
            results: None,
            error: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            completed_at: None,
            processing_time: None,
        };
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["status"], "pending");
        assert!(json.get("results").is_none());
        assert!(json.get("error").is_none());
        assert!(json.get("processing_time").is_none());
    }
}
