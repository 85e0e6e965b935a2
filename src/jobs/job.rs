use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque job payload. The store never looks inside it.
pub type Payload = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
}

impl JobStatus {
    /// Completed jobs never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(JobStatus::Pending),
            "running" => Ok(JobStatus::Running),
            "completed" => Ok(JobStatus::Completed),
            _ => Err(format!("Invalid job status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for JobPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobPriority::Low => write!(f, "low"),
            JobPriority::Medium => write!(f, "medium"),
            JobPriority::High => write!(f, "high"),
        }
    }
}

impl FromStr for JobPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(JobPriority::Low),
            "medium" => Ok(JobPriority::Medium),
            "high" => Ok(JobPriority::High),
            _ => Err(format!("Invalid job priority: {}", s)),
        }
    }
}

/// Fields a caller supplies to mint a new job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub task_name: String,
    pub payload: Payload,
    pub priority: JobPriority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub task_name: String,
    pub payload: Payload,
    pub status: JobStatus,
    pub priority: JobPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(id: String, request: CreateJobRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            task_name: request.task_name,
            payload: request.payload,
            status: JobStatus::Pending,
            priority: request.priority,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark_running(&mut self, now: DateTime<Utc>) {
        self.transition(JobStatus::Running, now);
    }

    pub fn mark_completed(&mut self, now: DateTime<Utc>) {
        self.transition(JobStatus::Completed, now);
    }

    // updated_at never moves backward, even if the clock does.
    fn transition(&mut self, status: JobStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now.max(self.updated_at);
    }
}
