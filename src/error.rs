use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error("Job not found: {0}")]
    NotFound(String),

    #[error("Job is already running: {0}")]
    AlreadyRunning(String),

    #[error("Job has already completed: {0}")]
    AlreadyCompleted(String),

    /// Backend rejected the request. The simulated backend never produces this.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, JobError>;
