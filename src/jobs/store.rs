use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::LatencyConfig;
use crate::error::{JobError, Result};
use crate::jobs::clock::{Clock, SystemClock};
use crate::jobs::filter::{JobFilters, JobFiltersUpdate};
use crate::jobs::id::unique_job_id;
use crate::jobs::job::{CreateJobRequest, Job, JobStatus};
use crate::jobs::seed::demo_jobs;

/// Single source of truth for job records in this process.
///
/// `JobStore` is a cheap handle; clones share the same records, filters and
/// busy flag. The mutating operations simulate a remote backend: each one
/// suspends for its configured latency before committing. The suspension runs
/// in a spawned task, so an operation that has started always commits even if
/// its caller goes away.
///
/// Locks are never held across an `.await`, which keeps every read
/// synchronous.
#[derive(Debug, Clone)]
pub struct JobStore {
    jobs: Arc<RwLock<Vec<Job>>>,
    filters: Arc<RwLock<JobFilters>>,
    in_flight: Arc<AtomicUsize>,
    latency: LatencyConfig,
    clock: Arc<dyn Clock>,
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new(LatencyConfig::default())
    }
}

impl JobStore {
    pub fn new(latency: LatencyConfig) -> Self {
        Self {
            jobs: Arc::new(RwLock::new(Vec::new())),
            filters: Arc::new(RwLock::new(JobFilters::default())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            latency,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the records with `jobs`, kept in the given order.
    pub fn with_jobs(self, jobs: Vec<Job>) -> Self {
        *self.jobs.write() = jobs;
        self
    }

    /// Load the demo records, stamped relative to this store's clock.
    pub fn with_demo_jobs(self) -> Self {
        let jobs = demo_jobs(self.clock.now());
        self.with_jobs(jobs)
    }

    pub fn latency(&self) -> LatencyConfig {
        self.latency
    }

    /// Jobs matching the active filters, in store order.
    pub fn list_filtered(&self) -> Vec<Job> {
        let filters = *self.filters.read();
        self.list_with(&filters)
    }

    /// Jobs matching `filters`, without touching the active filters.
    pub fn list_with(&self, filters: &JobFilters) -> Vec<Job> {
        self.jobs
            .read()
            .iter()
            .filter(|job| filters.matches(job))
            .cloned()
            .collect()
    }

    /// Every job, newest first.
    pub fn all_jobs(&self) -> Vec<Job> {
        self.jobs.read().clone()
    }

    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }

    pub fn filters(&self) -> JobFilters {
        *self.filters.read()
    }

    /// Merge `update` into the active filters and return the result.
    pub fn set_filters(&self, update: JobFiltersUpdate) -> JobFilters {
        let mut filters = self.filters.write();
        filters.merge(update);
        tracing::debug!(status = %filters.status, priority = %filters.priority, "Filters updated");
        *filters
    }

    /// True while a create or refresh is in flight. Advisory only: nothing
    /// in the store waits on it.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn get(&self, id: &str) -> Option<Job> {
        let job = self.jobs.read().iter().find(|j| j.id == id).cloned();
        tracing::debug!(endpoint = "GET /jobs/{id}", job_id = id, found = job.is_some(), "Job lookup");
        job
    }

    /// Mint a new pending job and put it at the front of the list.
    ///
    /// Performs no validation; callers validate before submitting.
    pub async fn create(&self, request: CreateJobRequest) -> Result<Job> {
        let busy = BusyGuard::new(&self.in_flight);
        let store = self.clone();

        let task = tokio::spawn(async move {
            let _busy = busy;
            tokio::time::sleep(store.latency.create).await;
            store.insert_new(request)
        });

        task.await
            .map_err(|e| JobError::Internal(format!("create task failed: {}", e)))
    }

    /// Execute a job on the simulated backend.
    ///
    /// The job is marked `running` before the first suspension point, so
    /// readers see the transition right away. After the run latency it is
    /// marked `completed` and the final record is returned. At most one run
    /// per job is admitted: a running job yields `AlreadyRunning` and a
    /// completed one `AlreadyCompleted`.
    pub async fn run(&self, id: &str) -> Result<Job> {
        if let Err(e) = self.start_run(id) {
            tracing::warn!(endpoint = "POST /run-job/{id}", job_id = id, error = %e, "Run rejected");
            return Err(e);
        }

        let store = self.clone();
        let job_id = id.to_string();
        let task = tokio::spawn(async move {
            tokio::time::sleep(store.latency.run).await;
            store.finish_run(&job_id)
        });

        task.await
            .map_err(|e| JobError::Internal(format!("run task failed: {}", e)))?
    }

    /// Simulated re-fetch. Does not change any record.
    pub async fn refresh(&self) -> Result<()> {
        let busy = BusyGuard::new(&self.in_flight);
        let latency = self.latency.refresh;

        tokio::spawn(async move {
            let _busy = busy;
            tokio::time::sleep(latency).await;
        })
        .await
        .map_err(|e| JobError::Internal(format!("refresh task failed: {}", e)))?;

        let filters = self.filters();
        tracing::info!(
            endpoint = "GET /jobs",
            total = self.len(),
            status = %filters.status,
            priority = %filters.priority,
            "Jobs refreshed"
        );
        Ok(())
    }

    fn insert_new(&self, request: CreateJobRequest) -> Job {
        let now = self.clock.now();
        let mut jobs = self.jobs.write();

        let id = unique_job_id(|candidate| jobs.iter().any(|j| j.id == candidate));
        let job = Job::new(id, request, now);
        jobs.insert(0, job.clone());

        tracing::info!(
            endpoint = "POST /jobs",
            job_id = %job.id,
            task_name = %job.task_name,
            priority = %job.priority,
            "Job created"
        );
        job
    }

    fn start_run(&self, id: &str) -> Result<()> {
        let now = self.clock.now();
        let mut jobs = self.jobs.write();
        let job = jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| JobError::NotFound(id.to_string()))?;

        match job.status {
            JobStatus::Pending => {}
            JobStatus::Running => return Err(JobError::AlreadyRunning(id.to_string())),
            JobStatus::Completed => return Err(JobError::AlreadyCompleted(id.to_string())),
        }

        job.mark_running(now);
        tracing::info!(endpoint = "POST /run-job/{id}", job_id = id, "Job running");
        Ok(())
    }

    fn finish_run(&self, id: &str) -> Result<Job> {
        let now = self.clock.now();
        let mut jobs = self.jobs.write();
        let job = jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| JobError::NotFound(id.to_string()))?;

        job.mark_completed(now);
        tracing::info!(
            endpoint = "POST /run-job/{id}",
            job_id = id,
            task_name = %job.task_name,
            "Job completed"
        );
        Ok(job.clone())
    }
}

/// Holds the busy flag raised until dropped.
struct BusyGuard(Arc<AtomicUsize>);

impl BusyGuard {
    fn new(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
