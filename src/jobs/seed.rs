use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use crate::jobs::job::{Job, JobPriority, JobStatus, Payload};

/// The records a fresh dashboard starts with.
pub fn demo_jobs(now: DateTime<Utc>) -> Vec<Job> {
    vec![
        demo_job(
            "1",
            "Data Sync Task",
            json!({ "source": "database_a", "target": "database_b", "batchSize": 1000 }),
            JobStatus::Completed,
            JobPriority::High,
            now - Duration::days(2),
            now - Duration::days(1),
        ),
        demo_job(
            "2",
            "Email Campaign",
            json!({ "template": "welcome", "recipients": ["user1@example.com", "user2@example.com"] }),
            JobStatus::Running,
            JobPriority::Medium,
            now - Duration::days(1),
            now,
        ),
        demo_job(
            "3",
            "Report Generation",
            json!({ "reportType": "monthly", "format": "pdf", "departments": ["sales", "marketing"] }),
            JobStatus::Pending,
            JobPriority::Low,
            now - Duration::hours(1),
            now - Duration::hours(1),
        ),
        demo_job(
            "4",
            "Backup Process",
            json!({ "databases": ["main", "analytics"], "compression": true }),
            JobStatus::Pending,
            JobPriority::High,
            now,
            now,
        ),
    ]
}

fn demo_job(
    id: &str,
    task_name: &str,
    payload: serde_json::Value,
    status: JobStatus,
    priority: JobPriority,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> Job {
    let payload: Payload = match payload {
        serde_json::Value::Object(map) => map,
        _ => Payload::new(),
    };
    Job {
        id: id.to_string(),
        task_name: task_name.to_string(),
        payload,
        status,
        priority,
        created_at,
        updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn demo_jobs_cover_every_status() {
        let jobs = demo_jobs(Utc::now());
        assert_eq!(jobs.len(), 4);
        let statuses: HashSet<JobStatus> = jobs.iter().map(|j| j.status).collect();
        assert_eq!(statuses.len(), 3);
    }

    #[test]
    fn demo_jobs_respect_timestamp_order() {
        for job in demo_jobs(Utc::now()) {
            assert!(job.created_at <= job.updated_at, "job {}", job.id);
            assert!(!job.task_name.is_empty());
        }
    }

    #[test]
    fn demo_payloads_are_objects() {
        let jobs = demo_jobs(Utc::now());
        assert_eq!(jobs[0].payload["batchSize"], 1000);
        assert_eq!(jobs[3].payload["compression"], true);
    }
}
