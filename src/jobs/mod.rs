pub mod clock;
pub mod filter;
pub mod id;
pub mod job;
pub mod seed;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use filter::{Filter, JobFilters, JobFiltersUpdate};
pub use job::{CreateJobRequest, Job, JobPriority, JobStatus, Payload};
pub use store::JobStore;
