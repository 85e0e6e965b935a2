//! Job-queue dashboard backend.
//!
//! The [`jobs::JobStore`] owns every job record of the process and simulates
//! a remote execution backend with fixed latencies; the [`dashboard`] module
//! serves it over HTTP. Nothing is persisted.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod jobs;
pub mod server;
pub mod shutdown;

pub use error::{JobError, Result};
pub use jobs::JobStore;
