use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;
use crate::dashboard::{run_dashboard, DashboardState};
use crate::jobs::JobStore;

/// Owns the job store and serves it over HTTP.
pub struct Server {
    pub config: ServerConfig,
    pub store: JobStore,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        let store = JobStore::new(config.latency);
        let store = if config.seed_demo_jobs {
            store.with_demo_jobs()
        } else {
            store
        };

        Self { config, store }
    }

    /// Serve the dashboard until `shutdown` is cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound or the server fails.
    pub async fn run(self, shutdown: CancellationToken) -> std::io::Result<()> {
        tracing::info!(
            listen_addr = %self.config.listen_addr,
            jobs = self.store.len(),
            create_latency_ms = self.config.latency.create.as_millis() as u64,
            run_latency_ms = self.config.latency.run.as_millis() as u64,
            refresh_latency_ms = self.config.latency.refresh.as_millis() as u64,
            "Starting jobboard"
        );

        let state = DashboardState { store: self.store };
        run_dashboard(self.config.listen_addr, state, shutdown).await
    }
}
