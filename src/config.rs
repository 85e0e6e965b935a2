use std::net::SocketAddr;
use std::time::Duration;

/// Artificial latency of each simulated backend call.
///
/// The store has no real backend; these delays stand in for the round-trip
/// of the corresponding endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyConfig {
    /// `POST /jobs`
    pub create: Duration,
    /// `POST /run-job/{id}`, measured from the `running` transition
    pub run: Duration,
    /// `GET /jobs`
    pub refresh: Duration,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            create: Duration::from_millis(800),
            run: Duration::from_millis(1500),
            refresh: Duration::from_millis(500),
        }
    }
}

impl LatencyConfig {
    /// No artificial delay at all.
    pub fn none() -> Self {
        Self {
            create: Duration::ZERO,
            run: Duration::ZERO,
            refresh: Duration::ZERO,
        }
    }

    pub fn from_millis(create_ms: u64, run_ms: u64, refresh_ms: u64) -> Self {
        Self {
            create: Duration::from_millis(create_ms),
            run: Duration::from_millis(run_ms),
            refresh: Duration::from_millis(refresh_ms),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub latency: LatencyConfig,
    /// Start with the demo job records instead of an empty store
    pub seed_demo_jobs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            // SAFETY: This is a hardcoded valid address that will always parse
            listen_addr: "127.0.0.1:8080"
                .parse()
                .expect("default listen address is valid"),
            latency: LatencyConfig::default(),
            seed_demo_jobs: true,
        }
    }
}

impl ServerConfig {
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            ..Default::default()
        }
    }

    pub fn with_latency(mut self, latency: LatencyConfig) -> Self {
        self.latency = latency;
        self
    }

    pub fn without_seed(mut self) -> Self {
        self.seed_demo_jobs = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latency_config_default() {
        let cfg = LatencyConfig::default();
        assert_eq!(cfg.create, Duration::from_millis(800));
        assert_eq!(cfg.run, Duration::from_millis(1500));
        assert_eq!(cfg.refresh, Duration::from_millis(500));
    }

    #[test]
    fn latency_config_none_is_zero() {
        let cfg = LatencyConfig::none();
        assert!(cfg.create.is_zero());
        assert!(cfg.run.is_zero());
        assert!(cfg.refresh.is_zero());
    }

    #[test]
    fn latency_config_from_millis() {
        let cfg = LatencyConfig::from_millis(10, 20, 30);
        assert_eq!(cfg.create, Duration::from_millis(10));
        assert_eq!(cfg.run, Duration::from_millis(20));
        assert_eq!(cfg.refresh, Duration::from_millis(30));
    }

    #[test]
    fn server_config_default() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.listen_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.latency, LatencyConfig::default());
        assert!(cfg.seed_demo_jobs);
    }

    #[test]
    fn server_config_builders() {
        let addr: SocketAddr = "0.0.0.0:9000".parse().unwrap();
        let cfg = ServerConfig::new(addr)
            .with_latency(LatencyConfig::none())
            .without_seed();
        assert_eq!(cfg.listen_addr, addr);
        assert_eq!(cfg.latency, LatencyConfig::none());
        assert!(!cfg.seed_demo_jobs);
    }
}
