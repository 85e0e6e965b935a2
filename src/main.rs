use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

use jobboard::config::{LatencyConfig, ServerConfig};
use jobboard::server::Server;
use jobboard::shutdown::install_shutdown_handler;

#[derive(Parser, Debug)]
#[command(name = "jobboard")]
#[command(version)]
#[command(about = "Job-queue dashboard with a simulated execution backend")]
struct Args {
    /// Address to bind the HTTP API to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Simulated latency of job creation (POST /jobs)
    #[arg(long, default_value = "800")]
    create_latency_ms: u64,

    /// Simulated execution time of a job (POST /run-job/{id})
    #[arg(long, default_value = "1500")]
    run_latency_ms: u64,

    /// Simulated latency of a job list refresh (GET /jobs)
    #[arg(long, default_value = "500")]
    refresh_latency_ms: u64,

    /// Start with an empty job list instead of the demo jobs
    #[arg(long)]
    no_seed: bool,
}

impl Args {
    fn into_config(self) -> Result<ServerConfig, Box<dyn std::error::Error>> {
        let listen_addr: SocketAddr = format!("{}:{}", self.host, self.port).parse()?;
        let latency = LatencyConfig::from_millis(
            self.create_latency_ms,
            self.run_latency_ms,
            self.refresh_latency_ms,
        );

        let config = ServerConfig::new(listen_addr).with_latency(latency);
        Ok(if self.no_seed {
            config.without_seed()
        } else {
            config
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Args::parse().into_config()?;
    let shutdown = install_shutdown_handler()?;

    Server::new(config).run(shutdown).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_args_build_default_config() {
        let config = Args::parse_from(["jobboard"]).into_config().unwrap();
        assert_eq!(config.listen_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.latency, LatencyConfig::default());
        assert!(config.seed_demo_jobs);
    }

    #[test]
    fn args_override_latency_and_seed() {
        let config = Args::parse_from([
            "jobboard",
            "--port",
            "9090",
            "--run-latency-ms",
            "10",
            "--no-seed",
        ])
        .into_config()
        .unwrap();
        assert_eq!(config.listen_addr.port(), 9090);
        assert_eq!(config.latency.run, std::time::Duration::from_millis(10));
        assert!(!config.seed_demo_jobs);
    }

    #[test]
    fn invalid_host_is_rejected() {
        let result = Args::parse_from(["jobboard", "--host", "not a host"]).into_config();
        assert!(result.is_err());
    }
}
