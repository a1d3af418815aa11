use std::net::SocketAddr;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use jobq::config::{DispatchOrder, QueueConfig, ServerConfig};
use jobq::server::Server;
use jobq::shutdown::shutdown_token;

#[derive(Parser, Debug)]
#[command(name = "jobq")]
#[command(version)]
#[command(about = "An in-memory job queue served over HTTP")]
struct Args {
    /// Address to listen on for HTTP requests
    #[arg(long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Seconds a dequeued job may stay unconcluded before its lease expires
    #[arg(long, default_value = "300")]
    lease_timeout: u64,

    /// Seconds between expiry sweeps
    #[arg(long, default_value = "60")]
    sweep_interval: u64,

    /// Pending-store live fraction below which storage is compacted (0 disables)
    #[arg(long, default_value = "0.5")]
    compact_fill: f64,

    /// Order in which pending jobs are served
    #[arg(long, value_enum, default_value_t = OrderArg::Admission)]
    order: OrderArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    /// First-in first-out by admission time
    Admission,
    /// Highest priority value first
    Priority,
}

impl From<OrderArg> for DispatchOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Admission => DispatchOrder::Admission,
            OrderArg::Priority => DispatchOrder::Priority,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig {
        listen_addr: args.listen,
        queue: QueueConfig::default()
            .with_lease_timeout_secs(args.lease_timeout)
            .with_sweep_interval_secs(args.sweep_interval)
            .with_compact_fill(args.compact_fill)
            .with_order(args.order.into()),
    };

    tracing::info!(
        listen_addr = %config.listen_addr,
        lease_timeout_secs = config.queue.lease_timeout_secs,
        sweep_interval_secs = config.queue.sweep_interval_secs,
        order = ?config.queue.order,
        "Starting jobq"
    );

    let shutdown = shutdown_token();
    Server::new(config).run(shutdown).await?;

    Ok(())
}
