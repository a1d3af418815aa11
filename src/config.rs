use std::net::SocketAddr;

/// Order in which pending jobs are handed to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchOrder {
    /// Strict first-in first-out by admission.
    #[default]
    Admission,
    /// Highest priority value first; admission order breaks ties.
    Priority,
}

/// Tunables for the queue core and its expiry sweep.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Seconds a dequeued job may stay unconcluded before its lease
    /// expires and the sweeper returns it to the pending store.
    pub lease_timeout_secs: u64,
    /// Seconds between expiry sweeps.
    pub sweep_interval_secs: u64,
    /// Live fraction of the pending slab below which dead slots are
    /// reclaimed. Zero disables compaction entirely.
    pub compact_fill: f64,
    /// Dispatch discipline for the pending store.
    pub order: DispatchOrder,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            lease_timeout_secs: 300,
            sweep_interval_secs: 60,
            compact_fill: 0.5,
            order: DispatchOrder::Admission,
        }
    }
}

impl QueueConfig {
    pub fn with_lease_timeout_secs(mut self, secs: u64) -> Self {
        self.lease_timeout_secs = secs;
        self
    }

    pub fn with_sweep_interval_secs(mut self, secs: u64) -> Self {
        self.sweep_interval_secs = secs;
        self
    }

    pub fn with_compact_fill(mut self, fill: f64) -> Self {
        self.compact_fill = fill;
        self
    }

    pub fn with_order(mut self, order: DispatchOrder) -> Self {
        self.order = order;
        self
    }
}

/// Configuration for the HTTP front end.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub queue: QueueConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            // SAFETY: This is a hardcoded valid address that will always parse
            listen_addr: "127.0.0.1:8080"
                .parse()
                .expect("default listen address is valid"),
            queue: QueueConfig::default(),
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
}
