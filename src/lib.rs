pub mod config;
pub mod error;
pub mod http;
pub mod queue;
pub mod server;
pub mod shutdown;
