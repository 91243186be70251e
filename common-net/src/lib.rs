//! Shared plumbing for the booking gateway and its tools: tracing setup,
//! shutdown signalling and the prometheus exporter.

pub mod metrics;
pub mod shutdown;
pub mod telemetry;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
