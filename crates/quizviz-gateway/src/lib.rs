//! Generation gateway
//!
//! Sits between the HTTP boundary and the provider adapters. A request
//! flows cache → in-flight deduplication → provider attempts with bounded
//! retries and exponential backoff → rendered fallback. The gateway never
//! returns an error to its caller: a request that cannot be satisfied by
//! any provider still produces a deterministic rendered diagram.

pub mod backoff;
pub mod dedup;
pub mod orchestrator;

pub use backoff::ExponentialBackoff;
pub use dedup::InFlightTable;
pub use orchestrator::{Gateway, GatewayConfig};
