//! Reachability probing for the server monitor.
//!
//! This crate answers a single question: is `host:port` accepting
//! connections right now? It is responsible for:
//! - Executing one TCP connect (with TLS negotiation on port 443) per probe
//! - Bounding every probe with an explicit timeout
//! - Collapsing all failure causes into one `Unreachable` signal

pub mod probe;
pub mod types;

pub use probe::{is_running, Probe, TcpProber, DEFAULT_PROBE_TIMEOUT};
pub use types::{Reachability, Target};
