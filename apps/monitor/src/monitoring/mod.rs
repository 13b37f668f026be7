//! Monitoring engine module - drives the recurring check cycle
//!
//! This module is responsible for:
//! - Scheduling one check per interval with non-overlapping ticks
//! - Tracking consecutive probe failures
//! - Dispatching an alert through the notifier when the tolerance is crossed

pub mod scheduler;
pub mod status;

pub use scheduler::Scheduler;
pub use status::StatusMonitor;
