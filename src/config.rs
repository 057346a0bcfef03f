//! Service configuration
//!
//! Controls the storekeeper's name, how many messages may be buffered on
//! each streaming call, and the size of the runtime that hosts the calls.

use tracing::warn;

/// Default name used in greeting replies
pub const DEFAULT_RESPONDER_NAME: &str = "John";

/// Default per-direction buffer of a streaming call
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// Configuration of the billing service and its runtime
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Name returned as `responder_name` by greetings
    pub responder_name: String,
    /// Messages buffered per direction before a writer is suspended
    pub channel_capacity: usize,
    /// Worker threads of the runtime hosting the calls
    pub worker_threads: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            responder_name: DEFAULT_RESPONDER_NAME.to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            worker_threads: num_cpus::get(),
        }
    }
}

impl ServiceConfig {
    /// Create a configuration, replacing invalid values with defaults
    ///
    /// A blank responder name or a zero capacity/thread count is logged and
    /// replaced by the default value.
    pub fn new(responder_name: &str, channel_capacity: usize, worker_threads: usize) -> Self {
        let default = Self::default();

        let responder_name = if responder_name.trim().is_empty() {
            warn!(
                "Blank responder name, using default ({})",
                default.responder_name
            );
            default.responder_name
        } else {
            responder_name.trim().to_string()
        };

        let channel_capacity = if channel_capacity == 0 {
            warn!(
                "Invalid channel_capacity ({}), using default ({})",
                channel_capacity, default.channel_capacity
            );
            default.channel_capacity
        } else {
            channel_capacity
        };

        let worker_threads = if worker_threads == 0 {
            warn!(
                "Invalid worker_threads ({}), using default ({})",
                worker_threads, default.worker_threads
            );
            default.worker_threads
        } else {
            worker_threads
        };

        Self {
            responder_name,
            channel_capacity,
            worker_threads,
        }
    }
}
