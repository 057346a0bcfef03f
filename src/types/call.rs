//! Call identity types
//!
//! Every RPC interaction gets its own [`CallId`]; errors and log lines carry
//! it together with the [`RpcMethod`] so failures can be traced to a call.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of one RPC call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallId(u64);

impl CallId {
    pub fn new(id: u64) -> Self {
        CallId(id)
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out increasing call identifiers, starting at 1
#[derive(Debug, Default)]
pub struct CallIdGenerator {
    next: AtomicU64,
}

impl CallIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> CallId {
        CallId(self.next.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// The four RPC operations exposed by the billing service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcMethod {
    /// Unary greeting
    Greet,
    /// Server-streaming catalog listing
    ListCatalog,
    /// Client-streaming order, one final bill
    SubmitOrder,
    /// Bidirectional order, one interim bill per entry plus a final bill
    SubmitOrderInteractive,
}

impl RpcMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            RpcMethod::Greet => "Greet",
            RpcMethod::ListCatalog => "ListCatalog",
            RpcMethod::SubmitOrder => "SubmitOrder",
            RpcMethod::SubmitOrderInteractive => "SubmitOrderInteractive",
        }
    }
}

impl fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
