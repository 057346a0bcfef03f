//! Transports
//!
//! The billing service is transport-agnostic; it consumes and produces async
//! streams. This module provides the in-process transport used by the demo
//! driver and the integration tests:
//!
//! - `local` - tokio task per call, bounded channels per stream direction

pub mod local;

pub use local::{BillingClient, CartSender, PendingBill, ResponseStream};
