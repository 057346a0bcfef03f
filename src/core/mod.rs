//! Core business logic module
//!
//! This module contains the billing components:
//! - `traits` - Price resolution abstraction
//! - `catalog` - Immutable item catalog
//! - `accumulator` - The fold from cart entries to bill snapshots
//! - `call` - Per-call order state machine
//! - `service` - The four RPC operations

pub mod accumulator;
pub mod call;
pub mod catalog;
pub mod service;
pub mod traits;

pub use accumulator::AccumulatorState;
pub use call::{CallPhase, OrderCall};
pub use catalog::Catalog;
pub use service::BillingService;
pub use traits::PriceLookup;
