//! Billing Engine Library
//! # Overview
//!
//! This library implements a fruit-stand billing service exposed through four
//! RPC interaction shapes, together with an in-process transport and a demo
//! client driver.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Messages, call identity and error types
//! - [`config`] - Service configuration
//! - [`core`] - Business logic components:
//!   - [`core::catalog`] - Immutable name to unit price table
//!   - [`core::accumulator`] - Fold from cart entries to bill snapshots
//!   - [`core::call`] - Per-call order state machine
//!   - [`core::service`] - The four RPC operations
//! - [`transport`] - In-process transport, one task per call
//! - [`io`] - Catalog/cart CSV loading and bill output
//! - [`driver`] - Demo customer session
//! - [`cli`] - CLI arguments parsing and log setup
//!
//! # Interaction Modes
//!
//! - **Greet** (unary): fixed-format greeting
//! - **ListCatalog** (server-streaming): every catalog entry, in order
//! - **SubmitOrder** (client-streaming): one final bill for a cart stream
//! - **SubmitOrderInteractive** (bidirectional): one interim bill per cart
//!   entry, then a final bill
//!
//! # Bills
//!
//! Each order call owns its running totals:
//! - `total_quantity`: sum of accepted quantities
//! - `total_amount`: sum of `unit_price * quantity`, in exact decimal arithmetic

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod driver;
pub mod io;
pub mod transport;
pub mod types;

pub use config::ServiceConfig;
pub use core::{AccumulatorState, BillingService, Catalog, PriceLookup};
pub use transport::BillingClient;
pub use types::{
    BillKind, BillSnapshot, BillingError, CallError, CallId, CartEntry, CatalogEntry, ErrorKind,
    RpcMethod,
};
