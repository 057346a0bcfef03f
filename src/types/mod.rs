//! Types module
//!
//! Contains the messages and identifiers exchanged with the billing service.
//! - `catalog`: catalog entries
//! - `cart`: inbound cart entries
//! - `bill`: bill snapshots
//! - `greeting`: unary and listing requests/replies
//! - `call`: call identity
//! - `error`: error types

pub mod bill;
pub mod call;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod greeting;

pub use bill::{BillKind, BillSnapshot};
pub use call::{CallId, CallIdGenerator, RpcMethod};
pub use cart::CartEntry;
pub use catalog::CatalogEntry;
pub use error::{BillingError, CallError, DriverError, ErrorKind};
pub use greeting::{CatalogRequest, GreetReply, GreetRequest};
