//! Error types for the billing engine
//!
//! Every failure a call can hit is a [`BillingError`]. Errors that leave the
//! engine are wrapped in a [`CallError`] so the caller can tell which call
//! produced them.
//!
//! # Error Categories
//!
//! - **Catalog resolution**: an item name absent from the catalog
//! - **Protocol violations**: malformed cart entries, rejected before folding
//! - **Transport failures**: inbound or outbound stream broke or was canceled
//! - **Loading errors**: catalog/cart CSV files that cannot be read or parsed

use super::call::{CallId, RpcMethod};
use thiserror::Error;

/// Coarse classification of a [`BillingError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ItemNotFound,
    ProtocolViolation,
    TransportFailure,
    ArithmeticOverflow,
    InvalidCatalog,
    Io,
    Parse,
}

/// Main error type for the billing engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BillingError {
    /// A cart entry references a name absent from the catalog
    ///
    /// Fatal to the current call. The entry never contributes to the totals.
    #[error("Item '{item}' not found in catalog")]
    ItemNotFound {
        /// The unresolved item name
        item: String,
    },

    /// A cart entry arrived with an empty item name
    #[error("Cart entry {sequence} has an empty item name")]
    EmptyItemName {
        /// 1-based position of the entry in the call's inbound stream
        sequence: u64,
    },

    /// A cart entry arrived with a negative quantity
    #[error("Cart entry {sequence} has negative quantity {quantity}")]
    NegativeQuantity {
        /// 1-based position of the entry in the call's inbound stream
        sequence: u64,
        /// The rejected quantity
        quantity: i64,
    },

    /// An entry was delivered to a call that is no longer accepting entries
    #[error("Call is {phase} and cannot accept cart entries")]
    CallNotOpen {
        /// Phase the call was in when the entry arrived
        phase: String,
    },

    /// The underlying stream failed or was canceled
    #[error("Transport failure: {message}")]
    TransportFailure {
        /// Description of the failure
        message: String,
    },

    /// Running totals would overflow
    #[error("Arithmetic overflow while adding '{item}' to the bill")]
    ArithmeticOverflow {
        /// Item being folded when the overflow was detected
        item: String,
    },

    /// Catalog construction failed validation
    #[error("Invalid catalog: {message}")]
    InvalidCatalog {
        /// Description of the problem
        message: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for BillingError {
    fn from(error: std::io::Error) -> Self {
        BillingError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for BillingError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        BillingError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl BillingError {
    /// Create an ItemNotFound error
    pub fn item_not_found(item: &str) -> Self {
        BillingError::ItemNotFound {
            item: item.to_string(),
        }
    }

    /// Create an EmptyItemName error
    pub fn empty_item_name(sequence: u64) -> Self {
        BillingError::EmptyItemName { sequence }
    }

    /// Create a NegativeQuantity error
    pub fn negative_quantity(sequence: u64, quantity: i64) -> Self {
        BillingError::NegativeQuantity { sequence, quantity }
    }

    /// Create a CallNotOpen error
    pub fn call_not_open(phase: impl ToString) -> Self {
        BillingError::CallNotOpen {
            phase: phase.to_string(),
        }
    }

    /// Create a TransportFailure error
    pub fn transport_failure(message: impl Into<String>) -> Self {
        BillingError::TransportFailure {
            message: message.into(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(item: &str) -> Self {
        BillingError::ArithmeticOverflow {
            item: item.to_string(),
        }
    }

    /// Create an InvalidCatalog error
    pub fn invalid_catalog(message: impl Into<String>) -> Self {
        BillingError::InvalidCatalog {
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BillingError::ItemNotFound { .. } => ErrorKind::ItemNotFound,
            BillingError::EmptyItemName { .. }
            | BillingError::NegativeQuantity { .. }
            | BillingError::CallNotOpen { .. } => ErrorKind::ProtocolViolation,
            BillingError::TransportFailure { .. } => ErrorKind::TransportFailure,
            BillingError::ArithmeticOverflow { .. } => ErrorKind::ArithmeticOverflow,
            BillingError::InvalidCatalog { .. } => ErrorKind::InvalidCatalog,
            BillingError::IoError { .. } => ErrorKind::Io,
            BillingError::ParseError { .. } => ErrorKind::Parse,
        }
    }

    /// Whether the error rejects a single entry without ending the call
    ///
    /// Only entry-level protocol violations qualify; a `CallNotOpen` means
    /// the call is already over.
    pub fn is_entry_rejection(&self) -> bool {
        matches!(
            self,
            BillingError::EmptyItemName { .. } | BillingError::NegativeQuantity { .. }
        )
    }
}

/// A call-level failure as seen by the caller
///
/// Carries the identity of the call that failed alongside the cause.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("call {call_id} ({method}) failed: {error}")]
pub struct CallError {
    /// Call that produced the error
    pub call_id: CallId,
    /// RPC method of the call
    pub method: RpcMethod,
    /// Underlying cause
    #[source]
    pub error: BillingError,
}

impl CallError {
    pub fn new(call_id: CallId, method: RpcMethod, error: BillingError) -> Self {
        Self {
            call_id,
            method,
            error,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

/// Errors surfaced by the demo driver
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Call(#[from] CallError),

    #[error(transparent)]
    Billing(#[from] BillingError),
}

impl From<std::io::Error> for DriverError {
    fn from(error: std::io::Error) -> Self {
        DriverError::Billing(error.into())
    }
}

impl DriverError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DriverError::Call(error) => error.kind(),
            DriverError::Billing(error) => error.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::item_not_found(
        BillingError::ItemNotFound { item: "Kiwi".to_string() },
        "Item 'Kiwi' not found in catalog"
    )]
    #[case::empty_item_name(
        BillingError::EmptyItemName { sequence: 3 },
        "Cart entry 3 has an empty item name"
    )]
    #[case::negative_quantity(
        BillingError::NegativeQuantity { sequence: 2, quantity: -5 },
        "Cart entry 2 has negative quantity -5"
    )]
    #[case::call_not_open(
        BillingError::CallNotOpen { phase: "terminated".to_string() },
        "Call is terminated and cannot accept cart entries"
    )]
    #[case::transport_failure(
        BillingError::TransportFailure { message: "stream reset".to_string() },
        "Transport failure: stream reset"
    )]
    #[case::parse_error_with_line(
        BillingError::ParseError { line: Some(4), message: "invalid digit".to_string() },
        "CSV parse error at line 4: invalid digit"
    )]
    #[case::parse_error_without_line(
        BillingError::ParseError { line: None, message: "invalid digit".to_string() },
        "CSV parse error: invalid digit"
    )]
    fn test_error_display(#[case] error: BillingError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::item_not_found(BillingError::item_not_found("Kiwi"), ErrorKind::ItemNotFound)]
    #[case::empty_item_name(BillingError::empty_item_name(1), ErrorKind::ProtocolViolation)]
    #[case::negative_quantity(BillingError::negative_quantity(1, -1), ErrorKind::ProtocolViolation)]
    #[case::call_not_open(BillingError::call_not_open("aborted"), ErrorKind::ProtocolViolation)]
    #[case::transport(BillingError::transport_failure("reset"), ErrorKind::TransportFailure)]
    #[case::overflow(BillingError::arithmetic_overflow("Banana"), ErrorKind::ArithmeticOverflow)]
    #[case::catalog(BillingError::invalid_catalog("duplicate"), ErrorKind::InvalidCatalog)]
    fn test_error_kind(#[case] error: BillingError, #[case] expected: ErrorKind) {
        assert_eq!(error.kind(), expected);
    }

    #[test]
    fn test_only_entry_level_violations_are_rejections() {
        assert!(BillingError::empty_item_name(1).is_entry_rejection());
        assert!(BillingError::negative_quantity(1, -3).is_entry_rejection());
        assert!(!BillingError::call_not_open("terminated").is_entry_rejection());
        assert!(!BillingError::item_not_found("Kiwi").is_entry_rejection());
    }

    #[test]
    fn test_call_error_carries_call_identity() {
        let error = CallError::new(
            CallId::new(7),
            RpcMethod::SubmitOrderInteractive,
            BillingError::item_not_found("Kiwi"),
        );

        assert_eq!(error.kind(), ErrorKind::ItemNotFound);
        assert_eq!(
            error.to_string(),
            "call #7 (SubmitOrderInteractive) failed: Item 'Kiwi' not found in catalog"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let error: BillingError = io_error.into();
        assert!(matches!(error, BillingError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: no such file");
    }
}
