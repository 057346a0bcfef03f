//! Per-call order state machine
//!
//! An [`OrderCall`] owns the accumulator of exactly one streaming order call.
//! It is created when the call opens and dropped when the call ends, so two
//! calls can never observe each other's totals.
//!
//! ```text
//! Open ──receive()──▶ Open ──close()──▶ Closing ──▶ EmitFinal ──finish()──▶ Terminated
//!   │                                                   │
//!   └────────────────────── fail() ─────────────────────┴──▶ Aborted
//! ```

use crate::core::accumulator::AccumulatorState;
use crate::core::traits::PriceLookup;
use crate::types::{BillKind, BillSnapshot, BillingError, CallError, CallId, CartEntry, RpcMethod};
use std::fmt;
use tracing::{debug, warn};

/// Lifecycle phase of an order call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    /// Receiving and accumulating cart entries
    Open,
    /// Caller signaled end-of-stream
    Closing,
    /// Final snapshot built, waiting to be delivered
    EmitFinal,
    /// Final snapshot delivered
    Terminated,
    /// Call failed; no further snapshots are produced
    Aborted,
}

impl CallPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, CallPhase::Terminated | CallPhase::Aborted)
    }
}

impl fmt::Display for CallPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallPhase::Open => "open",
            CallPhase::Closing => "closing",
            CallPhase::EmitFinal => "emitting final bill",
            CallPhase::Terminated => "terminated",
            CallPhase::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// State of one streaming order call
pub struct OrderCall<'a, P: PriceLookup + ?Sized> {
    call_id: CallId,
    method: RpcMethod,
    prices: &'a P,
    state: AccumulatorState,
    phase: CallPhase,
    received: u64,
}

impl<'a, P: PriceLookup + ?Sized> OrderCall<'a, P> {
    /// Open a call with `(0, 0)` totals
    pub fn new(call_id: CallId, method: RpcMethod, prices: &'a P) -> Self {
        debug!(call_id = %call_id, method = %method, "order call opened");
        Self {
            call_id,
            method,
            prices,
            state: AccumulatorState::new(),
            phase: CallPhase::Open,
            received: 0,
        }
    }

    pub fn phase(&self) -> CallPhase {
        self.phase
    }

    /// Number of cart entries received so far, accepted or not
    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn state(&self) -> AccumulatorState {
        self.state
    }

    /// Fold one inbound cart entry
    ///
    /// On success the totals advance and the matching `Interim` snapshot is
    /// returned. On error the totals are unchanged and the phase stays
    /// `Open`; the caller decides whether to [`reject`](Self::reject) the
    /// entry or [`fail`](Self::fail) the call.
    pub fn receive(&mut self, entry: &CartEntry) -> Result<BillSnapshot, BillingError> {
        if self.phase != CallPhase::Open {
            return Err(BillingError::call_not_open(self.phase));
        }

        self.received += 1;
        debug!(
            call_id = %self.call_id,
            item = %entry.item_name,
            quantity = entry.quantity,
            "Received an order for {} pieces of {}",
            entry.quantity,
            entry.item_name
        );

        let (next, snapshot) = self.state.step(self.prices, entry, self.received)?;
        self.state = next;
        Ok(snapshot)
    }

    /// Handle end-of-stream from the caller
    ///
    /// Moves through `Closing` to `EmitFinal` and returns the final snapshot,
    /// which carries the same totals as the last interim snapshot.
    pub fn close(&mut self) -> Result<BillSnapshot, CallError> {
        if self.phase != CallPhase::Open {
            let error = BillingError::call_not_open(self.phase);
            return Err(self.fail(error));
        }

        self.phase = CallPhase::Closing;
        debug!(call_id = %self.call_id, received = self.received, "caller closed its stream");

        let bill = self.state.snapshot(BillKind::Final);
        self.phase = CallPhase::EmitFinal;
        Ok(bill)
    }

    /// Mark the final snapshot as delivered
    pub fn finish(&mut self) {
        if self.phase == CallPhase::EmitFinal {
            self.phase = CallPhase::Terminated;
            debug!(
                call_id = %self.call_id,
                total_quantity = self.state.total_quantity(),
                total_amount = %self.state.total_amount(),
                "order call terminated"
            );
        }
    }

    /// Abort the call
    ///
    /// The accumulated totals are not delivered past this point.
    pub fn fail(&mut self, error: BillingError) -> CallError {
        if !self.phase.is_terminal() {
            self.phase = CallPhase::Aborted;
        }
        warn!(call_id = %self.call_id, method = %self.method, error = %error, "order call aborted");
        CallError::new(self.call_id, self.method, error)
    }

    /// Report a rejected entry without ending the call
    pub fn reject(&self, error: BillingError) -> CallError {
        warn!(call_id = %self.call_id, method = %self.method, error = %error, "cart entry rejected");
        CallError::new(self.call_id, self.method, error)
    }
}
