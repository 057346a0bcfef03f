//! Billing service
//!
//! `BillingService` implements the four RPC operations over plain async
//! streams, independent of any transport:
//!
//! - [`greet`](BillingService::greet) - unary
//! - [`list_catalog`](BillingService::list_catalog) - server-streaming
//! - [`submit_order`](BillingService::submit_order) - client-streaming
//! - [`submit_order_interactive`](BillingService::submit_order_interactive) - bidirectional
//!
//! # Design
//!
//! The service itself only holds the shared read-only catalog and its
//! configuration. Each order call builds its own [`OrderCall`] on the stack of
//! the task running it, so concurrent calls never share totals.
//!
//! # Inbound streams
//!
//! Inbound cart streams yield `Result<CartEntry, BillingError>`; an `Err`
//! item is how a transport reports that the caller's stream broke. End of the
//! stream is the caller's end-of-stream signal.

use crate::config::ServiceConfig;
use crate::core::call::OrderCall;
use crate::core::catalog::Catalog;
use crate::types::{
    BillSnapshot, BillingError, CallError, CallId, CartEntry, CatalogEntry, CatalogRequest,
    GreetReply, GreetRequest, RpcMethod,
};
use futures::stream::{self, Stream, StreamExt};
use futures::{Sink, SinkExt};
use std::fmt::Display;
use std::pin::pin;
use std::sync::Arc;
use tracing::{debug, info};

/// Transport-agnostic implementation of the billing RPC surface
#[derive(Debug, Clone)]
pub struct BillingService {
    catalog: Arc<Catalog>,
    config: ServiceConfig,
}

impl BillingService {
    /// Create a service over a shared catalog
    pub fn new(catalog: Arc<Catalog>, config: ServiceConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Answer a greeting
    ///
    /// Stateless and infallible.
    pub fn greet(&self, request: GreetRequest) -> GreetReply {
        info!(name = %request.name, message = %request.message, "greeting received");

        GreetReply {
            message: format!("Hello {}. How can I help you?", request.name),
            responder_name: self.config.responder_name.clone(),
        }
    }

    /// Stream every catalog entry in listing order
    ///
    /// The returned stream is lazy and finite; dropping it before the end
    /// cancels the listing.
    pub fn list_catalog(
        &self,
        request: CatalogRequest,
    ) -> impl Stream<Item = CatalogEntry> + Send + 'static {
        info!(
            prompt = %request.message,
            entries = self.catalog.len(),
            "catalog listing requested"
        );

        let catalog = Arc::clone(&self.catalog);
        stream::iter(0..catalog.len()).map(move |position| catalog.entries()[position].clone())
    }

    /// Fold a client-driven cart stream into one final bill
    ///
    /// Interim snapshots are discarded. The bill is returned once `requests`
    /// ends; if it never ends, neither does the call.
    ///
    /// # Errors
    ///
    /// Any error aborts the call: an unknown item, a malformed entry (this
    /// mode has no per-entry reply channel), an overflow, or an `Err` item
    /// from the transport.
    pub async fn submit_order<S>(
        &self,
        call_id: CallId,
        requests: S,
    ) -> Result<BillSnapshot, CallError>
    where
        S: Stream<Item = Result<CartEntry, BillingError>>,
    {
        let mut requests = pin!(requests);
        let mut call = OrderCall::new(call_id, RpcMethod::SubmitOrder, self.catalog.as_ref());

        while let Some(request) = requests.next().await {
            let entry = request.map_err(|error| call.fail(error))?;
            if let Err(error) = call.receive(&entry) {
                return Err(call.fail(error));
            }
        }

        let bill = call.close()?;
        call.finish();
        info!(
            call_id = %call_id,
            total_quantity = bill.total_quantity,
            total_amount = %bill.total_amount,
            "final bill issued"
        );
        Ok(bill)
    }

    /// Answer every cart entry with a running bill, then a final bill
    ///
    /// Each inbound entry's response is written to `responses` before the
    /// next entry is read. A malformed entry is answered with an `Err` item in
    /// place of its interim bill and the call continues. On end-of-stream the
    /// final bill is written and `responses` is closed.
    ///
    /// # Errors
    ///
    /// Unknown items, overflows and any `Err` item from `requests` abort the
    /// call, whatever error the item carries. The error is also written to
    /// `responses` as the last item when possible.
    ///
    /// A caller that drops its end of `responses` is only noticed on the next
    /// write; the in-process transport watches for it separately.
    pub async fn submit_order_interactive<S, K>(
        &self,
        call_id: CallId,
        requests: S,
        responses: K,
    ) -> Result<(), CallError>
    where
        S: Stream<Item = Result<CartEntry, BillingError>>,
        K: Sink<Result<BillSnapshot, CallError>>,
        K::Error: Display,
    {
        let mut requests = pin!(requests);
        let mut responses = pin!(responses);
        let mut call = OrderCall::new(
            call_id,
            RpcMethod::SubmitOrderInteractive,
            self.catalog.as_ref(),
        );

        while let Some(request) = requests.next().await {
            // A broken inbound stream is fatal whatever its cause.
            let outcome = request.and_then(|entry| match call.receive(&entry) {
                Ok(snapshot) => Ok(Ok(snapshot)),
                Err(error) if error.is_entry_rejection() => Ok(Err(call.reject(error))),
                Err(error) => Err(error),
            });

            let response = match outcome {
                Ok(response) => response,
                Err(error) => {
                    let failure = call.fail(error);
                    // Best effort: the caller may already be gone.
                    let _ = responses.send(Err(failure.clone())).await;
                    return Err(failure);
                }
            };

            if let Err(error) = responses.send(response).await {
                return Err(call.fail(BillingError::transport_failure(format!(
                    "response stream closed: {}",
                    error
                ))));
            }
        }

        let bill = call.close()?;
        if let Err(error) = responses.send(Ok(bill)).await {
            return Err(call.fail(BillingError::transport_failure(format!(
                "response stream closed before final bill: {}",
                error
            ))));
        }
        call.finish();

        if let Err(error) = responses.close().await {
            debug!(call_id = %call_id, error = %error, "response stream already closed");
        }
        info!(
            call_id = %call_id,
            entries = call.received(),
            total_quantity = bill.total_quantity,
            total_amount = %bill.total_amount,
            "final bill issued"
        );
        Ok(())
    }
}
