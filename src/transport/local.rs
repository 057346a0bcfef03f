//! In-process transport
//!
//! `BillingClient` drives a [`BillingService`] the way an RPC client drives a
//! remote server: every call gets a fresh [`CallId`] and runs as its own tokio
//! task, and streaming calls talk to it over bounded channels.
//!
//! # Stream termination
//!
//! A [`CartSender`] must be ended explicitly with [`CartSender::finish`].
//! Dropping it without finishing, or calling [`CartSender::abort`], is seen by
//! the service as a transport failure, not as end-of-stream.
//!
//! Dropping the [`ResponseStream`] of a bidirectional order aborts the call
//! right away, even while the service is waiting for the next cart entry.

use crate::core::BillingService;
use crate::types::{
    BillSnapshot, BillingError, CallError, CallId, CallIdGenerator, CartEntry, CatalogEntry,
    CatalogRequest, GreetReply, GreetRequest, RpcMethod,
};
use futures::channel::{mpsc, oneshot};
use futures::future::{self, Either};
use futures::stream::{Stream, StreamExt};
use futures::SinkExt;
use std::pin::{pin, Pin};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Client handle that opens calls against an in-process service
#[derive(Debug, Clone)]
pub struct BillingClient {
    service: BillingService,
    call_ids: Arc<CallIdGenerator>,
    capacity: usize,
}

impl BillingClient {
    /// Create a client; channel sizes come from the service configuration
    pub fn new(service: BillingService) -> Self {
        let capacity = service.config().channel_capacity.max(1);
        Self {
            service,
            call_ids: Arc::new(CallIdGenerator::new()),
            capacity,
        }
    }

    /// Unary greeting
    pub async fn greet(&self, request: GreetRequest) -> Result<GreetReply, CallError> {
        let call_id = self.call_ids.next_id();
        let service = self.service.clone();

        tokio::spawn(async move { service.greet(request) })
            .await
            .map_err(|error| {
                CallError::new(
                    call_id,
                    RpcMethod::Greet,
                    BillingError::transport_failure(error.to_string()),
                )
            })
    }

    /// Server-streaming catalog listing
    ///
    /// Dropping the returned stream cancels the listing task.
    pub fn list_catalog(&self, request: CatalogRequest) -> ResponseStream<CatalogEntry> {
        let call_id = self.call_ids.next_id();
        let (mut tx, rx) = mpsc::channel(self.capacity);
        let entries = self.service.list_catalog(request);

        tokio::spawn(async move {
            let mut entries = pin!(entries);
            while let Some(entry) = entries.next().await {
                if tx.send(entry).await.is_err() {
                    debug!(
                        call_id = %call_id,
                        method = %RpcMethod::ListCatalog,
                        "catalog listing canceled by caller"
                    );
                    return;
                }
            }
        });

        ResponseStream::new(call_id, rx, None)
    }

    /// Client-streaming order
    ///
    /// Send cart entries through the returned [`CartSender`], finish it, then
    /// await the final bill from [`PendingBill::response`].
    pub fn submit_order(&self) -> (CartSender, PendingBill) {
        let call_id = self.call_ids.next_id();
        let (sender, inbound) = self.open_cart(call_id, RpcMethod::SubmitOrder);
        let service = self.service.clone();

        let handle = tokio::spawn(async move { service.submit_order(call_id, inbound).await });

        (sender, PendingBill { call_id, handle })
    }

    /// Bidirectional order
    ///
    /// The returned stream yields one item per cart entry sent (an interim
    /// bill or a per-entry rejection), then the final bill. A call-level
    /// failure arrives as the last item.
    pub fn submit_order_interactive(
        &self,
    ) -> (CartSender, ResponseStream<Result<BillSnapshot, CallError>>) {
        let call_id = self.call_ids.next_id();
        let (sender, inbound) = self.open_cart(call_id, RpcMethod::SubmitOrderInteractive);
        let (responses, rx) = mpsc::channel(self.capacity);
        let (mut hangup, hangup_rx) = oneshot::channel();
        let service = self.service.clone();

        tokio::spawn(async move {
            let call = pin!(service.submit_order_interactive(call_id, inbound, responses));
            let caller_gone = pin!(hangup.cancellation());

            match future::select(call, caller_gone).await {
                Either::Left((Ok(()), _)) => {}
                Either::Left((Err(error), _)) => {
                    debug!(call_id = %call_id, error = %error, "interactive order ended with error");
                }
                // Dropping the call future drops its state and the inbound cart.
                Either::Right(_) => {
                    warn!(call_id = %call_id, "response stream dropped by caller, order call aborted");
                }
            }
        });

        (sender, ResponseStream::new(call_id, rx, Some(hangup_rx)))
    }

    fn open_cart(&self, call_id: CallId, method: RpcMethod) -> (CartSender, InboundCart) {
        let (tx, rx) = mpsc::channel(self.capacity);
        let finished = Arc::new(AtomicBool::new(false));

        let sender = CartSender {
            call_id,
            method,
            tx,
            finished: Arc::clone(&finished),
        };
        let inbound = InboundCart {
            rx,
            finished,
            done: false,
        };
        (sender, inbound)
    }
}

/// Caller side of an inbound cart stream
#[derive(Debug)]
pub struct CartSender {
    call_id: CallId,
    method: RpcMethod,
    tx: mpsc::Sender<Result<CartEntry, BillingError>>,
    finished: Arc<AtomicBool>,
}

impl CartSender {
    pub fn call_id(&self) -> CallId {
        self.call_id
    }

    /// Send one cart entry, waiting while the service's buffer is full
    ///
    /// # Errors
    ///
    /// Fails with a transport failure if the call has already ended, for
    /// instance because an earlier entry aborted it. The cause is reported by
    /// the call's response side.
    pub async fn send(&mut self, entry: CartEntry) -> Result<(), CallError> {
        self.tx.send(Ok(entry)).await.map_err(|_| {
            CallError::new(
                self.call_id,
                self.method,
                BillingError::transport_failure("call already ended"),
            )
        })
    }

    /// Signal end-of-stream
    pub fn finish(mut self) {
        self.finished.store(true, Ordering::Release);
        self.tx.close_channel();
    }

    /// Break the stream; the service aborts the call with `error`
    pub async fn abort(mut self, error: BillingError) {
        if self.tx.send(Err(error)).await.is_err() {
            debug!(call_id = %self.call_id, "abort sent to a call that already ended");
        }
        self.tx.close_channel();
    }
}

impl Drop for CartSender {
    fn drop(&mut self) {
        if !self.finished.load(Ordering::Acquire) && !self.tx.is_closed() {
            warn!(call_id = %self.call_id, "cart stream dropped without end-of-stream");
        }
    }
}

/// Service side of an inbound cart stream
///
/// Yields a transport failure if the channel closes without the caller
/// having called [`CartSender::finish`].
#[derive(Debug)]
struct InboundCart {
    rx: mpsc::Receiver<Result<CartEntry, BillingError>>,
    finished: Arc<AtomicBool>,
    done: bool,
}

impl Stream for InboundCart {
    type Item = Result<CartEntry, BillingError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.done {
            return Poll::Ready(None);
        }

        match self.rx.poll_next_unpin(cx) {
            Poll::Ready(Some(Err(error))) => {
                self.done = true;
                Poll::Ready(Some(Err(error)))
            }
            Poll::Ready(Some(entry)) => Poll::Ready(Some(entry)),
            Poll::Ready(None) => {
                self.done = true;
                if self.finished.load(Ordering::Acquire) {
                    Poll::Ready(None)
                } else {
                    Poll::Ready(Some(Err(BillingError::transport_failure(
                        "cart stream closed before end-of-stream",
                    ))))
                }
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Response side of a streaming call
#[derive(Debug)]
pub struct ResponseStream<T> {
    call_id: CallId,
    rx: mpsc::Receiver<T>,
    // Dropped together with the stream; the call task watches for it.
    _hangup: Option<oneshot::Receiver<()>>,
}

impl<T> ResponseStream<T> {
    fn new(call_id: CallId, rx: mpsc::Receiver<T>, hangup: Option<oneshot::Receiver<()>>) -> Self {
        Self {
            call_id,
            rx,
            _hangup: hangup,
        }
    }

    pub fn call_id(&self) -> CallId {
        self.call_id
    }
}

impl<T> Stream for ResponseStream<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.rx.poll_next_unpin(cx)
    }
}

/// Final bill of a client-streaming order, once the task completes
#[derive(Debug)]
pub struct PendingBill {
    call_id: CallId,
    handle: JoinHandle<Result<BillSnapshot, CallError>>,
}

impl PendingBill {
    pub fn call_id(&self) -> CallId {
        self.call_id
    }

    /// Wait for the final bill or the call's failure
    pub async fn response(self) -> Result<BillSnapshot, CallError> {
        match self.handle.await {
            Ok(result) => result,
            Err(error) => Err(CallError::new(
                self.call_id,
                RpcMethod::SubmitOrder,
                BillingError::transport_failure(error.to_string()),
            )),
        }
    }
}
