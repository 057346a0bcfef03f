//! Demo driver
//!
//! Plays the customer's side of a fruit-stand session against an in-process
//! billing service. Each [`DriverMode`] maps to one of the four calls; `Demo`
//! runs all of them and writes a console transcript, `Batch` and
//! `Interactive` write the received bills as CSV.
//!
//! # Architecture
//!
//! ```text
//! OrderDriver
//!     ├── ServiceConfig (responder name, channel capacity, worker threads)
//!     ├── Arc<Catalog>  (shared with the service)
//!     ├── CartSource    (demo cart or CSV file)
//!     └── BillingClient (one tokio task per call)
//!         └── BillingService
//! ```

use crate::cli::DriverMode;
use crate::config::ServiceConfig;
use crate::core::{BillingService, Catalog};
use crate::io::{write_bills_csv, CartReader};
use crate::transport::BillingClient;
use crate::types::{
    BillSnapshot, BillingError, CallError, CallId, CartEntry, CatalogRequest, DriverError,
    GreetRequest, RpcMethod,
};
use futures::StreamExt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::compat::Compat;
use tracing::warn;

/// Customer name used by the demo greeting
pub const CUSTOMER_NAME: &str = "Anne";

/// Prompt sent with the stock listing request
pub const STOCK_PROMPT: &str = "What do you have in stock ?";

const RULE: &str = "==========================================";

/// Where the driver takes its cart entries from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartSource {
    /// `i * 10 + 10` units of the i-th catalog item
    Demo,
    /// A CSV file of `item,quantity` rows
    File(PathBuf),
}

/// Build the demo cart for a catalog
pub fn demo_cart(catalog: &Catalog) -> Vec<CartEntry> {
    catalog
        .entries()
        .iter()
        .zip(0i64..)
        .map(|(entry, i)| CartEntry::new(entry.name.clone(), i * 10 + 10))
        .collect()
}

/// Cart entries being fed into one order call
enum CartFeed {
    Demo(std::vec::IntoIter<CartEntry>),
    File(CartReader<Compat<tokio::fs::File>>),
}

impl CartFeed {
    async fn next(&mut self) -> Option<Result<CartEntry, BillingError>> {
        match self {
            CartFeed::Demo(entries) => entries.next().map(Ok),
            CartFeed::File(reader) => reader.next_entry().await,
        }
    }
}

/// Runs customer sessions against an in-process billing service
#[derive(Debug, Clone)]
pub struct OrderDriver {
    config: ServiceConfig,
    catalog: Arc<Catalog>,
    cart: CartSource,
    send_delay: Duration,
}

impl OrderDriver {
    pub fn new(
        config: ServiceConfig,
        catalog: Arc<Catalog>,
        cart: CartSource,
        send_delay: Duration,
    ) -> Self {
        Self {
            config,
            catalog,
            cart,
            send_delay,
        }
    }

    /// Run one mode to completion on a dedicated runtime
    ///
    /// # Errors
    ///
    /// Returns the first call failure, or an I/O error if the cart cannot be
    /// read or the output cannot be written.
    pub fn run(&self, mode: DriverMode, output: &mut dyn Write) -> Result<(), DriverError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .enable_time()
            .build()?;

        runtime.block_on(async {
            let service = BillingService::new(Arc::clone(&self.catalog), self.config.clone());
            let client = BillingClient::new(service);
            self.run_with(&client, mode, output).await
        })
    }

    /// Run one mode against an existing client
    pub async fn run_with(
        &self,
        client: &BillingClient,
        mode: DriverMode,
        output: &mut dyn Write,
    ) -> Result<(), DriverError> {
        match mode {
            DriverMode::Demo => self.demo(client, output).await,
            DriverMode::Greet => self.greet(client, output).await,
            DriverMode::Catalog => self.list_stock(client, output).await,
            DriverMode::Batch => {
                let bill = self.batch_order(client, &mut std::io::sink()).await?;
                write_bills_csv(&[bill], output)?;
                Ok(())
            }
            DriverMode::Interactive => {
                let bills = self.interactive_order(client, &mut std::io::sink()).await?;
                write_bills_csv(&bills, output)?;
                Ok(())
            }
        }
    }

    async fn demo(&self, client: &BillingClient, output: &mut dyn Write) -> Result<(), DriverError> {
        writeln!(output, "{RULE}\nUnary RPC Call")?;
        self.greet(client, output).await?;
        writeln!(output, "{RULE}")?;

        writeln!(output, "{RULE}\nServer Streaming RPC Call\n{STOCK_PROMPT}")?;
        self.list_stock(client, output).await?;
        writeln!(output, "{RULE}")?;

        writeln!(output, "{RULE}\nClient Streaming RPC Call")?;
        writeln!(output, "I'll take two orders.")?;
        writeln!(output, "For the first one, I just need the final bill")?;
        let bill = self.batch_order(client, output).await?;
        write_received(output, &bill)?;
        writeln!(output, "{RULE}")?;

        writeln!(output, "Bidirectional RPC Calls\n{RULE}")?;
        writeln!(output, "For the second one, I'll need a running bill after each item")?;
        self.interactive_order(client, output).await?;
        writeln!(output, "{RULE}")?;

        Ok(())
    }

    async fn greet(&self, client: &BillingClient, output: &mut dyn Write) -> Result<(), DriverError> {
        let reply = client
            .greet(GreetRequest::new(CUSTOMER_NAME, "Hi!"))
            .await?;
        writeln!(output, "{}", reply.message)?;
        Ok(())
    }

    async fn list_stock(
        &self,
        client: &BillingClient,
        output: &mut dyn Write,
    ) -> Result<(), DriverError> {
        let mut stock = client.list_catalog(CatalogRequest::new(STOCK_PROMPT));
        while let Some(item) = stock.next().await {
            writeln!(output, "{} for {} a piece.", item.name, item.unit_price)?;
        }
        Ok(())
    }

    async fn open_feed(&self) -> Result<CartFeed, DriverError> {
        match &self.cart {
            CartSource::Demo => Ok(CartFeed::Demo(demo_cart(&self.catalog).into_iter())),
            CartSource::File(path) => Ok(CartFeed::File(CartReader::open(path).await?)),
        }
    }

    async fn pause(&self) {
        if !self.send_delay.is_zero() {
            tokio::time::sleep(self.send_delay).await;
        }
    }

    /// Send the whole cart on a client-streaming call and wait for its bill
    ///
    /// A cart row that cannot be read breaks the stream, so the call fails
    /// with that error.
    pub async fn batch_order(
        &self,
        client: &BillingClient,
        transcript: &mut dyn Write,
    ) -> Result<BillSnapshot, DriverError> {
        let mut feed = self.open_feed().await?;
        let (mut cart, pending) = client.submit_order();

        loop {
            match feed.next().await {
                Some(Ok(entry)) => {
                    writeln!(transcript, "{} pieces of {}", entry.quantity, entry.item_name)?;
                    if cart.send(entry).await.is_err() {
                        // The call ended early; its response says why.
                        break;
                    }
                    self.pause().await;
                }
                Some(Err(error)) => {
                    cart.abort(error).await;
                    break;
                }
                None => {
                    cart.finish();
                    break;
                }
            }
        }

        Ok(pending.response().await?)
    }

    /// Send the cart on a bidirectional call, reading one reply per entry
    ///
    /// Rejected entries are logged and skipped; every bill received is
    /// returned in arrival order, the final bill last.
    pub async fn interactive_order(
        &self,
        client: &BillingClient,
        transcript: &mut dyn Write,
    ) -> Result<Vec<BillSnapshot>, DriverError> {
        let mut feed = self.open_feed().await?;
        let (mut cart, mut replies) = client.submit_order_interactive();
        let call_id = replies.call_id();
        let mut bills = Vec::new();

        loop {
            match feed.next().await {
                Some(Ok(entry)) => {
                    writeln!(transcript, "{} pieces of {}", entry.quantity, entry.item_name)?;
                    if cart.send(entry).await.is_err() {
                        break;
                    }
                }
                Some(Err(error)) => {
                    cart.abort(error).await;
                    break;
                }
                None => {
                    cart.finish();
                    break;
                }
            }

            match replies.next().await {
                Some(Ok(bill)) => {
                    write_received(transcript, &bill)?;
                    bills.push(bill);
                }
                Some(Err(rejection)) if rejection.error.is_entry_rejection() => {
                    warn!(call_id = %call_id, error = %rejection.error, "cart entry rejected");
                }
                Some(Err(error)) => return Err(error.into()),
                None => return Err(closed_early(call_id).into()),
            }
            self.pause().await;
        }

        // Only the final bill, or the call's failure, is left.
        match replies.next().await {
            Some(Ok(bill)) => {
                write_received(transcript, &bill)?;
                bills.push(bill);
                Ok(bills)
            }
            Some(Err(error)) => Err(error.into()),
            None => Err(closed_early(call_id).into()),
        }
    }
}

fn write_received(output: &mut dyn Write, bill: &BillSnapshot) -> std::io::Result<()> {
    writeln!(
        output,
        "Received {} for a total of {} items and a total amount of {}",
        bill.kind.label(),
        bill.total_quantity,
        bill.total_amount
    )
}

fn closed_early(call_id: CallId) -> CallError {
    CallError::new(
        call_id,
        RpcMethod::SubmitOrderInteractive,
        BillingError::transport_failure("response stream ended without a final bill"),
    )
}
