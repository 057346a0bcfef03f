//! Billing Engine CLI
//!
//! Runs the in-process billing service and drives it as a customer would.
//!
//! # Usage
//!
//! ```bash
//! cargo run
//! cargo run -- --mode catalog
//! cargo run -- --mode interactive --cart cart.csv > bills.csv
//! cargo run -- --mode batch --catalog stock.csv --cart cart.csv --log-level info
//! ```
//!
//! `demo`, `greet` and `catalog` write a console transcript; `batch` and
//! `interactive` write the received bills as CSV to stdout. Logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (unreadable catalog or cart, failed call, etc.)

use billing_engine::cli;
use billing_engine::core::Catalog;
use billing_engine::driver::{CartSource, OrderDriver};
use billing_engine::io::load_catalog;
use std::process;
use std::sync::Arc;
use tracing::error;

fn main() {
    let args = cli::parse_args();
    cli::init_logging(&args.log_level);

    let catalog = match &args.catalog_file {
        Some(path) => match load_catalog(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                error!(error = %e, "catalog could not be loaded");
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => Catalog::fruit_stand(),
    };

    let cart = args
        .cart_file
        .clone()
        .map_or(CartSource::Demo, CartSource::File);

    let driver = OrderDriver::new(
        args.to_service_config(),
        Arc::new(catalog),
        cart,
        args.send_delay(),
    );

    let mut output = std::io::stdout();
    if let Err(e) = driver.run(args.mode, &mut output) {
        error!(error = %e, "session failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
