//! Cancels the schedule of a message batch.
//!
//! ```sh
//! export ESENDEX_USERNAME=your_username
//! export ESENDEX_PASSWORD=your_password
//! cargo run --package esendex-rust --example cancel_batch -- <batch-id>
//! ```

use display_error_chain::DisplayErrorChain;
use esendex_rust::{Config, Esendex};
use std::{env, process::ExitCode};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let Some(id) = env::args().nth(1) else {
        eprintln!("usage: cancel_batch <batch-id>");
        return ExitCode::FAILURE;
    };

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", DisplayErrorChain::new(&e));
            return ExitCode::FAILURE;
        }
    };
    let client = Esendex::new(config);

    let batch = match client.batch(&id).await {
        Ok(batch) => batch,
        Err(e) => {
            eprintln!("{}", DisplayErrorChain::new(&e));
            return ExitCode::FAILURE;
        }
    };
    println!("Cancelling '{}' ({} messages)...", batch.name, batch.batch_size);

    match client.cancel_batch(&id).await {
        Ok(()) => {
            println!("Batch schedule cancelled.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", DisplayErrorChain::new(&e));
            ExitCode::FAILURE
        }
    }
}
