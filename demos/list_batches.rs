//! Batch list example
//!
//! This example demonstrates how to list message batches, one page at a time and as a stream.
//!
//! ```sh
//! export ESENDEX_USERNAME=your_username
//! export ESENDEX_PASSWORD=your_password
//! cargo run --package esendex-rust --example list_batches
//! ```

use esendex_rust::{Config, Esendex, Paging, StatusKind};
use futures::stream::StreamExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = Esendex::new(Config::from_env()?);

    let page = client.batches(Paging::first(5)).await?;
    info!(
        start_index = page.start_index,
        count = page.count,
        total_count = page.total_count,
        "first page received"
    );

    println!("Streaming every batch...");
    let stream = client.batches_stream(25);
    tokio::pin!(stream);

    while let Some(result) = stream.next().await {
        match result {
            Ok(batch) => {
                println!(
                    "  - {} ({}), created {}, {} delivered of {}",
                    batch.name,
                    batch.id,
                    batch.created_at,
                    batch.status_count(StatusKind::Delivered),
                    batch.batch_size
                );
            }
            Err(e) => {
                eprintln!("Error fetching batches: {}", e);
            }
        }
    }

    Ok(())
}
