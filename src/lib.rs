//! # esendex-rust
//!
//! A Rust client library for the Esendex message batch API.
//!
//! ```rust,ignore
//! use esendex_rust::{Config, Esendex, Paging};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Esendex::new(Config::from_env()?);
//!
//!     let page = client.batches(Paging::new(0, 20)).await?;
//!     for batch in &page.batches {
//!         println!("{} ({}): {:?}", batch.name, batch.id, batch.status);
//!     }
//!     Ok(())
//! }
//! ```

pub mod batch;
mod client;
mod common;
pub mod config;
pub mod prelude;


pub use batch::{BatchDetail, BatchPage, BatchSummary, Paging, StatusKind};
pub use client::{Error as ClientError, Esendex};
pub use config::{Config, Error as ConfigError};
