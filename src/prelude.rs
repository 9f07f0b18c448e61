//! # Prelude for the Esendex Rust Crate
//!
//! This module re-exports the most commonly used types for convenience.
//!
//! ```rust,ignore
//! use esendex_rust::prelude::*;
//! ```

pub use crate::batch::{BatchDetail, BatchPage, BatchSummary, Paging, StatusKind};
pub use crate::client::{Error as ClientError, Esendex};
pub use crate::config::{Config, Error as ConfigError};
