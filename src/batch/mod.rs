pub mod model;

pub use model::{BatchDetail, BatchPage, BatchSummary, Paging, StatusKind};
