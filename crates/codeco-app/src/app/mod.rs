//! Use cases: generate, send, inspect, batch dispatch

pub mod batch;
pub mod codeco_service;

pub use batch::{run_batch, BatchEntry, BatchReport, BatchStatus, Dispatch, ProgressCallback};
pub use codeco_service::{inspect, inspect_file, send, CodecoService, Inspection, PreparedMessage};
