//! Persistence implementations
//!
//! File-based implementations of the repository traits and the
//! transmission log store.

mod file_gate_event_repo;
mod transmission_log;

pub use file_gate_event_repo::{parse_json_events, FileGateEventRepository};
pub use transmission_log::{TransmissionEntry, TransmissionLog};
