//! Repository adapters for persistence layer

use std::path::PathBuf;

use codeco_infra::{FileGateEventRepository, OutboxTransport, TransmissionLog};
use codeco_types::{Result, TransferError};

use crate::config::Config;

/// Open the transmission log under the data directory
pub fn open_transmission_log() -> Result<TransmissionLog> {
    TransmissionLog::open(Config::data_dir()?)
}

/// Open the transmission log at a custom directory
pub fn open_transmission_log_at(store_dir: PathBuf) -> Result<TransmissionLog> {
    TransmissionLog::open(store_dir)
}

/// Open a gate event source (JSON or CSV)
pub fn open_gate_event_repo(path: PathBuf) -> Result<FileGateEventRepository> {
    FileGateEventRepository::new(path)
}

/// Outbox transport for the configured remote directory
pub fn open_outbox(config: &Config) -> Result<OutboxTransport> {
    let remote_dir = config.transfer.remote_dir.clone().ok_or_else(|| {
        TransferError::InvalidTarget(
            "no remote_dir configured (codeco-gate config set remote_dir <dir>)".to_string(),
        )
    })?;
    Ok(OutboxTransport::new(remote_dir, config.transfer.retry_policy()))
}
