//! Batch dispatch over a gate event source

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use codeco_domain::repository::MessageTransport;
use codeco_domain::service::Clock;
use codeco_infra::TransmissionLog;
use codeco_types::{Error, GateEventRecord, OperationKind, Result, TransferError};

use super::codeco_service::{send, CodecoService};

/// Outcome for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// File written, not delivered
    Generated,
    /// File written and delivered
    Sent,
    /// File written; identical content was delivered before
    Duplicate,
    /// Record failed pre-validation or the message failed its checks
    Rejected,
    /// Writing or delivery failed
    Failed,
}

impl BatchStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BatchStatus::Generated => "generated",
            BatchStatus::Sent => "sent",
            BatchStatus::Duplicate => "duplicate",
            BatchStatus::Rejected => "rejected",
            BatchStatus::Failed => "failed",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            BatchStatus::Generated | BatchStatus::Sent | BatchStatus::Duplicate
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub container_number: String,
    pub operation_type: OperationKind,
    pub status: BatchStatus,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub remote_path: Option<String>,
    #[serde(default)]
    pub attempts: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Batch dispatch results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
    pub total_processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn count(&self, status: BatchStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Called after each record with (done, total, entry)
pub type ProgressCallback<'a> = &'a dyn Fn(usize, usize, &BatchEntry);

/// Transport and log used when a batch delivers
pub struct Dispatch<'a> {
    pub transport: &'a dyn MessageTransport,
    pub log: &'a TransmissionLog,
}

/// Generate (and deliver, when `dispatch` is given) every record.
/// One bad record never stops the batch.
pub fn run_batch<C: Clock>(
    service: &CodecoService<C>,
    records: &[GateEventRecord],
    dispatch: Option<&Dispatch<'_>>,
    progress: Option<ProgressCallback<'_>>,
) -> BatchReport {
    let started_at = Utc::now();
    let total = records.len();
    let mut entries = Vec::with_capacity(total);

    for (idx, record) in records.iter().enumerate() {
        let entry = process_one(service, record, dispatch);
        if !entry.status.is_success() {
            log::warn!(
                "{} {}: {}",
                entry.container_number,
                entry.status.label(),
                entry.error.as_deref().unwrap_or("")
            );
        }
        if let Some(callback) = progress {
            callback(idx + 1, total, &entry);
        }
        entries.push(entry);
    }

    let successful = entries.iter().filter(|e| e.status.is_success()).count();
    BatchReport {
        total_processed: total,
        successful,
        failed: total - successful,
        entries,
        started_at,
        completed_at: Utc::now(),
    }
}

fn process_one<C: Clock>(
    service: &CodecoService<C>,
    record: &GateEventRecord,
    dispatch: Option<&Dispatch<'_>>,
) -> BatchEntry {
    let mut entry = BatchEntry {
        container_number: record.container_number.trim().to_string(),
        operation_type: record.operation_type,
        status: BatchStatus::Generated,
        file_name: None,
        remote_path: None,
        attempts: None,
        error: None,
    };

    let prepared = match service.generate(record) {
        Ok(prepared) => prepared,
        Err(e) => {
            entry.status = match &e {
                Error::InvalidRecord(_) | Error::InvalidMessage(_) => BatchStatus::Rejected,
                _ => BatchStatus::Failed,
            };
            entry.error = Some(e.to_string());
            return entry;
        }
    };
    entry.file_name = Some(prepared.file_name.clone());

    let Some(dispatch) = dispatch else {
        return entry;
    };
    match send(&prepared, dispatch.transport, dispatch.log) {
        Ok(delivery) => {
            entry.status = BatchStatus::Sent;
            entry.remote_path = Some(delivery.remote_path);
            entry.attempts = Some(delivery.attempts);
        }
        Err(Error::Transfer(TransferError::Duplicate(previous))) => {
            entry.status = BatchStatus::Duplicate;
            entry.error = Some(format!("already sent as {}", previous));
        }
        Err(e) => {
            entry.status = BatchStatus::Failed;
            entry.error = Some(e.to_string());
        }
    }
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use codeco_domain::service::{EncoderSettings, FixedClock};
    use codeco_infra::{OutboxTransport, RetryPolicy};
    use std::cell::Cell;
    use tempfile::TempDir;

    fn record(container: &str) -> GateEventRecord {
        GateEventRecord {
            sender: "MANTRA".to_string(),
            receiver: "ONEY".to_string(),
            container_number: container.to_string(),
            container_size: "20".to_string(),
            container_type: "EM".to_string(),
            operation_type: OperationKind::GateOut,
            operation_date: "260205".to_string(),
            operation_time: "101500".to_string(),
            ..Default::default()
        }
    }

    fn service_at(dir: &Path, minute: u32) -> CodecoService<FixedClock> {
        let clock = FixedClock(
            NaiveDate::from_ymd_opt(2026, 2, 5)
                .unwrap()
                .and_hms_opt(10, minute, 0)
                .unwrap(),
        );
        CodecoService::with_clock(EncoderSettings::default(), clock, dir.to_path_buf())
    }

    fn service(dir: &Path) -> CodecoService<FixedClock> {
        service_at(dir, 20)
    }

    #[test]
    fn test_batch_generate_only() {
        let dir = TempDir::new().unwrap();
        let records = vec![record("TRHU6875483"), record("bad"), record("MSCU1234567")];
        let calls = Cell::new(0);
        let progress = |done: usize, total: usize, _: &BatchEntry| {
            assert_eq!(total, 3);
            calls.set(done);
        };

        let report = run_batch(&service(dir.path()), &records, None, Some(&progress));
        assert_eq!(calls.get(), 3);
        assert_eq!(report.total_processed, 3);
        assert_eq!(report.successful, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.entries[1].status, BatchStatus::Rejected);
        assert_eq!(report.count(BatchStatus::Generated), 2);
    }

    #[test]
    fn test_batch_dispatch_marks_duplicates() {
        let dir = TempDir::new().unwrap();
        let transport = OutboxTransport::new(dir.path().join("remote"), RetryPolicy::new(1, 0));
        let log = TransmissionLog::open(dir.path().join("log")).unwrap();
        let dispatch = Dispatch {
            transport: &transport,
            log: &log,
        };
        // Same record twice with a frozen clock encodes to identical content
        let records = vec![record("TRHU6875483"), record("TRHU6875483")];

        let report = run_batch(&service(&dir.path().join("out")), &records, Some(&dispatch), None);
        assert_eq!(report.entries[0].status, BatchStatus::Sent);
        assert_eq!(report.entries[0].attempts, Some(1));
        assert_eq!(report.entries[1].status, BatchStatus::Duplicate);
        assert_eq!(report.successful, 2);
    }

    #[test]
    fn test_rerun_in_later_minute_is_duplicate() {
        let dir = TempDir::new().unwrap();
        let transport = OutboxTransport::new(dir.path().join("remote"), RetryPolicy::new(1, 0));
        let log = TransmissionLog::open(dir.path().join("log")).unwrap();
        let dispatch = Dispatch {
            transport: &transport,
            log: &log,
        };
        let records = vec![record("TRHU6875483")];
        let out = dir.path().join("out");

        let first = run_batch(&service_at(&out, 20), &records, Some(&dispatch), None);
        let second = run_batch(&service_at(&out, 21), &records, Some(&dispatch), None);

        assert_eq!(first.entries[0].status, BatchStatus::Sent);
        assert_eq!(second.entries[0].status, BatchStatus::Duplicate);
        assert_eq!(log.len(), 1);

        // The delivered file still holds the first interchange
        let remote = first.entries[0].remote_path.as_deref().unwrap();
        assert!(fs::read_to_string(remote).unwrap().contains("UNH+COD02051020+"));
    }

    #[test]
    fn test_report_save_and_load() {
        let dir = TempDir::new().unwrap();
        let report = run_batch(&service(dir.path()), &[record("TRHU6875483")], None, None);
        let path = dir.path().join("reports").join("batch.json");
        report.save(&path).unwrap();
        assert_eq!(BatchReport::load(&path).unwrap(), report);
    }
}
