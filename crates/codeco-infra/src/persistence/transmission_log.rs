//! Transmission log
//!
//! Records every delivered message, keyed by its EDI file name. The file
//! name is derived from sender, container, operation and operation
//! date/time, so it identifies the gate event independently of the
//! clock-stamped references inside the interchange. A gate event is
//! delivered at most once.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use codeco_domain::repository::Delivery;
use codeco_types::{OperationKind, Result};

/// One delivered message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmissionEntry {
    /// SHA-256 of the wire content actually delivered
    pub message_hash: String,
    pub file_name: String,
    pub container_number: String,
    pub operation_type: OperationKind,
    pub remote_path: String,
    pub attempts: u32,
    pub transmitted_at: DateTime<Utc>,
}

/// JSON-file store of transmitted messages
pub struct TransmissionLog {
    store_path: PathBuf,
    entries: RefCell<HashMap<String, TransmissionEntry>>,
}

impl TransmissionLog {
    /// Create or load the log under `store_dir`
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("transmissions.json");

        let entries = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).unwrap_or_else(|e| {
                log::warn!(
                    "Transmission log {} unreadable, starting empty: {}",
                    store_path.display(),
                    e
                );
                HashMap::new()
            })
        } else {
            HashMap::new()
        };

        Ok(Self {
            store_path,
            entries: RefCell::new(entries),
        })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// SHA-256 of the wire content, lowercase hex
    pub fn hash_message(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Save store to disk
    fn persist(&self) -> Result<()> {
        let file = File::create(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &*self.entries.borrow())?;
        Ok(())
    }

    /// Earlier delivery of the gate event behind `file_name`
    pub fn find(&self, file_name: &str) -> Option<TransmissionEntry> {
        self.entries.borrow().get(file_name).cloned()
    }

    /// Record a successful delivery; returns the message hash
    pub fn record(
        &self,
        content: &str,
        file_name: &str,
        container_number: &str,
        operation_type: OperationKind,
        delivery: &Delivery,
    ) -> Result<String> {
        let hash = Self::hash_message(content);
        let entry = TransmissionEntry {
            message_hash: hash.clone(),
            file_name: file_name.to_string(),
            container_number: container_number.to_string(),
            operation_type,
            remote_path: delivery.remote_path.clone(),
            attempts: delivery.attempts,
            transmitted_at: Utc::now(),
        };

        self.entries
            .borrow_mut()
            .insert(file_name.to_string(), entry);
        self.persist()?;
        Ok(hash)
    }

    /// All entries, newest first
    pub fn all_entries(&self) -> Vec<TransmissionEntry> {
        let mut entries: Vec<_> = self.entries.borrow().values().cloned().collect();
        entries.sort_by(|a, b| b.transmitted_at.cmp(&a.transmitted_at));
        entries
    }

    /// Entries for one container, newest first
    pub fn for_container(&self, container_number: &str) -> Vec<TransmissionEntry> {
        self.all_entries()
            .into_iter()
            .filter(|e| e.container_number == container_number)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn delivery() -> Delivery {
        Delivery {
            remote_path: "/outbound/a.edi".to_string(),
            attempts: 2,
        }
    }

    #[test]
    fn test_record_and_find() {
        let dir = TempDir::new().unwrap();
        let log = TransmissionLog::open(dir.path().to_path_buf()).unwrap();
        assert!(log.is_empty());

        let hash = log
            .record("UNB+X'", "a.edi", "TRHU6875483", OperationKind::GateIn, &delivery())
            .unwrap();
        assert_eq!(hash.len(), 64);

        let found = log.find("a.edi").unwrap();
        assert_eq!(found.message_hash, hash);
        assert_eq!(found.attempts, 2);
        assert!(log.find("b.edi").is_none());
    }

    #[test]
    fn test_same_file_name_with_new_content_is_found() {
        let dir = TempDir::new().unwrap();
        let log = TransmissionLog::open(dir.path().to_path_buf()).unwrap();
        log.record("UNB+X+0205:1020'", "a.edi", "TRHU6875483", OperationKind::GateIn, &delivery())
            .unwrap();

        // Re-encoding a minute later changes the content, not the event
        let found = log.find("a.edi").unwrap();
        assert_ne!(found.message_hash, TransmissionLog::hash_message("UNB+X+0205:1021'"));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_persists_across_open() {
        let dir = TempDir::new().unwrap();
        {
            let log = TransmissionLog::open(dir.path().to_path_buf()).unwrap();
            log.record("UNB+X'", "a.edi", "TRHU6875483", OperationKind::GateOut, &delivery())
                .unwrap();
        }
        let log = TransmissionLog::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.for_container("TRHU6875483").len(), 1);
        assert_eq!(log.all_entries()[0].operation_type, OperationKind::GateOut);
    }

    #[test]
    fn test_corrupt_store_starts_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("transmissions.json"), "{not json").unwrap();
        let log = TransmissionLog::open(dir.path().to_path_buf()).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(
            TransmissionLog::hash_message(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
