//! File-based implementation of GateEventRepository
//!
//! `.csv` files go through the CSV loader; anything else is read as JSON,
//! either one record object or an array of records.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use codeco_domain::repository::GateEventRepository;
use codeco_types::{Error, GateEventRecord, Result};

use crate::gate_event_csv;

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonGateEvents {
    Many(Vec<GateEventRecord>),
    One(Box<GateEventRecord>),
}

/// Gate events read from a JSON or CSV file
pub struct FileGateEventRepository {
    path: PathBuf,
}

impl FileGateEventRepository {
    pub fn new(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_csv(&self) -> bool {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false)
    }
}

/// Parse gate events from JSON text
pub fn parse_json_events(json: &str) -> Result<Vec<GateEventRecord>> {
    Ok(match serde_json::from_str(json)? {
        JsonGateEvents::Many(records) => records,
        JsonGateEvents::One(record) => vec![*record],
    })
}

impl GateEventRepository for FileGateEventRepository {
    fn find_all(&self) -> std::result::Result<Vec<GateEventRecord>, Error> {
        if self.is_csv() {
            return Ok(gate_event_csv::load_gate_events(&self.path)?);
        }
        let content = fs::read_to_string(&self.path)?;
        parse_json_events(&content)
    }
}
