//! Collaborator traits implemented by the infrastructure layer

use codeco_types::{Error, GateEventRecord};
use serde::{Deserialize, Serialize};

/// Source of gate event records
pub trait GateEventRepository {
    /// Load all records
    fn find_all(&self) -> Result<Vec<GateEventRecord>, Error>;

    /// Records for one container
    fn find_by_container(&self, container_number: &str) -> Result<Vec<GateEventRecord>, Error> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|r| r.container_number.trim() == container_number)
            .collect())
    }
}

/// Where a delivered message ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub remote_path: String,
    /// Attempts used, including the successful one
    pub attempts: u32,
}

/// Outbound channel for finished wire messages
pub trait MessageTransport {
    /// Deliver `content` under `file_name`, retrying as the transport sees fit
    fn deliver(&self, content: &str, file_name: &str) -> Result<Delivery, Error>;
}
