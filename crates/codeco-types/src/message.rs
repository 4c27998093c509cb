//! Decoded message and validation result types

use serde::{Deserialize, Serialize};

/// Envelope and header information (UNB / UNH / UNT / UNZ)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syntax_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syntax_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interchange_control_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_release: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controlling_agency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub association_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_reference_trailer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interchange_control_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interchange_control_ref_trailer: Option<String>,
}

/// BGM contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHeader {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_code: Option<String>,
}

/// Container identification from EQD (or legacy COD)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// NAD party
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub qualifier: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// LOC location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub qualifier: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// DTM entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeEntry {
    pub qualifier: String,
    pub value: String,
    pub format: String,
}

/// RFF reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub qualifier: String,
    pub value: String,
}

/// MEA measurement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    pub purpose_qualifier: String,
    pub unit: String,
    pub value: String,
}

/// Structured view of one decoded CODECO message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMessage {
    pub message_info: MessageInfo,
    pub header: DocumentHeader,
    pub container_details: ContainerDetails,
    pub parties: Vec<Party>,
    pub locations: Vec<Location>,
    pub dates: Vec<DateTimeEntry>,
    pub references: Vec<Reference>,
    /// Part of the record shape; the decoder does not fill it
    pub measurements: Vec<Measurement>,
}

impl ParsedMessage {
    /// First party with the given qualifier
    pub fn party(&self, qualifier: &str) -> Option<&Party> {
        self.parties.iter().find(|p| p.qualifier == qualifier)
    }

    /// First location with the given qualifier
    pub fn location(&self, qualifier: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.qualifier == qualifier)
    }

    /// First date/time entry with the given qualifier
    pub fn date(&self, qualifier: &str) -> Option<&DateTimeEntry> {
        self.dates.iter().find(|d| d.qualifier == qualifier)
    }
}

/// Outcome of the structural checks on raw wire content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}
