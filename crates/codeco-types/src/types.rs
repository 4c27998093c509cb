//! Gate event records consumed by the encoder

use serde::{Deserialize, Serialize};

/// Gate movement direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Container arriving at the depot yard
    #[default]
    #[serde(rename = "GATE_IN", alias = "gate_in")]
    GateIn,
    /// Container leaving the depot yard
    #[serde(rename = "GATE_OUT", alias = "gate_out")]
    GateOut,
}

impl OperationKind {
    /// Wire/file label ("GATE_IN" / "GATE_OUT")
    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::GateIn => "GATE_IN",
            OperationKind::GateOut => "GATE_OUT",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One gate operation as captured at the depot gate
///
/// Field names follow the JSON payload produced by the gate forms. Every text
/// field defaults to empty so partially filled records still deserialize;
/// `check_record` in the domain crate reports what is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GateEventRecord {
    /// Interchange sender code (e.g. "MANTRA")
    #[serde(default)]
    pub sender: String,
    /// Interchange recipient code (e.g. "ONEY")
    #[serde(default)]
    pub receiver: String,
    /// Depot company code, used when `sender` is blank
    #[serde(default)]
    pub company_code: String,
    /// Customer / shipping line name
    #[serde(default, alias = "customer_name")]
    pub customer: String,

    /// ISO 6346 container number (4 letters + 7 digits)
    #[serde(default)]
    pub container_number: String,
    /// Length code ("20", "40", "40ft")
    #[serde(default)]
    pub container_size: String,
    /// Load state or descriptive type ("EM", "FL", "reefer", ...)
    #[serde(default)]
    pub container_type: String,

    /// Haulier / carrier name
    #[serde(default, alias = "carrier")]
    pub transport_company: String,
    /// Truck registration
    #[serde(default)]
    pub vehicle_number: String,

    pub operation_type: OperationKind,
    /// YYMMDD (YYYYMMDD also accepted)
    #[serde(default)]
    pub operation_date: String,
    /// HHMMSS
    #[serde(default)]
    pub operation_time: String,

    #[serde(default)]
    pub booking_reference: Option<String>,
    #[serde(default)]
    pub equipment_reference: Option<String>,

    /// UN/LOCODE of the depot (e.g. "CIABJ")
    #[serde(default)]
    pub location_code: String,
    /// Caller-supplied location detail, used when no customer rule matches
    #[serde(default, alias = "location_detail")]
    pub location_details: Option<String>,

    #[serde(default)]
    pub operator_name: String,
    #[serde(default)]
    pub operator_id: String,
    #[serde(default)]
    pub yard_id: String,

    #[serde(default)]
    pub damage_reported: bool,
    #[serde(default)]
    pub damage_type: Option<String>,
    #[serde(default)]
    pub damage_description: Option<String>,
    #[serde(default)]
    pub damage_assessed_by: Option<String>,
    #[serde(default)]
    pub damage_assessed_at: Option<String>,
}

impl GateEventRecord {
    /// Sender code with the company code fallback applied
    pub fn effective_sender(&self) -> &str {
        if self.sender.trim().is_empty() {
            self.company_code.trim()
        } else {
            self.sender.trim()
        }
    }

    /// Receiver code with the customer fallback applied
    pub fn effective_receiver(&self) -> &str {
        if self.receiver.trim().is_empty() {
            self.customer.trim()
        } else {
            self.receiver.trim()
        }
    }

    /// Non-empty booking reference, if any
    pub fn booking(&self) -> Option<&str> {
        non_blank(self.booking_reference.as_deref())
    }

    /// Non-empty equipment reference, if any
    pub fn equipment(&self) -> Option<&str> {
        non_blank(self.equipment_reference.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
