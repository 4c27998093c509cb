//! Per-partner segment construction policy
//!
//! Partners disagree on a few CODECO details (third NAD party, RFF qualifier
//! for the equipment reference, EQD full/empty indicator). One deployment
//! fixes one choice for each.

use serde::{Deserialize, Serialize};

/// RFF qualifier used for the equipment reference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceQualifier {
    #[default]
    #[serde(rename = "EQR", alias = "eqr")]
    Eqr,
    #[serde(rename = "BN", alias = "bn")]
    Bn,
}

impl ReferenceQualifier {
    pub fn code(&self) -> &'static str {
        match self {
            ReferenceQualifier::Eqr => "EQR",
            ReferenceQualifier::Bn => "BN",
        }
    }
}

/// How the EQD full/empty indicator is filled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatusPolicy {
    /// Always "4" (empty)
    #[default]
    AlwaysEmpty,
    /// "5" for FL, "4" otherwise
    FromLoadState,
}

/// Full/empty indicator codes (UN/EDIFACT 8169)
pub const EMPTY_INDICATOR: &str = "4";
pub const FULL_INDICATOR: &str = "5";

impl EquipmentStatusPolicy {
    pub fn indicator(&self, equipment_type: &str) -> &'static str {
        match self {
            EquipmentStatusPolicy::AlwaysEmpty => EMPTY_INDICATOR,
            EquipmentStatusPolicy::FromLoadState if equipment_type == "FL" => FULL_INDICATOR,
            EquipmentStatusPolicy::FromLoadState => EMPTY_INDICATOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentPolicy {
    /// Emit `NAD+CA+<carrier>` after the two mandatory parties
    pub carrier_party: bool,
    pub equipment_reference_qualifier: ReferenceQualifier,
    pub equipment_status: EquipmentStatusPolicy,
    /// Customer substrings for which the equipment reference RFF is sent
    pub equipment_reference_customers: Vec<String>,
}

impl Default for SegmentPolicy {
    fn default() -> Self {
        Self {
            carrier_party: false,
            equipment_reference_qualifier: ReferenceQualifier::Eqr,
            equipment_status: EquipmentStatusPolicy::AlwaysEmpty,
            equipment_reference_customers: vec!["ONEY".to_string()],
        }
    }
}

impl SegmentPolicy {
    /// Whether `customer` receives the equipment reference RFF
    pub fn sends_equipment_reference(&self, customer: &str) -> bool {
        let customer = customer.to_uppercase();
        self.equipment_reference_customers
            .iter()
            .filter(|p| !p.is_empty())
            .any(|p| customer.contains(&p.to_uppercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = SegmentPolicy::default();
        assert!(!policy.carrier_party);
        assert_eq!(policy.equipment_reference_qualifier.code(), "EQR");
        assert_eq!(policy.equipment_status.indicator("FL"), "4");
    }

    #[test]
    fn test_status_from_load_state() {
        let status = EquipmentStatusPolicy::FromLoadState;
        assert_eq!(status.indicator("FL"), "5");
        assert_eq!(status.indicator("EM"), "4");
    }

    #[test]
    fn test_equipment_reference_customers() {
        let policy = SegmentPolicy::default();
        assert!(policy.sends_equipment_reference("oney logistics"));
        assert!(!policy.sends_equipment_reference("PIL CONTAINERS"));
    }

    #[test]
    fn test_policy_deserialize_partial() {
        let policy: SegmentPolicy =
            serde_json::from_str(r#"{"equipment_reference_qualifier": "BN"}"#).unwrap();
        assert_eq!(policy.equipment_reference_qualifier, ReferenceQualifier::Bn);
        assert_eq!(policy.equipment_reference_customers, vec!["ONEY".to_string()]);
    }
}
