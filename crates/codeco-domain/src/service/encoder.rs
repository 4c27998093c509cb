//! CODECO message encoder
//!
//! Builds the interchange for one gate event in a fixed segment order:
//!
//! ```text
//! UNB UNH BGM FTX TDT NAD(MS) NAD(CF) [NAD(CA)] EQD [RFF...] DTM LOC CNT UNT UNZ
//! ```
//!
//! The encoder does not validate its input. Missing optional fields drop
//! their segment or leave an empty position; use `check_record` first when
//! the caller needs guarantees.

use codeco_types::GateEventRecord;

use super::clock::{Clock, ControlReferences, SystemClock};
use super::location::{location_code_or, LocationTable, DEFAULT_LOCATION_CODE};
use super::policy::SegmentPolicy;
use crate::model::{composite, SegmentModel};

pub const SYNTAX_IDENTIFIER: &str = "UNOA:1";
pub const MESSAGE_IDENTIFIER: &str = "CODECO:D:95B:UN:ITG14";
/// BGM document name code
pub const DOCUMENT_CODE: &str = "36";
/// BGM message function: original
pub const FUNCTION_ORIGINAL: &str = "9";
/// DTM/LOC qualifiers
pub const TRANSPORT_DATE_QUALIFIER: &str = "203";
pub const PLACE_OF_POSITIONING: &str = "165";

/// Everything the encoder needs besides the record and the clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderSettings {
    pub policy: SegmentPolicy,
    pub locations: LocationTable,
    pub default_location_code: String,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            policy: SegmentPolicy::default(),
            locations: LocationTable::standard(),
            default_location_code: DEFAULT_LOCATION_CODE.to_string(),
        }
    }
}

/// Gate event → CODECO interchange
#[derive(Debug, Clone)]
pub struct CodecoEncoder<C: Clock = SystemClock> {
    settings: EncoderSettings,
    clock: C,
}

impl CodecoEncoder<SystemClock> {
    pub fn new(settings: EncoderSettings) -> Self {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> CodecoEncoder<C> {
    pub fn with_clock(settings: EncoderSettings, clock: C) -> Self {
        Self { settings, clock }
    }

    pub fn settings(&self) -> &EncoderSettings {
        &self.settings
    }

    /// Encode to the wire string
    pub fn encode(&self, record: &GateEventRecord) -> String {
        self.build(record).serialize()
    }

    /// Build the segment model for `record`
    pub fn build(&self, record: &GateEventRecord) -> SegmentModel {
        let policy = &self.settings.policy;
        let sender = record.effective_sender();
        let receiver = record.effective_receiver();
        let container = record.container_number.trim();
        let refs = ControlReferences::derive(sender, self.clock.now());

        log::debug!(
            "Encoding CODECO {} for {} (message ref {}, interchange ref {})",
            record.operation_type,
            container,
            refs.message,
            refs.interchange
        );

        let mut model = SegmentModel::new();

        model.append(
            "UNB",
            [
                SYNTAX_IDENTIFIER.to_string(),
                sender.to_string(),
                receiver.to_string(),
                composite(&[&refs.date, &refs.time]),
                refs.interchange.clone(),
            ],
        );
        model.append("UNH", [refs.message.as_str(), MESSAGE_IDENTIFIER]);
        model.append(
            "BGM",
            [
                DOCUMENT_CODE.to_string(),
                format!("{}{}", container, refs.stamp),
                FUNCTION_ORIGINAL.to_string(),
            ],
        );
        // Damage and operator free text stay out of the message.
        model.append("FTX", ["AAI"]);
        // Pre-carriage by road, truck
        model.append("TDT", ["1", "", "3", "31"]);

        model.append("NAD", ["MS", sender]);
        model.append("NAD", ["CF".to_string(), composite(&[receiver, "160", "20"])]);
        let carrier = record.transport_company.trim();
        if policy.carrier_party && !carrier.is_empty() {
            model.append("NAD", ["CA", carrier]);
        }

        let equipment_type = equipment_type_code(&record.container_type);
        let size_type = format!("{}{}", normalize_size(&record.container_size), equipment_type);
        model.append(
            "EQD",
            [
                "CN".to_string(),
                container.to_string(),
                composite(&[&size_type, "102", "5"]),
                String::new(),
                String::new(),
                policy.equipment_status.indicator(&equipment_type).to_string(),
            ],
        );

        if let Some(booking) = record.booking() {
            model.append("RFF", [composite(&["BN", booking])]);
        }
        if let Some(equipment) = record.equipment() {
            if policy.sends_equipment_reference(&record.customer) {
                model.append(
                    "RFF",
                    [composite(&[policy.equipment_reference_qualifier.code(), equipment])],
                );
            }
        }

        let transport_at = transport_datetime(&record.operation_date, &record.operation_time);
        model.append(
            "DTM",
            [composite(&[
                TRANSPORT_DATE_QUALIFIER,
                &transport_at,
                TRANSPORT_DATE_QUALIFIER,
            ])],
        );

        let location_code =
            location_code_or(&record.location_code, &self.settings.default_location_code);
        let detail = self
            .settings
            .locations
            .resolve(&record.customer, record.location_details.as_deref());
        model.append(
            "LOC",
            [
                PLACE_OF_POSITIONING.to_string(),
                composite(&[location_code, "139", "6"]),
                detail.to_string(),
            ],
        );

        // One equipment item
        model.append("CNT", ["16:1"]);

        // UNH..UNT inclusive: everything so far minus UNB, plus UNT itself
        let segment_count = model.len();
        model.append("UNT", [segment_count.to_string(), refs.message.clone()]);
        model.append("UNZ", ["1".to_string(), refs.interchange]);

        model
    }
}

/// Equipment type code for a load state or descriptive container type
pub fn equipment_type_code(raw: &str) -> String {
    let raw = raw.trim();
    match raw.to_lowercase().as_str() {
        "dry" | "empty" => "EM".to_string(),
        "full" => "FL".to_string(),
        "reefer" => "RE".to_string(),
        "tank" => "TK".to_string(),
        "flat_rack" => "FR".to_string(),
        "open_top" => "OT".to_string(),
        _ => raw.to_uppercase(),
    }
}

/// Size code without a trailing "ft"
pub fn normalize_size(raw: &str) -> String {
    raw.trim().replace("ft", "")
}

/// CCYYMMDDHHMM from a YYMMDD (or YYYYMMDD) date and an HHMM[SS] time
pub fn transport_datetime(date: &str, time: &str) -> String {
    let date = date.trim();
    let hhmm: String = time.trim().chars().take(4).collect();
    if date.len() == 8 {
        format!("{}{}", date, hhmm)
    } else {
        format!("20{}{}", date, hhmm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::clock::FixedClock;
    use crate::service::location::{ONEY_LOCATION_DETAIL, PIL_LOCATION_DETAIL};
    use crate::service::policy::{EquipmentStatusPolicy, ReferenceQualifier};
    use chrono::NaiveDate;
    use codeco_types::OperationKind;

    fn clock() -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2026, 2, 5)
                .unwrap()
                .and_hms_opt(14, 28, 0)
                .unwrap(),
        )
    }

    fn oney_record() -> GateEventRecord {
        GateEventRecord {
            sender: "MANTRA".to_string(),
            receiver: "ONEY".to_string(),
            company_code: "MANTRA".to_string(),
            customer: "ONEY LOGISTICS".to_string(),
            container_number: "TRHU6875483".to_string(),
            container_size: "40".to_string(),
            container_type: "EM".to_string(),
            transport_company: "TEST TRANSPORT".to_string(),
            vehicle_number: "AB-123-CD".to_string(),
            operation_type: OperationKind::GateIn,
            operation_date: "260205".to_string(),
            operation_time: "030200".to_string(),
            booking_reference: Some("BK123456".to_string()),
            equipment_reference: Some("SEAL123".to_string()),
            location_code: "CIABJ".to_string(),
            location_details: Some("CIABJ32:STO:ZZZ".to_string()),
            operator_name: "John Doe".to_string(),
            operator_id: "OP001".to_string(),
            yard_id: "YARD01".to_string(),
            ..Default::default()
        }
    }

    fn encoder() -> CodecoEncoder<FixedClock> {
        CodecoEncoder::with_clock(EncoderSettings::default(), clock())
    }

    #[test]
    fn test_full_message() {
        let wire = encoder().encode(&oney_record());
        assert_eq!(
            wire,
            "UNB+UNOA:1+MANTRA+ONEY+260205:1428+MANTRA0205'\
             UNH+COD02051428+CODECO:D:95B:UN:ITG14'\
             BGM+36+TRHU687548302051428+9'\
             FTX+AAI'\
             TDT+1++3+31'\
             NAD+MS+MANTRA'\
             NAD+CF+ONEY:160:20'\
             EQD+CN+TRHU6875483+40EM:102:5+++4'\
             RFF+BN:BK123456'\
             RFF+EQR:SEAL123'\
             DTM+203:202602050302:203'\
             LOC+165+CIABJ:139:6+CIABJ32:STO:ZZZ'\
             CNT+16:1'\
             UNT+13+COD02051428'\
             UNZ+1+MANTRA0205'"
        );
    }

    #[test]
    fn test_segment_count_matches_unh_to_unt() {
        let model = encoder().build(&oney_record());
        let tags: Vec<&str> = model.segments().iter().map(|s| s.tag.as_str()).collect();
        let unh = tags.iter().position(|t| *t == "UNH").unwrap();
        let unt = tags.iter().position(|t| *t == "UNT").unwrap();
        let declared: usize = model.find("UNT").unwrap().element(0).parse().unwrap();
        assert_eq!(declared, unt - unh + 1);
    }

    #[test]
    fn test_optional_references_omitted() {
        let record = GateEventRecord {
            booking_reference: None,
            equipment_reference: Some("  ".to_string()),
            ..oney_record()
        };
        let wire = encoder().encode(&record);
        assert!(!wire.contains("RFF+"));
        assert!(wire.contains("UNT+11+COD02051428'"));
    }

    #[test]
    fn test_equipment_reference_only_for_oney() {
        let record = GateEventRecord {
            customer: "PIL CONTAINERS".to_string(),
            ..oney_record()
        };
        let wire = encoder().encode(&record);
        assert!(wire.contains("RFF+BN:BK123456'"));
        assert!(!wire.contains("SEAL123"));
    }

    #[test]
    fn test_location_detail_by_customer() {
        let encoder = encoder();
        let pil = GateEventRecord {
            customer: "PIL CONTAINERS".to_string(),
            location_details: Some("CIABJ99:STO:ZZZ".to_string()),
            ..oney_record()
        };
        let oney = GateEventRecord {
            location_details: Some("CIABJ99:STO:ZZZ".to_string()),
            ..oney_record()
        };
        let other = GateEventRecord {
            customer: "OTHER CORP".to_string(),
            location_details: Some("CIABJ99:STO:ZZZ".to_string()),
            ..oney_record()
        };
        assert!(encoder
            .encode(&pil)
            .contains(&format!("LOC+165+CIABJ:139:6+{}'", PIL_LOCATION_DETAIL)));
        assert!(encoder
            .encode(&oney)
            .contains(&format!("LOC+165+CIABJ:139:6+{}'", ONEY_LOCATION_DETAIL)));
        assert!(encoder
            .encode(&other)
            .contains("LOC+165+CIABJ:139:6+CIABJ99:STO:ZZZ'"));
    }

    #[test]
    fn test_bn_qualifier_policy() {
        let settings = EncoderSettings {
            policy: SegmentPolicy {
                equipment_reference_qualifier: ReferenceQualifier::Bn,
                ..Default::default()
            },
            ..Default::default()
        };
        let wire = CodecoEncoder::with_clock(settings, clock()).encode(&oney_record());
        assert!(wire.contains("RFF+BN:BK123456'RFF+BN:SEAL123'"));
    }

    #[test]
    fn test_carrier_party_policy() {
        let settings = EncoderSettings {
            policy: SegmentPolicy {
                carrier_party: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let wire = CodecoEncoder::with_clock(settings, clock()).encode(&oney_record());
        assert!(wire.contains("NAD+CF+ONEY:160:20'NAD+CA+TEST TRANSPORT'EQD"));
        assert!(wire.contains("UNT+14+COD02051428'"));
    }

    #[test]
    fn test_full_container_status_policy() {
        let settings = EncoderSettings {
            policy: SegmentPolicy {
                equipment_status: EquipmentStatusPolicy::FromLoadState,
                ..Default::default()
            },
            ..Default::default()
        };
        let record = GateEventRecord {
            container_type: "full".to_string(),
            ..oney_record()
        };
        let wire = CodecoEncoder::with_clock(settings, clock()).encode(&record);
        assert!(wire.contains("EQD+CN+TRHU6875483+40FL:102:5+++5'"));
    }

    #[test]
    fn test_full_container_default_policy_still_empty() {
        let record = GateEventRecord {
            container_type: "FL".to_string(),
            ..oney_record()
        };
        assert!(encoder()
            .encode(&record)
            .contains("EQD+CN+TRHU6875483+40FL:102:5+++4'"));
    }

    #[test]
    fn test_sender_falls_back_to_company_code() {
        let record = GateEventRecord {
            sender: String::new(),
            company_code: "DEPOT".to_string(),
            ..oney_record()
        };
        let wire = encoder().encode(&record);
        assert!(wire.starts_with("UNB+UNOA:1+DEPOT+ONEY+260205:1428+DEPOT0205'"));
        assert!(wire.contains("NAD+MS+DEPOT'"));
        assert!(wire.ends_with("UNZ+1+DEPOT0205'"));
    }

    #[test]
    fn test_uuid_location_code_replaced() {
        let record = GateEventRecord {
            location_code: "3f2504e0-4f89-11d3-9a0c-0305e82c3301".to_string(),
            ..oney_record()
        };
        assert!(encoder().encode(&record).contains("LOC+165+CIABJ:139:6+"));
    }

    #[test]
    fn test_equipment_type_code() {
        assert_eq!(equipment_type_code("reefer"), "RE");
        assert_eq!(equipment_type_code("Flat_Rack"), "FR");
        assert_eq!(equipment_type_code("em"), "EM");
        assert_eq!(equipment_type_code("dry"), "EM");
    }

    #[test]
    fn test_normalize_size() {
        assert_eq!(normalize_size("40ft"), "40");
        assert_eq!(normalize_size(" 20 "), "20");
    }

    #[test]
    fn test_transport_datetime() {
        assert_eq!(transport_datetime("260205", "030200"), "202602050302");
        assert_eq!(transport_datetime("20260205", "0302"), "202602050302");
    }
}
