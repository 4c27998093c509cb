//! CSV loader for gate event exports
//!
//! Expected header (column order free, unknown columns ignored):
//! sender,receiver,company_code,customer,container_number,container_size,
//! container_type,transport_company,vehicle_number,operation_type,
//! operation_date,operation_time,booking_reference,equipment_reference,
//! location_code,location_details,operator_name,operator_id,yard_id

use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use codeco_types::{GateEventRecord, OperationKind};

#[derive(Error, Debug)]
pub enum GateEventCsvError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid operation type in row {row}: {value}")]
    InvalidOperation { row: usize, value: String },
}

impl From<GateEventCsvError> for codeco_types::Error {
    fn from(e: GateEventCsvError) -> Self {
        match e {
            GateEventCsvError::IoError(io) => codeco_types::Error::Io(io),
            other => codeco_types::Error::Csv(other.to_string()),
        }
    }
}

/// Flat CSV row; every cell is text
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GateEventRow {
    sender: String,
    receiver: String,
    company_code: String,
    #[serde(alias = "customer_name")]
    customer: String,
    container_number: String,
    container_size: String,
    container_type: String,
    #[serde(alias = "carrier")]
    transport_company: String,
    vehicle_number: String,
    operation_type: String,
    operation_date: String,
    operation_time: String,
    booking_reference: String,
    equipment_reference: String,
    location_code: String,
    #[serde(alias = "location_detail")]
    location_details: String,
    operator_name: String,
    operator_id: String,
    yard_id: String,
    damage_reported: String,
    damage_type: String,
    damage_description: String,
}

const REQUIRED_COLUMNS: [&str; 3] = ["container_number", "operation_type", "operation_date"];

/// Load gate events from a UTF-8 CSV file with a header row
pub fn load_gate_events<P: AsRef<Path>>(path: P) -> Result<Vec<GateEventRecord>, GateEventCsvError> {
    let file = File::open(path)?;
    read_gate_events(file)
}

/// Load gate events from any CSV reader
pub fn read_gate_events<R: std::io::Read>(
    reader: R,
) -> Result<Vec<GateEventRecord>, GateEventCsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(GateEventCsvError::MissingColumn(col.to_string()));
        }
    }

    let mut records = Vec::new();
    for (row_idx, result) in reader.deserialize::<GateEventRow>().enumerate() {
        let row = result?;
        let row_num = row_idx + 2; // header is row 1
        records.push(into_record(row, row_num)?);
    }

    Ok(records)
}

fn parse_operation(value: &str, row: usize) -> Result<OperationKind, GateEventCsvError> {
    match value.to_uppercase().replace(['-', ' '], "_").as_str() {
        "GATE_IN" | "IN" => Ok(OperationKind::GateIn),
        "GATE_OUT" | "OUT" => Ok(OperationKind::GateOut),
        _ => Err(GateEventCsvError::InvalidOperation {
            row,
            value: value.to_string(),
        }),
    }
}

fn optional(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "yes" | "y" | "1")
}

fn into_record(row: GateEventRow, row_num: usize) -> Result<GateEventRecord, GateEventCsvError> {
    let operation_type = parse_operation(&row.operation_type, row_num)?;
    Ok(GateEventRecord {
        sender: row.sender,
        receiver: row.receiver,
        company_code: row.company_code,
        customer: row.customer,
        container_number: row.container_number,
        container_size: row.container_size,
        container_type: row.container_type,
        transport_company: row.transport_company,
        vehicle_number: row.vehicle_number,
        operation_type,
        operation_date: row.operation_date,
        operation_time: row.operation_time,
        booking_reference: optional(row.booking_reference),
        equipment_reference: optional(row.equipment_reference),
        location_code: row.location_code,
        location_details: optional(row.location_details),
        operator_name: row.operator_name,
        operator_id: row.operator_id,
        yard_id: row.yard_id,
        damage_reported: parse_flag(&row.damage_reported),
        damage_type: optional(row.damage_type),
        damage_description: optional(row.damage_description),
        damage_assessed_by: None,
        damage_assessed_at: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
sender,receiver,customer,container_number,container_size,container_type,operation_type,operation_date,operation_time,booking_reference,location_code
MANTRA,ONEY,ONEY LOGISTICS,TRHU6875483,40,EM,GATE_IN,260205,030200,BK123456,CIABJ
MANTRA,PIL,PIL CONTAINERS, MSCU1234567 ,20,FL,gate out,260206,101500,,CIABJ
";

    #[test]
    fn test_read_gate_events() {
        let records = read_gate_events(CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].operation_type, OperationKind::GateIn);
        assert_eq!(records[0].booking_reference.as_deref(), Some("BK123456"));
        assert_eq!(records[1].container_number, "MSCU1234567");
        assert_eq!(records[1].operation_type, OperationKind::GateOut);
        assert!(records[1].booking_reference.is_none());
    }

    #[test]
    fn test_missing_column() {
        let err = read_gate_events("sender,container_number\nA,B\n".as_bytes()).unwrap_err();
        assert!(matches!(err, GateEventCsvError::MissingColumn(c) if c == "operation_type"));
    }

    #[test]
    fn test_invalid_operation_reports_row() {
        let csv = "container_number,operation_type,operation_date\nTRHU6875483,PARKED,260205\n";
        let err = read_gate_events(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, GateEventCsvError::InvalidOperation { row: 2, .. }));
    }

    #[test]
    fn test_damage_flag() {
        assert!(parse_flag("Yes"));
        assert!(parse_flag("1"));
        assert!(!parse_flag(""));
    }
}
