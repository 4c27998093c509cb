//! Gate event pre-validation
//!
//! The encoder accepts anything; these checks are what callers run first
//! when they need a message a partner will accept.

use std::sync::LazyLock;

use codeco_types::GateEventRecord;
use regex::Regex;
use thiserror::Error;

static CONTAINER_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{4}[0-9]{7}$").expect("static container pattern"));

/// A problem found in a gate event before encoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordIssue {
    #[error("Missing required field: {0}")]
    Missing(&'static str),

    #[error("Invalid container number '{0}' (expected 4 letters + 7 digits)")]
    ContainerNumber(String),

    #[error("Invalid operation date '{0}' (expected YYMMDD or YYYYMMDD)")]
    OperationDate(String),

    #[error("Invalid operation time '{0}' (expected HHMM or HHMMSS)")]
    OperationTime(String),
}

/// ISO 6346 shape: owner code + category letter, serial, check digit
pub fn is_valid_container_number(number: &str) -> bool {
    CONTAINER_NUMBER.is_match(number)
}

fn all_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Every issue in `record`; empty when it is safe to encode
pub fn check_record(record: &GateEventRecord) -> Vec<RecordIssue> {
    let mut issues = Vec::new();

    let required = [
        ("sender", record.effective_sender()),
        ("receiver", record.effective_receiver()),
        ("container_number", record.container_number.as_str()),
        ("container_size", record.container_size.as_str()),
        ("container_type", record.container_type.as_str()),
        ("operation_date", record.operation_date.as_str()),
        ("operation_time", record.operation_time.as_str()),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            issues.push(RecordIssue::Missing(name));
        }
    }

    let number = record.container_number.trim();
    if !number.is_empty() && !is_valid_container_number(number) {
        issues.push(RecordIssue::ContainerNumber(number.to_string()));
    }

    let date = record.operation_date.trim();
    if !date.is_empty() && !(all_digits(date) && matches!(date.len(), 6 | 8)) {
        issues.push(RecordIssue::OperationDate(date.to_string()));
    }

    let time = record.operation_time.trim();
    if !time.is_empty() && !(all_digits(time) && matches!(time.len(), 4 | 6)) {
        issues.push(RecordIssue::OperationTime(time.to_string()));
    }

    issues
}
