//! Outbound file names

use codeco_types::GateEventRecord;

/// `CODECO_<sender><YYYYMMDD><HHMMSS>_<container>_<GATE_IN|GATE_OUT>.edi`
///
/// Built from the operation date and time, so re-encoding the same event
/// targets the same file.
pub fn edi_file_name(record: &GateEventRecord) -> String {
    let date = record.operation_date.trim();
    let date = if date.len() == 6 {
        format!("20{}", date)
    } else {
        date.to_string()
    };
    let time = format!("{:0<6}", record.operation_time.trim());

    format!(
        "CODECO_{}{}{}_{}_{}.edi",
        record.effective_sender(),
        date,
        time,
        record.container_number.trim(),
        record.operation_type.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeco_types::OperationKind;

    #[test]
    fn test_edi_file_name() {
        let record = GateEventRecord {
            sender: "MANTRA".to_string(),
            container_number: "TRHU6875483".to_string(),
            operation_type: OperationKind::GateIn,
            operation_date: "260205".to_string(),
            operation_time: "0302".to_string(),
            ..Default::default()
        };
        assert_eq!(
            edi_file_name(&record),
            "CODECO_MANTRA20260205030200_TRHU6875483_GATE_IN.edi"
        );
    }

    #[test]
    fn test_edi_file_name_gate_out_wide_date() {
        let record = GateEventRecord {
            company_code: "DEPOT".to_string(),
            container_number: "MSCU1234567".to_string(),
            operation_type: OperationKind::GateOut,
            operation_date: "20261231".to_string(),
            operation_time: "235959".to_string(),
            ..Default::default()
        };
        assert_eq!(
            edi_file_name(&record),
            "CODECO_DEPOT20261231235959_MSCU1234567_GATE_OUT.edi"
        );
    }
}
