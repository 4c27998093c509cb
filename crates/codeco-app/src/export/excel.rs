//! Excel export of batch reports

use crate::app::BatchReport;
use codeco_types::{Error, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

/// Export a batch report to an Excel file
pub fn export_to_excel(report: &BatchReport, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, report)?;

    let details_sheet = workbook.add_worksheet();
    write_details_sheet(details_sheet, report)?;

    workbook
        .save(output_path)
        .map_err(|e| Error::Excel(e.to_string()))?;

    Ok(())
}

fn write_summary_sheet(sheet: &mut Worksheet, report: &BatchReport) -> Result<()> {
    sheet
        .set_name("Summary")
        .map_err(|e| Error::Excel(e.to_string()))?;

    let header_format = Format::new().set_bold();

    sheet
        .write_string_with_format(0, 0, "CODECO Batch Report", &header_format)
        .map_err(|e| Error::Excel(e.to_string()))?;

    let rows: [(&str, String); 5] = [
        ("Started:", report.started_at.to_rfc3339()),
        ("Completed:", report.completed_at.to_rfc3339()),
        ("Total Records:", report.total_processed.to_string()),
        ("Successful:", report.successful.to_string()),
        ("Failed:", report.failed.to_string()),
    ];
    for (i, (label, value)) in rows.iter().enumerate() {
        let row = (i + 2) as u32;
        sheet
            .write_string(row, 0, *label)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 1, value)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    // Status breakdown
    sheet
        .write_string_with_format(8, 0, "By Status", &header_format)
        .map_err(|e| Error::Excel(e.to_string()))?;

    let mut status_counts = std::collections::BTreeMap::new();
    for entry in &report.entries {
        *status_counts.entry(entry.status.label()).or_insert(0usize) += 1;
    }

    let mut row = 9;
    for (status, count) in &status_counts {
        sheet
            .write_string(row, 0, *status)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_number(row, 1, *count as f64)
            .map_err(|e| Error::Excel(e.to_string()))?;
        row += 1;
    }

    Ok(())
}

fn write_details_sheet(sheet: &mut Worksheet, report: &BatchReport) -> Result<()> {
    sheet
        .set_name("Details")
        .map_err(|e| Error::Excel(e.to_string()))?;

    let header_format = Format::new().set_bold();

    let headers = [
        "Container",
        "Operation",
        "Status",
        "File",
        "Remote Path",
        "Attempts",
        "Error",
    ];

    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    for (row_idx, entry) in report.entries.iter().enumerate() {
        let row = (row_idx + 1) as u32;

        sheet
            .write_string(row, 0, &entry.container_number)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 1, entry.operation_type.label())
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 2, entry.status.label())
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 3, entry.file_name.as_deref().unwrap_or("-"))
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 4, entry.remote_path.as_deref().unwrap_or("-"))
            .map_err(|e| Error::Excel(e.to_string()))?;
        if let Some(attempts) = entry.attempts {
            sheet
                .write_number(row, 5, attempts as f64)
                .map_err(|e| Error::Excel(e.to_string()))?;
        }
        sheet
            .write_string(row, 6, entry.error.as_deref().unwrap_or(""))
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    sheet
        .set_column_width(0, 14)
        .map_err(|e| Error::Excel(e.to_string()))?;
    sheet
        .set_column_width(3, 52)
        .map_err(|e| Error::Excel(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{BatchEntry, BatchStatus};
    use chrono::Utc;
    use codeco_types::OperationKind;
    use tempfile::TempDir;

    #[test]
    fn test_export_to_excel() {
        let dir = TempDir::new().unwrap();
        let now = Utc::now();
        let report = BatchReport {
            entries: vec![
                BatchEntry {
                    container_number: "TRHU6875483".to_string(),
                    operation_type: OperationKind::GateIn,
                    status: BatchStatus::Sent,
                    file_name: Some("CODECO_A.edi".to_string()),
                    remote_path: Some("/out/CODECO_A.edi".to_string()),
                    attempts: Some(1),
                    error: None,
                },
                BatchEntry {
                    container_number: "BAD".to_string(),
                    operation_type: OperationKind::GateOut,
                    status: BatchStatus::Rejected,
                    file_name: None,
                    remote_path: None,
                    attempts: None,
                    error: Some("Invalid gate event".to_string()),
                },
            ],
            total_processed: 2,
            successful: 1,
            failed: 1,
            started_at: now,
            completed_at: now,
        };

        let path = dir.path().join("report.xlsx");
        export_to_excel(&report, &path).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
