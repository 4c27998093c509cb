//! Output formatting module

use codeco_app::app::{BatchReport, Inspection, PreparedMessage};
use codeco_domain::repository::Delivery;
use codeco_infra::TransmissionEntry;
use codeco_types::{OutputFormat, ParsedMessage, Result, ValidationReport};
use serde_json::json;
use std::path::{Path, PathBuf};

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn output_prepared(
    output_format: OutputFormat,
    prepared: &PreparedMessage,
    delivery: Option<&Delivery>,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&json!({ "message": prepared, "delivery": delivery }));
    }

    println!("\nCODECO Message");
    println!("==============");
    println!("Container:   {}", prepared.container_number);
    println!("Operation:   {}", prepared.operation_type);
    println!("File:        {}", prepared.file_name);
    if let Some(path) = &prepared.path {
        println!("Written to:  {}", path.display());
    }
    if let Some(delivery) = delivery {
        println!(
            "Delivered:   {} (attempts: {})",
            delivery.remote_path, delivery.attempts
        );
    }
    Ok(())
}

pub fn output_inspection(
    output_format: OutputFormat,
    file: &Path,
    inspection: &Inspection,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&json!({
            "file": file,
            "validation": inspection.report,
            "message": inspection.message,
        }));
    }

    println!("\nCODECO Message: {}", file.display());
    println!("==============");
    print_report_lines(&inspection.report);

    let Some(message) = &inspection.message else {
        println!("\nNo segments found.");
        return Ok(());
    };
    print_message(message);
    Ok(())
}

fn print_report_lines(report: &ValidationReport) {
    if report.is_valid {
        println!("Structure:   valid");
    } else {
        println!("Structure:   INVALID");
        for error in &report.errors {
            println!("  - {}", error);
        }
    }
}

fn print_message(message: &ParsedMessage) {
    let dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    let info = &message.message_info;

    println!("\n--- Interchange ---");
    println!("Sender:      {}", dash(&info.sender));
    println!("Receiver:    {}", dash(&info.receiver));
    println!("Prepared:    {} {}", dash(&info.date), dash(&info.time));
    println!("Control ref: {}", dash(&info.interchange_control_ref));
    println!("Message ref: {}", dash(&info.message_reference));
    println!(
        "Type:        {} {}/{}",
        dash(&info.message_type),
        dash(&info.message_version),
        dash(&info.message_release)
    );
    println!("Segments:    {}", dash(&info.segment_count));

    println!("\n--- Container ---");
    let details = &message.container_details;
    println!("Number:      {}", dash(&details.number));
    println!("Size:        {}", dash(&details.size));
    println!("Type:        {}", dash(&details.equipment_type));
    println!("Status:      {}", dash(&details.status));

    if !message.parties.is_empty() {
        println!("\n--- Parties ---");
        for party in &message.parties {
            match &party.name {
                Some(name) => println!("{:<4} {} ({})", party.qualifier, party.id, name),
                None => println!("{:<4} {}", party.qualifier, party.id),
            }
        }
    }

    if !message.locations.is_empty() {
        println!("\n--- Locations ---");
        for location in &message.locations {
            println!(
                "{:<4} {} {}",
                location.qualifier,
                location.id,
                location.detail.as_deref().unwrap_or("")
            );
        }
    }

    if !message.dates.is_empty() || !message.references.is_empty() {
        println!("\n--- Dates / References ---");
        for date in &message.dates {
            println!("DTM {:<4} {} ({})", date.qualifier, date.value, date.format);
        }
        for reference in &message.references {
            println!("RFF {:<4} {}", reference.qualifier, reference.value);
        }
    }
}

pub fn output_validation(
    output_format: OutputFormat,
    results: &[(PathBuf, ValidationReport)],
) -> Result<()> {
    if output_format == OutputFormat::Json {
        let items: Vec<_> = results
            .iter()
            .map(|(file, report)| {
                json!({
                    "file": file,
                    "is_valid": report.is_valid,
                    "errors": report.errors,
                })
            })
            .collect();
        return print_json(&items);
    }

    println!("\nValidation Results");
    println!("==================");
    for (file, report) in results {
        let status = if report.is_valid { "OK" } else { "FAIL" };
        println!("[{:<4}] {}", status, file.display());
        for error in &report.errors {
            println!("       - {}", error);
        }
    }
    let valid = results.iter().filter(|(_, r)| r.is_valid).count();
    println!("\n{} of {} files valid", valid, results.len());
    Ok(())
}

pub fn output_batch_report(output_format: OutputFormat, report: &BatchReport) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(report);
    }

    println!("\nBatch Summary");
    println!("=============");
    println!("Total:       {}", report.total_processed);
    println!("Successful:  {}", report.successful);
    println!("Failed:      {}", report.failed);
    println!(
        "Duration:    {:.1}s",
        (report.completed_at - report.started_at).num_milliseconds() as f64 / 1000.0
    );
    println!();

    println!(
        "{:<12} {:<9} {:<10} {}",
        "Container", "Operation", "Status", "File / Error"
    );
    println!("{}", "-".repeat(78));
    for entry in &report.entries {
        let detail = entry
            .error
            .as_deref()
            .or(entry.file_name.as_deref())
            .unwrap_or("-");
        println!(
            "{:<12} {:<9} {:<10} {}",
            entry.container_number,
            entry.operation_type.label(),
            entry.status.label(),
            detail
        );
    }
    Ok(())
}

pub fn output_history(
    output_format: OutputFormat,
    entries: &[TransmissionEntry],
    total: usize,
    limit: usize,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        let shown: Vec<_> = entries.iter().take(limit).collect();
        return print_json(&shown);
    }

    println!("Transmission History");
    println!("====================");
    println!("Total entries: {}", total);
    println!();

    if entries.is_empty() {
        println!("No entries found.");
        return Ok(());
    }

    println!(
        "{:<12} {:<9} {:>3} {:<12} {}",
        "Container", "Operation", "Try", "Sent", "File"
    );
    println!("{}", "-".repeat(78));

    for entry in entries.iter().take(limit) {
        println!(
            "{:<12} {:<9} {:>3} {:<12} {}",
            entry.container_number,
            entry.operation_type.label(),
            entry.attempts,
            entry.transmitted_at.format("%m/%d %H:%M").to_string(),
            entry.file_name
        );
    }

    if entries.len() > limit {
        println!();
        println!("... and {} more entries", entries.len() - limit);
    }

    Ok(())
}
