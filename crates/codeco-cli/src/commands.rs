//! Command handlers

use crate::cli::{Cli, Commands, OutputFormat};
use crate::output::{
    output_batch_report, output_history, output_inspection, output_prepared, output_validation,
};
use chrono::Local;
use codeco_app::app::{self, run_batch, BatchEntry, CodecoService, Dispatch};
use codeco_app::config::Config;
use codeco_app::export::{export_to_excel, xml_file_name, XmlReport};
use codeco_app::repository::{open_gate_event_repo, open_outbox, open_transmission_log};
use codeco_app::scanner::collect_inputs;
use codeco_domain::repository::GateEventRepository;
use codeco_domain::service::validate;
use codeco_types::{CodecError, ConfigError, Error, GateEventRecord, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

pub fn execute(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let output_format = cli.format.unwrap_or(config.output_format);

    match &cli.command {
        Commands::Generate {
            record,
            output_dir,
            stdout,
            send,
        } => cmd_generate(
            &cli,
            &config,
            record,
            output_dir.clone(),
            *stdout,
            *send,
            output_format,
        ),

        Commands::Batch {
            source,
            send,
            report,
            output_dir,
        } => cmd_batch(
            &cli,
            &config,
            source,
            output_dir.clone(),
            *send,
            report.clone(),
            output_format,
        ),

        Commands::Parse {
            file,
            xml,
            created_by,
        } => cmd_parse(file, xml.clone(), created_by, output_format),

        Commands::Validate { path } => cmd_validate(path, output_format),

        Commands::Export { report, output } => cmd_export(report.clone(), output.clone()),

        Commands::History { container, limit } => {
            cmd_history(container.as_deref(), *limit, output_format)
        }

        Commands::Config { show, set, reset } => cmd_config(*show, set, *reset),
    }
}

/// Service configured from the config file and the partner profile
fn build_service(cli: &Cli, config: &Config, output_dir: Option<PathBuf>) -> Result<CodecoService> {
    let profile = config.partner_profile(cli.config_profile.as_deref())?;
    if let Some(profile) = &profile {
        log::debug!(
            "Using partner profile {}",
            profile.name.as_deref().unwrap_or("(unnamed)")
        );
    }
    let output_dir = match output_dir {
        Some(dir) => dir,
        None => config.output_dir()?,
    };
    Ok(CodecoService::new(
        config.encoder_settings(profile.as_ref()),
        output_dir,
    ))
}

fn cmd_generate(
    cli: &Cli,
    config: &Config,
    record_path: &Path,
    output_dir: Option<PathBuf>,
    stdout: bool,
    send: bool,
    output_format: OutputFormat,
) -> Result<()> {
    if !record_path.exists() {
        return Err(Error::FileNotFound(record_path.display().to_string()));
    }
    let content = fs::read_to_string(record_path)?;
    let mut record: GateEventRecord = serde_json::from_str(&content)?;
    config.apply_defaults(&mut record);

    let service = build_service(cli, config, output_dir)?;

    if stdout {
        let prepared = service.prepare(&record)?;
        println!("{}", prepared.content);
        return Ok(());
    }

    let prepared = service.generate(&record)?;
    let delivery = if send {
        let transport = open_outbox(config)?;
        let log = open_transmission_log()?;
        Some(app::send(&prepared, &transport, &log)?)
    } else {
        None
    };

    output_prepared(output_format, &prepared, delivery.as_ref())
}

fn progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

fn cmd_batch(
    cli: &Cli,
    config: &Config,
    source: &Path,
    output_dir: Option<PathBuf>,
    send: bool,
    report_path: Option<PathBuf>,
    output_format: OutputFormat,
) -> Result<()> {
    let repo = open_gate_event_repo(source.to_path_buf())?;
    let mut records = repo.find_all()?;

    if records.is_empty() {
        return Err(Error::FileNotFound(format!(
            "No gate events found in {}",
            source.display()
        )));
    }
    for record in &mut records {
        config.apply_defaults(record);
    }

    let service = build_service(cli, config, output_dir)?;
    log::info!(
        "Processing {} records into {}{}",
        records.len(),
        service.output_dir().display(),
        if send { " (with delivery)" } else { "" }
    );

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(progress_style());
    let progress = |done: usize, _total: usize, entry: &BatchEntry| {
        pb.set_position(done as u64);
        pb.set_message(format!(
            "{} {}",
            entry.container_number,
            entry.status.label()
        ));
    };

    let report = if send {
        let transport = open_outbox(config)?;
        let log = open_transmission_log()?;
        let dispatch = Dispatch {
            transport: &transport,
            log: &log,
        };
        run_batch(&service, &records, Some(&dispatch), Some(&progress))
    } else {
        run_batch(&service, &records, None, Some(&progress))
    };
    pb.finish_and_clear();

    if let Some(path) = report_path {
        report.save(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    output_batch_report(output_format, &report)
}

fn cmd_parse(
    file: &Path,
    xml: Option<PathBuf>,
    created_by: &str,
    output_format: OutputFormat,
) -> Result<()> {
    let inspection = app::inspect_file(file)?;
    output_inspection(output_format, file, &inspection)?;

    let Some(target) = xml else {
        return Ok(());
    };
    let message = inspection.message.as_ref().ok_or(CodecError::NoSegments)?;
    let at = Local::now().naive_local();
    let report = XmlReport::from_message(message, at, created_by);
    let path = if target.is_dir() {
        target.join(xml_file_name(&report.customer, created_by, at))
    } else {
        target
    };
    fs::write(&path, report.to_xml()?)?;
    eprintln!("XML written to: {}", path.display());
    Ok(())
}

fn cmd_validate(path: &Path, output_format: OutputFormat) -> Result<()> {
    let files = collect_inputs(path)?;
    if files.is_empty() {
        return Err(Error::FileNotFound(format!(
            "No EDI files found in {}",
            path.display()
        )));
    }

    let mut results = Vec::with_capacity(files.len());
    for file in files {
        let content = fs::read_to_string(&file)?;
        let report = validate(&content);
        results.push((file, report));
    }
    output_validation(output_format, &results)?;

    let invalid = results.iter().filter(|(_, r)| !r.is_valid).count();
    if invalid > 0 {
        return Err(Error::InvalidMessage(format!(
            "{} of {} files failed validation",
            invalid,
            results.len()
        )));
    }
    Ok(())
}

fn cmd_export(report_path: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let report = app::BatchReport::load(&report_path)?;

    let output_path = output.unwrap_or_else(|| {
        let stem = report_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("report");
        report_path.with_file_name(format!("{}.xlsx", stem))
    });

    export_to_excel(&report, &output_path)?;

    println!("Exported to: {}", output_path.display());
    Ok(())
}

fn cmd_history(container: Option<&str>, limit: usize, output_format: OutputFormat) -> Result<()> {
    let log = open_transmission_log()?;
    let entries = match container {
        Some(container) => log.for_container(container.trim()),
        None => log.all_entries(),
    };
    output_history(output_format, &entries, log.len(), limit)
}

fn cmd_config(show: bool, set: &[String], reset: bool) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;

    for pair in set {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            ConfigError::ParseError(format!("Expected KEY=VALUE, got: {}", pair))
        })?;
        config.set(key.trim(), value.trim())?;
    }

    let modified = !set.is_empty();
    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
