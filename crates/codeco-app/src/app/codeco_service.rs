//! CODECO Service - gate event to delivered EDI file
//!
//! Workflow for one record:
//! 1. Pre-validate the record
//! 2. Encode the CODECO interchange
//! 3. Run the structural checks on the result
//! 4. Write `<output_dir>/<file name>.edi`
//! 5. Optionally deliver it, skipping content already in the transmission log

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use codeco_domain::repository::{Delivery, MessageTransport};
use codeco_domain::service::{
    check_record, decode, edi_file_name, validate, Clock, CodecoEncoder, EncoderSettings,
    SystemClock,
};
use codeco_infra::TransmissionLog;
use codeco_types::{
    CodecError, Error, GateEventRecord, OperationKind, ParsedMessage, Result, TransferError,
    ValidationReport,
};

/// An encoded, structurally valid message
#[derive(Debug, Clone, Serialize)]
pub struct PreparedMessage {
    pub file_name: String,
    pub container_number: String,
    pub operation_type: OperationKind,
    pub content: String,
    /// Set once written to the output directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Validation and decoding of existing wire content
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub report: ValidationReport,
    /// None when no segment could be read at all
    pub message: Option<ParsedMessage>,
}

pub struct CodecoService<C: Clock = SystemClock> {
    encoder: CodecoEncoder<C>,
    output_dir: PathBuf,
}

impl CodecoService<SystemClock> {
    pub fn new(settings: EncoderSettings, output_dir: PathBuf) -> Self {
        Self {
            encoder: CodecoEncoder::new(settings),
            output_dir,
        }
    }
}

impl<C: Clock> CodecoService<C> {
    pub fn with_clock(settings: EncoderSettings, clock: C, output_dir: PathBuf) -> Self {
        Self {
            encoder: CodecoEncoder::with_clock(settings, clock),
            output_dir,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Check, encode and validate one record without touching the disk
    pub fn prepare(&self, record: &GateEventRecord) -> Result<PreparedMessage> {
        let issues = check_record(record);
        if !issues.is_empty() {
            let joined = issues
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(Error::InvalidRecord(joined));
        }

        let content = self.encoder.encode(record);
        let report = validate(&content);
        if !report.is_valid {
            return Err(Error::InvalidMessage(report.errors.join("; ")));
        }

        Ok(PreparedMessage {
            file_name: edi_file_name(record),
            container_number: record.container_number.trim().to_string(),
            operation_type: record.operation_type,
            content,
            path: None,
        })
    }

    /// Prepare and write the message into the output directory
    pub fn generate(&self, record: &GateEventRecord) -> Result<PreparedMessage> {
        let mut prepared = self.prepare(record)?;
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(&prepared.file_name);
        fs::write(&path, &prepared.content)?;
        log::debug!("Wrote {}", path.display());
        prepared.path = Some(path);
        Ok(prepared)
    }
}

/// Deliver a prepared message once, recording it in the transmission log.
/// A gate event whose file name is already logged is refused even when its
/// clock-stamped references differ.
pub fn send(
    prepared: &PreparedMessage,
    transport: &dyn MessageTransport,
    log: &TransmissionLog,
) -> Result<Delivery> {
    if let Some(previous) = log.find(&prepared.file_name) {
        return Err(TransferError::Duplicate(previous.file_name).into());
    }

    let delivery = transport.deliver(&prepared.content, &prepared.file_name)?;
    log.record(
        &prepared.content,
        &prepared.file_name,
        &prepared.container_number,
        prepared.operation_type,
        &delivery,
    )?;
    Ok(delivery)
}

/// Validate and decode wire content
pub fn inspect(content: &str) -> Result<Inspection> {
    let report = validate(content);
    let message = match decode(content) {
        Ok(message) => Some(message),
        Err(CodecError::NoSegments) => None,
    };
    Ok(Inspection { report, message })
}

/// Read and inspect an EDI file
pub fn inspect_file(path: &Path) -> Result<Inspection> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path)?;
    inspect(&content)
}
