//! CLI definition using clap

use clap::{Parser, Subcommand};
use codeco_app::export::EDI_IMPORT_USER;
use std::path::PathBuf;

pub use codeco_types::OutputFormat;

#[derive(Parser)]
#[command(name = "codeco-gate")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Encode, decode and validate EDIFACT CODECO gate messages")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output (debug logging unless RUST_LOG is set)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Partner profile TOML overriding the configured one
    #[arg(long, global = true)]
    pub config_profile: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode one gate event record (JSON) into a CODECO file
    Generate {
        /// Path to the gate event JSON
        record: PathBuf,

        /// Directory for the .edi file (overrides config)
        #[arg(long, short = 'o')]
        output_dir: Option<PathBuf>,

        /// Print the interchange instead of writing a file
        #[arg(long, conflicts_with = "send")]
        stdout: bool,

        /// Deliver the file to the configured remote directory
        #[arg(long)]
        send: bool,
    },

    /// Encode every record of a JSON or CSV gate event source
    Batch {
        /// Gate event source (.json or .csv)
        source: PathBuf,

        /// Deliver each generated file
        #[arg(long)]
        send: bool,

        /// Save the batch report as JSON
        #[arg(long)]
        report: Option<PathBuf>,

        /// Directory for the .edi files (overrides config)
        #[arg(long, short = 'o')]
        output_dir: Option<PathBuf>,
    },

    /// Decode an EDI file
    Parse {
        /// Path to the EDI file
        file: PathBuf,

        /// Also write the SAP XML report (file or directory)
        #[arg(long)]
        xml: Option<PathBuf>,

        /// Creator recorded in the XML report
        #[arg(long, default_value = EDI_IMPORT_USER)]
        created_by: String,
    },

    /// Run the structural checks on an EDI file or a folder of them
    Validate {
        /// EDI file or folder
        path: PathBuf,
    },

    /// Export a batch report to Excel
    Export {
        /// Batch report JSON
        report: PathBuf,

        /// Output Excel file path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Show delivered messages
    History {
        /// Only entries for this container
        #[arg(long)]
        container: Option<String>,

        /// Limit number of entries shown
        #[arg(long, short = 'n', default_value = "20")]
        limit: usize,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set a value (KEY=VALUE, repeatable)
        #[arg(long, value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// Reset to default configuration
        #[arg(long)]
        reset: bool,
    },
}
