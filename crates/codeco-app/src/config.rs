//! Configuration management for codeco-gate
//!
//! Config stored at: ~/.config/codeco-gate/config.json

use codeco_domain::service::{
    EncoderSettings, LocationTable, SegmentPolicy, DEFAULT_LOCATION_CODE, DEFAULT_LOCATION_DETAIL,
};
use codeco_infra::{PartnerProfile, RetryPolicy};
use codeco_types::{ConfigError, GateEventRecord, OutputFormat, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "codeco-gate";

/// Delivery settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Pickup directory messages are delivered into
    #[serde(default)]
    pub remote_dir: Option<PathBuf>,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial delay between attempts; doubles after each failure
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            remote_dir: None,
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl TransferConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_delay_ms)
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Sender code applied when a record leaves it blank
    #[serde(default)]
    pub sender_code: Option<String>,

    /// Receiver code applied when a record leaves it blank
    #[serde(default)]
    pub receiver_code: Option<String>,

    /// Depot company code applied when a record leaves it blank
    #[serde(default)]
    pub company_code: Option<String>,

    /// Output directory override for generated files
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,

    #[serde(default = "default_location_code")]
    pub default_location_code: String,

    #[serde(default = "default_location_detail")]
    pub default_location_detail: String,

    /// Partner profile TOML
    #[serde(default)]
    pub profile_path: Option<PathBuf>,

    #[serde(default)]
    pub transfer: TransferConfig,

    #[serde(default)]
    pub policy: SegmentPolicy,
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_location_code() -> String {
    DEFAULT_LOCATION_CODE.to_string()
}

fn default_location_detail() -> String {
    DEFAULT_LOCATION_DETAIL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sender_code: None,
            receiver_code: None,
            company_code: None,
            output_dir: None,
            output_format: default_output_format(),
            default_location_code: default_location_code(),
            default_location_detail: default_location_detail(),
            profile_path: None,
            transfer: TransferConfig::default(),
            policy: SegmentPolicy::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join(APP_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Directory for the transmission log
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join(APP_DIR);
        Ok(data_dir)
    }

    /// Get the output directory path
    pub fn output_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.output_dir {
            return Ok(dir.clone());
        }
        Ok(Self::data_dir()?.join("outbox"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from an explicit path, or default when absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Set one value by key, as typed on the command line
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let optional = |v: &str| {
            let v = v.trim();
            (!v.is_empty()).then(|| v.to_string())
        };
        let parse_err = |what: &str| {
            ConfigError::ParseError(format!("Invalid value for {}: {}", what, value))
        };

        match key {
            "sender_code" => self.sender_code = optional(value),
            "receiver_code" => self.receiver_code = optional(value),
            "company_code" => self.company_code = optional(value),
            "output_dir" => self.output_dir = optional(value).map(PathBuf::from),
            "output_format" => {
                self.output_format = match value {
                    "table" => OutputFormat::Table,
                    "json" => OutputFormat::Json,
                    _ => return Err(parse_err(key).into()),
                }
            }
            "default_location_code" => {
                self.default_location_code = optional(value).ok_or_else(|| parse_err(key))?
            }
            "default_location_detail" => {
                self.default_location_detail = optional(value).ok_or_else(|| parse_err(key))?
            }
            "profile_path" => self.profile_path = optional(value).map(PathBuf::from),
            "remote_dir" => self.transfer.remote_dir = optional(value).map(PathBuf::from),
            "max_retries" => {
                self.transfer.max_retries = value.parse().map_err(|_| parse_err(key))?
            }
            "retry_delay_ms" => {
                self.transfer.retry_delay_ms = value.parse().map_err(|_| parse_err(key))?
            }
            "carrier_party" => {
                self.policy.carrier_party = value.parse().map_err(|_| parse_err(key))?
            }
            "equipment_reference_qualifier" => {
                self.policy.equipment_reference_qualifier =
                    serde_json::from_value(serde_json::Value::String(value.to_uppercase()))
                        .map_err(|_| parse_err(key))?
            }
            "equipment_status" => {
                self.policy.equipment_status =
                    serde_json::from_value(serde_json::Value::String(value.to_lowercase()))
                        .map_err(|_| parse_err(key))?
            }
            "equipment_reference_customers" => {
                self.policy.equipment_reference_customers = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            _ => {
                return Err(ConfigError::ParseError(format!("Unknown config key: {}", key)).into())
            }
        }
        Ok(())
    }

    /// Encoder settings from this config, with the partner profile applied
    /// on top when one is given
    pub fn encoder_settings(&self, profile: Option<&PartnerProfile>) -> EncoderSettings {
        let base = EncoderSettings {
            policy: self.policy.clone(),
            locations: LocationTable::new(
                LocationTable::standard().rules().to_vec(),
                &self.default_location_detail,
            ),
            default_location_code: self.default_location_code.clone(),
        };
        match profile {
            Some(profile) => profile.encoder_settings(base),
            None => base,
        }
    }

    /// Partner profile from an explicit path or the configured one
    pub fn partner_profile(&self, explicit: Option<&Path>) -> Result<Option<PartnerProfile>> {
        match explicit.or(self.profile_path.as_deref()) {
            Some(path) => Ok(Some(PartnerProfile::load_from_file(path)?)),
            None => Ok(None),
        }
    }

    /// Fill blank header codes from the configured defaults
    pub fn apply_defaults(&self, record: &mut GateEventRecord) {
        fill(&mut record.sender, self.sender_code.as_deref());
        fill(&mut record.receiver, self.receiver_code.as_deref());
        fill(&mut record.company_code, self.company_code.as_deref());
    }
}

fn fill(field: &mut String, default: Option<&str>) {
    if field.trim().is_empty() {
        if let Some(value) = default {
            *field = value.to_string();
        }
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let unset = "(unset)";
        writeln!(f, "CODECO Gate Configuration")?;
        writeln!(f, "=========================")?;
        writeln!(f)?;
        writeln!(f, "Sender code:       {}", self.sender_code.as_deref().unwrap_or(unset))?;
        writeln!(f, "Receiver code:     {}", self.receiver_code.as_deref().unwrap_or(unset))?;
        writeln!(f, "Company code:      {}", self.company_code.as_deref().unwrap_or(unset))?;
        writeln!(
            f,
            "Output dir:        {}",
            self.output_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Output format:     {}", self.output_format)?;
        writeln!(f, "Location code:     {}", self.default_location_code)?;
        writeln!(f, "Location detail:   {}", self.default_location_detail)?;
        writeln!(
            f,
            "Partner profile:   {}",
            self.profile_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(built-in rules)".to_string())
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "Remote dir:        {}",
            self.transfer
                .remote_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| unset.to_string())
        )?;
        writeln!(f, "Max retries:       {}", self.transfer.max_retries)?;
        writeln!(f, "Retry delay (ms):  {}", self.transfer.retry_delay_ms)?;
        writeln!(f)?;
        writeln!(f, "Carrier NAD:       {}", self.policy.carrier_party)?;
        writeln!(
            f,
            "Equipment RFF:     {} for [{}]",
            self.policy.equipment_reference_qualifier.code(),
            self.policy.equipment_reference_customers.join(", ")
        )?;
        writeln!(f, "Equipment status:  {:?}", self.policy.equipment_status)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:       {}", path.display())?;
        }

        Ok(())
    }
}
