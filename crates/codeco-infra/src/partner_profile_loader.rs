//! Partner profile loader from TOML
//!
//! A profile pins the segment policy and location rules agreed with one EDI
//! partner:
//!
//! ```toml
//! name = "ONE Abidjan"
//! default_location_detail = "CIABJ32:STO:ZZZ"
//!
//! [policy]
//! equipment_reference_qualifier = "EQR"
//!
//! [[locations]]
//! pattern = "PIL"
//! detail = "CIABJ31:STO:ZZZ"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use codeco_domain::service::{EncoderSettings, LocationRule, LocationTable, SegmentPolicy};
use codeco_types::{ConfigError, Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartnerProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub default_location_code: Option<String>,
    #[serde(default)]
    pub default_location_detail: Option<String>,
    /// Overrides the configured policy when present
    #[serde(default)]
    pub policy: Option<SegmentPolicy>,
    /// Replaces the built-in PIL/ONEY rules when non-empty
    #[serde(default)]
    pub locations: Vec<LocationRule>,
}

impl PartnerProfile {
    /// Load a partner profile from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(ConfigError::ParseError(format!(
                "Failed to read partner profile {}: {}",
                path.display(),
                e
            )))
        })?;

        Self::load_from_str(&content)
    }

    /// Load a partner profile from a TOML string
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        toml::from_str(toml_content).map_err(|e| {
            Error::Config(ConfigError::ParseError(format!(
                "Failed to parse partner profile TOML: {}",
                e
            )))
        })
    }

    /// Apply this profile on top of `base`
    pub fn encoder_settings(&self, base: EncoderSettings) -> EncoderSettings {
        let default_detail = self
            .default_location_detail
            .as_deref()
            .unwrap_or(base.locations.default_detail())
            .to_string();
        let rules = if self.locations.is_empty() {
            base.locations.rules().to_vec()
        } else {
            self.locations.clone()
        };

        EncoderSettings {
            policy: self.policy.clone().unwrap_or(base.policy),
            locations: LocationTable::new(rules, &default_detail),
            default_location_code: self
                .default_location_code
                .clone()
                .unwrap_or(base.default_location_code),
        }
    }
}
