//! Customer-driven LOC detail lookup

use serde::{Deserialize, Serialize};

/// Depot UN/LOCODE used when a record carries no usable location code
pub const DEFAULT_LOCATION_CODE: &str = "CIABJ";
/// Storage area detail for PIL containers
pub const PIL_LOCATION_DETAIL: &str = "CIABJ31:STO:ZZZ";
/// Storage area detail for ONE containers
pub const ONEY_LOCATION_DETAIL: &str = "CIABJ32:STO:ZZZ";
/// Detail used when neither a rule nor the caller supplies one
pub const DEFAULT_LOCATION_DETAIL: &str = "CIABJ32:STO:ZZZ";

/// Customer-name substring mapped to a LOC detail composite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRule {
    pub pattern: String,
    pub detail: String,
}

impl LocationRule {
    pub fn new(pattern: &str, detail: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            detail: detail.to_string(),
        }
    }

    /// Case-insensitive substring match against the customer name
    pub fn matches(&self, customer: &str) -> bool {
        !self.pattern.is_empty() && customer.to_uppercase().contains(&self.pattern.to_uppercase())
    }
}

/// Ordered rule table; the first matching rule wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationTable {
    rules: Vec<LocationRule>,
    default_detail: String,
}

impl LocationTable {
    pub fn new(rules: Vec<LocationRule>, default_detail: &str) -> Self {
        Self {
            rules,
            default_detail: default_detail.to_string(),
        }
    }

    /// PIL and ONEY rules with the depot default
    pub fn standard() -> Self {
        Self::new(
            vec![
                LocationRule::new("PIL", PIL_LOCATION_DETAIL),
                LocationRule::new("ONEY", ONEY_LOCATION_DETAIL),
            ],
            DEFAULT_LOCATION_DETAIL,
        )
    }

    pub fn rules(&self) -> &[LocationRule] {
        &self.rules
    }

    pub fn default_detail(&self) -> &str {
        &self.default_detail
    }

    /// Detail for `customer`: matching rule, else `supplied`, else table default
    pub fn resolve<'a>(&'a self, customer: &str, supplied: Option<&'a str>) -> &'a str {
        if let Some(rule) = self.rules.iter().find(|r| r.matches(customer)) {
            return &rule.detail;
        }
        supplied
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.default_detail)
    }
}

impl Default for LocationTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Location code, replaced by `fallback` when blank or shaped like a UUID
pub fn location_code_or<'a>(code: &'a str, fallback: &'a str) -> &'a str {
    let code = code.trim();
    if code.is_empty() || (code.contains('-') && code.len() > 20) {
        fallback
    } else {
        code
    }
}
