//! Ideal-customer-profile definitions, loaded from YAML files.
//!
//! An ICP file describes the product being sold and who to look for; the
//! query generator turns these fields into search queries and every stored
//! lead is tagged with the profile's identifier.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IcpProfile {
    /// Identifier stored on every lead produced under this profile.
    pub identifier: String,
    pub product: ProductDetails,
    pub targeting: IcpTargeting,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetails {
    pub product_name: String,
    pub product_category: String,
    #[serde(default)]
    pub usps: Vec<String>,
    #[serde(default)]
    pub pain_points_solved: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IcpTargeting {
    #[serde(default)]
    pub target_industries: Vec<String>,
    pub company_size: Option<String>,
    #[serde(default)]
    pub decision_maker_personas: Vec<String>,
    #[serde(default)]
    pub regions: Vec<String>,
    pub budget_range: Option<String>,
    #[serde(default)]
    pub specific_occasions: Vec<String>,
}

/// Load an ICP profile from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError::IcpRead` if the file cannot be read and
/// `ConfigError::IcpParse` if it is not valid profile YAML.
pub fn load_icp_profile(path: &Path) -> Result<IcpProfile, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::IcpRead {
        path: path.display().to_string(),
        source,
    })?;
    serde_yaml::from_str(&raw).map_err(|source| ConfigError::IcpParse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r"
identifier: corporate-gifting-q3
product:
  product_name: Custom Gift Hampers
  product_category: Corporate Gifting
  usps:
    - Hand-assembled
    - Same-week delivery
  pain_points_solved:
    - Bulk ordering friction
targeting:
  target_industries:
    - Travel
    - Hospitality
  company_size: 50-500
  decision_maker_personas:
    - HR Manager
  regions:
    - US
  budget_range: $5k-$50k
  specific_occasions:
    - Diwali
";

    #[test]
    fn parses_full_profile() {
        let profile: IcpProfile = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(profile.identifier, "corporate-gifting-q3");
        assert_eq!(profile.product.product_name, "Custom Gift Hampers");
        assert_eq!(profile.product.usps.len(), 2);
        assert_eq!(profile.targeting.target_industries, ["Travel", "Hospitality"]);
        assert_eq!(profile.targeting.company_size.as_deref(), Some("50-500"));
    }

    #[test]
    fn optional_targeting_sections_default_to_empty() {
        let minimal = r"
identifier: minimal
product:
  product_name: Widgets
  product_category: Hardware
targeting: {}
";
        let profile: IcpProfile = serde_yaml::from_str(minimal).unwrap();
        assert!(profile.product.usps.is_empty());
        assert!(profile.targeting.target_industries.is_empty());
        assert!(profile.targeting.company_size.is_none());
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let result = load_icp_profile(Path::new("/nonexistent/icp.yaml"));
        assert!(matches!(result, Err(ConfigError::IcpRead { .. })));
    }
}
