mod app_config;
mod config;
mod icp;
mod model;
mod resolve;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use icp::{load_icp_profile, IcpProfile, IcpTargeting, ProductDetails};
pub use model::{
    CanonicalLead, Classification, Contact, Content, LeadMetadata, Platform, Profile,
};
pub use resolve::{first_reliable, first_reliable_count, join_address, quality_score};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read ICP profile {path}: {source}")]
    IcpRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse ICP profile {path}: {source}")]
    IcpParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
