pub mod app_config;
pub mod config;
pub mod dealers;
pub mod platform;
pub mod vehicle;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use dealers::{load_dealers, parse_dealers, DealerConfig, DealersFile, RunSettings};
pub use platform::Platform;
pub use vehicle::{CanonicalRecord, Drivetrain, Package, RawFieldSet, RawPackage, RawScalar};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read dealers file {path}: {source}")]
    DealersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dealers file: {0}")]
    DealersFileParse(#[source] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}
