pub mod app_config;
pub mod config;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};

use thiserror::Error;

/// Errors raised while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable was absent from the environment.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// A variable was set but its value could not be used.
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
