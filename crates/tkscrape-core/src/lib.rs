pub mod app_config;
pub mod config;
pub mod identifier;
pub mod record;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use identifier::{
    extract_username, normalize_username, parse_input_lines, IdentifierKind, ProfileQuery,
};
pub use record::{ProfileRecord, ScrapeStatus, CSV_COLUMNS, SCRAPE_TIME_FORMAT};

use thiserror::Error;

/// Errors raised while assembling [`AppConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
