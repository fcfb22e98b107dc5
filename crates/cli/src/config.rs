//! Configuration management for the CLI
//!
//! Values come from an optional config file, then `EC2_RESERVED_*`
//! environment variables. Command-line flags override both.

use anyhow::{Context, Result};
use reservation_lib::calendar::GOOGLE_CALENDAR_API_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "EC2_RESERVED";

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Display name of the calendar receiving expiration events
    #[serde(default = "default_calendar_name")]
    pub calendar_name: String,

    /// OAuth access token for the Calendar API
    #[serde(default)]
    pub google_access_token: Option<String>,

    /// Calendar API base URL
    #[serde(default = "default_google_api_url")]
    pub google_api_url: String,

    /// AWS CLI executable
    #[serde(default = "default_aws_program")]
    pub aws_program: String,

    #[serde(default)]
    pub aws_region: Option<String>,

    #[serde(default)]
    pub aws_profile: Option<String>,
}

fn default_calendar_name() -> String {
    "aws".to_string()
}

fn default_google_api_url() -> String {
    GOOGLE_CALENDAR_API_URL.to_string()
}

fn default_aws_program() -> String {
    "aws".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            calendar_name: default_calendar_name(),
            google_access_token: None,
            google_api_url: default_google_api_url(),
            aws_program: default_aws_program(),
            aws_region: None,
            aws_profile: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from `path` (required if given) or the default
    /// location (optional), then the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(Some((path.to_path_buf(), true)), ENV_PREFIX),
            None => {
                let default = Self::config_path().ok().map(|p| (p, false));
                Self::load_from(default, ENV_PREFIX)
            }
        }
    }

    fn load_from(file: Option<(PathBuf, bool)>, env_prefix: &str) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some((path, required)) = file {
            builder = builder.add_source(config::File::from(path.as_path()).required(required));
        }

        builder
            .add_source(config::Environment::with_prefix(env_prefix))
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    /// Get the configuration file path
    fn config_path() -> Result<PathBuf> {
        let home = dirs_next::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("ec2-reserved").join("config.toml"))
    }
}
