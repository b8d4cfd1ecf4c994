// Command-line and environment configuration.

use clap::Parser;
use reqwest::Url;

use crate::api::DEFAULT_BASE_URL;
use crate::error::ConfigError;

/// Interactive terminal client for the blog service.
#[derive(Debug, Parser)]
#[command(name = "blogctl", version)]
pub struct Args {
    /// Base URL of the blog API.
    #[arg(long, env = "BLOG_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Type the action name instead of picking it from a menu.
    #[arg(long)]
    pub plain: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Validated settings the client runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub plain: bool,
}

impl Args {
    pub fn into_config(self) -> Result<ClientConfig, ConfigError> {
        Ok(ClientConfig {
            base_url: validate_base_url(&self.base_url)?,
            plain: self.plain,
        })
    }
}

/// Accept absolute http(s) URLs and return them without a trailing `/`.
pub fn validate_base_url(value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value).map_err(|err| ConfigError::InvalidUrl {
        value: value.to_string(),
        reason: err.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(value.trim_end_matches('/').to_string()),
        other => Err(ConfigError::UnsupportedScheme {
            value: value.to_string(),
            scheme: other.to_string(),
        }),
    }
}
