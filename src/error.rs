// Error types for the blog client.
//
// `ApiError` only ever aborts the current action: the loop prints it and
// prompts again. `CliError` ends the process with a non-zero exit code.

use std::io;

use thiserror::Error;

/// Failure of a single request/response cycle.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body could not be serialized.
    #[error("Error marshaling JSON: {0}")]
    Encode(#[source] serde_json::Error),
    /// The request never produced a response (connection refused, DNS,
    /// timeout, malformed header).
    #[error("Error making {method} request: {source}")]
    Transport {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with something other than the expected status.
    #[error("{failure}. Status code: {code}")]
    Status { failure: &'static str, code: u16 },
    /// The response body could not be read to the end.
    #[error("Error reading response body: {0}")]
    ReadBody(#[source] reqwest::Error),
    /// The response body was not the JSON shape we expected.
    #[error("Error parsing JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    /// Status code carried by a `Status` failure.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Errors that stop the client loop.
#[derive(Debug, Error)]
pub enum CliError {
    /// `post` or `get_posts` was chosen without a token.
    #[error("You must be logged in to perform this action")]
    NotLoggedIn,
    /// Reading from the terminal failed or was interrupted.
    #[error("Prompt failed {0}")]
    Prompt(#[source] io::Error),
    /// Writing results to the output stream failed.
    #[error("Failed to write output: {0}")]
    Output(#[source] io::Error),
}

impl CliError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Errors raised while validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid base URL `{value}`: {reason}")]
    InvalidUrl { value: String, reason: String },
    #[error("Unsupported URL scheme `{scheme}` in `{value}` (expected http or https)")]
    UnsupportedScheme { value: String, scheme: String },
}
