//! CLI error types with miette diagnostics.
//!
//! Maps config, core and gateway failures into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use shieldbot_config::ConfigError;
use shieldbot_core::{CoreError, Failure};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach {service}")]
    #[diagnostic(
        code(shieldbot::connection_failed),
        help("Check network access to {service} and the configured API URL.")
    )]
    ConnectionFailed { service: String, reason: String },

    #[error("Request to {service} timed out")]
    #[diagnostic(
        code(shieldbot::timeout),
        help("Raise defaults.timeout in the config file or check connectivity.")
    )]
    Timeout { service: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("{service} rejected the credentials ({reason})")]
    #[diagnostic(
        code(shieldbot::auth_failed),
        help(
            "Verify the credentials and their scopes.\n\
             A Cloudflare API token needs Zone Settings, Bot Management and Analytics access."
        )
    )]
    AuthFailed { service: String, reason: String },

    #[error("No {secret} configured")]
    #[diagnostic(
        code(shieldbot::no_credentials),
        help(
            "Set it in the config file, store it in the system keyring under service 'shieldbot',\n\
             or name an environment variable with the matching *_env key."
        )
    )]
    NoCredentials { secret: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("{service} API error: {message}")]
    #[diagnostic(code(shieldbot::api_error))]
    ApiError { service: String, message: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(shieldbot::validation), help("Expected config file at: {path}"))]
    Validation {
        field: String,
        reason: String,
        path: String,
    },

    #[error(transparent)]
    #[diagnostic(code(shieldbot::config))]
    Config(Box<figment::Error>),

    #[error("Failed to render config: {0}")]
    #[diagnostic(code(shieldbot::serialize))]
    Serialization(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the config path to a `ConfigError`.
    pub fn from_config(err: ConfigError, path: &std::path::Path) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation {
                field,
                reason,
                path: path.display().to_string(),
            },
            ConfigError::NoCredentials { secret } => Self::NoCredentials { secret },
            ConfigError::Figment(e) => Self::Config(e),
            ConfigError::Serialization(e) => Self::Serialization(e),
        }
    }

    /// Classify a failed Cloudflare operation.
    pub fn from_failure(failure: Failure) -> Self {
        let service = "Cloudflare".to_string();
        match failure {
            Failure::HttpStatus(status @ (401 | 403)) => Self::AuthFailed {
                service,
                reason: format!("HTTP {status}"),
            },
            Failure::ConnectionError(detail) if detail == "timeout" => Self::Timeout { service },
            Failure::ConnectionError(reason) => Self::ConnectionFailed { service, reason },
            other => Self::ApiError {
                service,
                message: other.to_string(),
            },
        }
    }
}

// ── Library errors → CliError ────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
                path: shieldbot_config::config_path().display().to_string(),
            },
            CoreError::Transport { message } => Self::ConnectionFailed {
                service: "Telegram".into(),
                reason: message,
            },
        }
    }
}

impl From<shieldbot_api::Error> for CliError {
    fn from(err: shieldbot_api::Error) -> Self {
        match err {
            shieldbot_api::Error::Telegram {
                code: code @ (401 | 404),
                description,
            } => Self::AuthFailed {
                service: "Telegram".into(),
                reason: format!("{code} {description}"),
            },
            shieldbot_api::Error::Telegram { code, description } => Self::ApiError {
                service: "Telegram".into(),
                message: format!("{code} {description}"),
            },
            other if other.is_timeout() => Self::Timeout {
                service: "Telegram".into(),
            },
            other => CoreError::from(other).into(),
        }
    }
}
