// ── Operation outcomes ──
//
// Every remote call ends as a `SettingOutcome` (or a `Result` carrying a
// `Failure` for analytics). Raw `shieldbot_api::Error`s never travel
// past the gateway.

use thiserror::Error;

use shieldbot_api::cloudflare::models::ApiMessage;

use super::setting::SettingValue;

/// Classified cause of a failed remote operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// Any status other than 200.
    #[error("HTTP {0}")]
    HttpStatus(u16),

    /// `success: false` or a non-empty `errors` list.
    #[error("{}", format_api_errors(.0))]
    ApiFailure(Vec<ApiMessage>),

    /// The request never completed. Timeouts carry the detail `"timeout"`.
    #[error("connection failed: {0}")]
    ConnectionError(String),

    /// The analytics query matched no zone.
    #[error("zone not found")]
    ZoneNotFound,

    /// The zone had no hourly buckets in the requested window.
    #[error("no data in window")]
    NoDataInWindow,

    /// The analytics endpoint returned a GraphQL error.
    #[error("GraphQL error: {0}")]
    GraphQlError(String),

    /// The response decoded but did not contain what we expected.
    #[error("unexpected response: {0}")]
    Malformed(String),
}

fn format_api_errors(errors: &[ApiMessage]) -> String {
    if errors.is_empty() {
        return "unknown API error".into();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<&shieldbot_api::Error> for Failure {
    fn from(err: &shieldbot_api::Error) -> Self {
        use shieldbot_api::Error as E;

        match err {
            E::HttpStatus { status, .. } => Self::HttpStatus(*status),
            E::Api { errors } => Self::ApiFailure(errors.clone()),
            E::GraphQl { message } => Self::GraphQlError(message.clone()),
            E::Transport(e) if e.is_timeout() => Self::ConnectionError("timeout".into()),
            E::Transport(e) => match e.status() {
                Some(status) => Self::HttpStatus(status.as_u16()),
                None => Self::ConnectionError(e.to_string()),
            },
            E::InvalidUrl(e) => Self::ConnectionError(format!("invalid URL: {e}")),
            E::ClientBuild(msg) => Self::ConnectionError(msg.clone()),
            E::Telegram { description, .. } => Self::ConnectionError(description.clone()),
            E::Deserialization { message, .. } => Self::Malformed(message.clone()),
        }
    }
}

impl From<shieldbot_api::Error> for Failure {
    fn from(err: shieldbot_api::Error) -> Self {
        Self::from(&err)
    }
}

/// Tagged result of one remote setting operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingOutcome {
    /// The call succeeded; for reads this is the current value.
    Applied(SettingValue),
    /// The remote state is known to equal what the operator already sees.
    Unchanged(SettingValue),
    Failed(Failure),
}

impl SettingOutcome {
    pub fn value(&self) -> Option<&SettingValue> {
        match self {
            Self::Applied(v) | Self::Unchanged(v) => Some(v),
            Self::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failed(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Re-tag a successful read as unchanged. Failures pass through.
    pub fn into_unchanged(self) -> Self {
        match self {
            Self::Applied(v) => Self::Unchanged(v),
            other => other,
        }
    }
}
