use thiserror::Error;

use crate::cloudflare::models::ApiMessage;

/// Top-level error type for the `shieldbot-api` crate.
///
/// Covers every failure mode across both API surfaces: transport,
/// the Cloudflare v4 REST envelope, Cloudflare GraphQL analytics, and the
/// Telegram Bot API. `shieldbot-core` classifies these into operator-facing
/// failures.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Failed to construct the underlying HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Cloudflare REST ─────────────────────────────────────────────
    /// Any response status other than 200.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The v4 envelope reported `success: false` or carried an `errors` list.
    #[error("Cloudflare API error: {}", format_messages(.errors))]
    Api { errors: Vec<ApiMessage> },

    // ── Cloudflare GraphQL ──────────────────────────────────────────
    /// The analytics endpoint answered with a GraphQL `errors` array.
    #[error("GraphQL error: {message}")]
    GraphQl { message: String },

    // ── Telegram ────────────────────────────────────────────────────
    /// The Bot API answered with `ok: false`.
    #[error("Telegram error ({code}): {description}")]
    Telegram { code: u16, description: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the request never completed because of the
    /// client-side timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Returns `true` if Telegram rejected an edit because the new content
    /// is identical to what is already displayed.
    pub fn is_message_not_modified(&self) -> bool {
        matches!(
            self,
            Self::Telegram { description, .. } if description.contains("message is not modified")
        )
    }
}

fn format_messages(errors: &[ApiMessage]) -> String {
    if errors.is_empty() {
        return "unknown error".into();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
