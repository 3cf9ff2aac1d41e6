// ── Core error types ──
//
// Errors that escape a single interaction's happy path. Remote-call
// failures are NOT here: the gateway turns those into `Failure` values.
// What remains is chat-transport trouble and setup problems.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Chat transport error: {message}")]
    Transport { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl From<shieldbot_api::Error> for CoreError {
    fn from(err: shieldbot_api::Error) -> Self {
        match err {
            shieldbot_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            shieldbot_api::Error::ClientBuild(message) => CoreError::Config { message },
            other => CoreError::Transport {
                message: other.to_string(),
            },
        }
    }
}

/// Why an edit did not happen.
#[derive(Debug, Error)]
pub enum EditError {
    /// The new content equals what is displayed. Not a failure.
    #[error("message is not modified")]
    NotModified,

    #[error(transparent)]
    Failed(#[from] CoreError),
}
