// ── Chat transport seam ──
//
// Outbound half of the chat interface. The binary implements it over the
// Telegram Bot API; tests record calls in memory.

use async_trait::async_trait;

use crate::error::{CoreError, EditError};
use crate::model::ChatId;
use crate::render::Keyboard;

/// A message the bot previously sent, as seen when a callback arrives on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef {
    pub chat: ChatId,
    pub message_id: i64,
    /// The keyboard currently attached, if the transport reported one.
    pub keyboard: Option<Keyboard>,
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), CoreError>;

    /// Replace a message's text and keyboard.
    ///
    /// Must return [`EditError::NotModified`] when the platform reports the
    /// content is identical to what is displayed.
    async fn edit_message(
        &self,
        message: &MessageRef,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), EditError>;

    /// Answer a callback. `prominent` asks for a modal alert rather than a toast.
    async fn acknowledge(
        &self,
        callback_id: &str,
        alert: Option<&str>,
        prominent: bool,
    ) -> Result<(), CoreError>;
}
