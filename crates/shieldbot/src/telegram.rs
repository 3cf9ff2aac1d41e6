//! Telegram side of the relay: the `ChatTransport` implementation and the
//! mapping from Bot API updates to core interactions.

use async_trait::async_trait;
use tracing::debug;

use shieldbot_api::TelegramClient;
use shieldbot_api::telegram::models::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, Message, ReplyKeyboardMarkup,
    ReplyMarkup, Update,
};
use shieldbot_core::{
    Button, ChatId, ChatTransport, CoreError, EditError, Identity, Interaction, Keyboard,
    MessageRef, Origin,
};

pub struct TelegramTransport {
    client: TelegramClient,
}

impl TelegramTransport {
    pub fn new(client: TelegramClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), CoreError> {
        let markup = keyboard.map(to_markup);
        self.client
            .send_message(chat.0, text, markup.as_ref())
            .await?;
        Ok(())
    }

    async fn edit_message(
        &self,
        message: &MessageRef,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), EditError> {
        let markup = keyboard.map(to_markup);
        match self
            .client
            .edit_message_text(message.chat.0, message.message_id, text, markup.as_ref())
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if e.is_message_not_modified() => Err(EditError::NotModified),
            Err(e) => Err(EditError::Failed(e.into())),
        }
    }

    async fn acknowledge(
        &self,
        callback_id: &str,
        alert: Option<&str>,
        prominent: bool,
    ) -> Result<(), CoreError> {
        self.client
            .answer_callback_query(callback_id, alert, prominent)
            .await?;
        Ok(())
    }
}

// ── Keyboard conversion ─────────────────────────────────────────────

fn to_markup(keyboard: &Keyboard) -> ReplyMarkup {
    match keyboard {
        Keyboard::Inline(rows) => ReplyMarkup::Inline(InlineKeyboardMarkup {
            inline_keyboard: rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|b| InlineKeyboardButton {
                            text: b.label.clone(),
                            callback_data: Some(b.token.clone()),
                        })
                        .collect()
                })
                .collect(),
        }),
        Keyboard::Reply(rows) => ReplyMarkup::Keyboard(ReplyKeyboardMarkup {
            keyboard: rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|label| KeyboardButton {
                            text: label.clone(),
                        })
                        .collect()
                })
                .collect(),
            resize_keyboard: true,
        }),
    }
}

/// Inline keyboard currently attached to a message. Buttons without
/// callback data (URL buttons) cannot be round-tripped and are dropped.
fn from_markup(markup: &InlineKeyboardMarkup) -> Keyboard {
    Keyboard::Inline(
        markup
            .inline_keyboard
            .iter()
            .map(|row| {
                row.iter()
                    .filter_map(|b| {
                        b.callback_data
                            .as_ref()
                            .map(|token| Button::new(b.text.clone(), token.clone()))
                    })
                    .collect::<Vec<_>>()
            })
            .filter(|row| !row.is_empty())
            .collect(),
    )
}

fn message_ref(message: &Message) -> MessageRef {
    MessageRef {
        chat: ChatId(message.chat.id),
        message_id: message.message_id,
        keyboard: message.reply_markup.as_ref().map(from_markup),
    }
}

// ── Update mapping ──────────────────────────────────────────────────

/// Convert one update into an interaction. Updates with no sender or no
/// text/data carry nothing to route and yield `None`.
pub fn interaction_from_update(update: Update) -> Option<Interaction> {
    if let Some(query) = update.callback_query {
        let Some(token) = query.data else {
            debug!(update_id = update.update_id, "callback without data");
            return None;
        };
        return Some(Interaction {
            identity: Identity(query.from.id),
            token,
            origin: Origin::Callback {
                callback_id: query.id,
                message: query.message.as_ref().map(message_ref),
            },
        });
    }

    let message = update.message?;
    let (Some(from), Some(text)) = (message.from, message.text) else {
        debug!(update_id = update.update_id, "message without sender or text");
        return None;
    };
    Some(Interaction {
        identity: Identity(from.id),
        token: text,
        origin: Origin::Message {
            chat: ChatId(message.chat.id),
        },
    })
}
