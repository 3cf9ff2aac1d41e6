// Telegram Bot API client modules
//
// Just enough of the Bot API for a button-driven bot: long-poll updates,
// send and edit HTML messages with keyboards, answer callback queries.

pub mod client;
pub mod models;

pub use client::{DEFAULT_API_URL, TelegramClient};
