// shieldbot-api: Async Rust clients for the Cloudflare and Telegram Bot APIs

pub mod auth;
pub mod cloudflare;
pub mod error;
pub mod telegram;
pub mod transport;

pub use auth::Credentials;
pub use cloudflare::CloudflareClient;
pub use error::Error;
pub use telegram::TelegramClient;
pub use transport::TransportConfig;
