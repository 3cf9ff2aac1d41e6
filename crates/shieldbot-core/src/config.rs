// ── Runtime relay configuration ──
//
// Everything the relay needs, resolved once at startup. Carries secret
// material but never touches disk; `shieldbot-config` builds it and the
// binary hands it in.

use std::collections::BTreeSet;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use shieldbot_api::Credentials;

use crate::model::Identity;

pub const DEFAULT_ANALYTICS_WINDOW_HOURS: u32 = 24;

/// Immutable configuration shared by every component.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Telegram Bot API token.
    pub bot_token: SecretString,
    /// Bot API root (e.g., `https://api.telegram.org/`).
    pub telegram_url: Url,
    /// How long one `getUpdates` long-poll may wait.
    pub poll_timeout: Duration,
    /// Cloudflare zone identifier.
    pub zone_id: String,
    /// Cloudflare credentials.
    pub credentials: Credentials,
    /// Cloudflare v4 root (e.g., `https://api.cloudflare.com/client/v4/`).
    pub cloudflare_url: Url,
    /// GraphQL endpoint override; derived from `cloudflare_url` when unset.
    pub graphql_url: Option<Url>,
    /// Operators allowed to use the bot.
    pub allowed_users: BTreeSet<Identity>,
    /// Per-request timeout for outbound calls.
    pub timeout: Duration,
    /// Trailing window for request analytics.
    pub analytics_window_hours: u32,
}
