//! `shieldbot run`: the long-poll loop.
//!
//! Each update is handled on its own task so one slow Cloudflare call
//! never holds up other operators. The offset only moves forward.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use shieldbot_api::{TelegramClient, TransportConfig};
use shieldbot_core::{Relay, RelayConfig, build_cloudflare_client};

use crate::error::CliError;
use crate::telegram::{TelegramTransport, interaction_from_update};

/// Pause after a failed `getUpdates` before polling again.
const RETRY_DELAY: Duration = Duration::from_secs(5);

pub async fn handle(config: RelayConfig) -> Result<(), CliError> {
    let transport = TransportConfig::new(config.timeout);
    let bot = TelegramClient::new(config.telegram_url.clone(), config.bot_token.clone(), &transport)?;
    let api = build_cloudflare_client(&config)?;
    let relay = Arc::new(Relay::new(&config, api, TelegramTransport::new(bot.clone())));

    info!(
        zone = %config.zone_id,
        operators = config.allowed_users.len(),
        "shieldbot started; polling for updates"
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut offset: i64 = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("interrupt received; shutting down");
                return Ok(());
            }
            polled = bot.get_updates(offset, config.poll_timeout) => match polled {
                Ok(updates) => {
                    debug!(count = updates.len(), offset, "received updates");
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        let Some(interaction) = interaction_from_update(update) else {
                            continue;
                        };
                        let relay = Arc::clone(&relay);
                        tokio::spawn(async move {
                            relay.handle_interaction(interaction).await;
                        });
                    }
                }
                Err(e) if fatal(&e) => return Err(e.into()),
                Err(e) => {
                    warn!(error = %e, "getUpdates failed; retrying in {}s", RETRY_DELAY.as_secs());
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }
    }
}

/// A bad token never recovers by retrying.
fn fatal(err: &shieldbot_api::Error) -> bool {
    matches!(err, shieldbot_api::Error::Telegram { code: 401 | 404, .. })
}
