// Cloudflare zone settings endpoints
//
// Security level, Bot Fight Mode and Browser Integrity Check. Each pair of
// read/write methods returns the setting as the API reports it after the
// call.

use serde_json::json;
use tracing::debug;

use crate::cloudflare::client::CloudflareClient;
use crate::cloudflare::models::{BotManagement, ZoneSetting};
use crate::error::Error;

impl CloudflareClient {
    /// Get the zone security level.
    ///
    /// `GET /zones/{zone}/settings/security_level`
    pub async fn get_security_level(&self) -> Result<ZoneSetting, Error> {
        let url = self.zone_url("settings/security_level")?;
        debug!("fetching security level");
        self.get(url).await
    }

    /// Set the zone security level (`essentially_off`, `low`, `medium`,
    /// `high`, `under_attack`).
    ///
    /// `PATCH /zones/{zone}/settings/security_level` with `{"value": level}`
    pub async fn set_security_level(&self, level: &str) -> Result<ZoneSetting, Error> {
        let url = self.zone_url("settings/security_level")?;
        debug!(level, "setting security level");
        self.patch(url, &json!({ "value": level })).await
    }

    /// Get the bot management configuration, including Bot Fight Mode.
    ///
    /// `GET /zones/{zone}/bot_management`
    pub async fn get_bot_management(&self) -> Result<BotManagement, Error> {
        let url = self.zone_url("bot_management")?;
        debug!("fetching bot management");
        self.get(url).await
    }

    /// Switch the free-plan Bot Fight Mode on or off.
    ///
    /// `PUT /zones/{zone}/bot_management` with `{"fight_mode": enabled}`
    ///
    /// Bot Fight Mode can challenge legitimate API and mobile-app traffic;
    /// it cannot be bypassed with WAF skip rules.
    pub async fn set_bot_fight_mode(&self, enabled: bool) -> Result<BotManagement, Error> {
        let url = self.zone_url("bot_management")?;
        debug!(enabled, "setting bot fight mode");
        self.put(url, &json!({ "fight_mode": enabled })).await
    }

    /// Get the Browser Integrity Check setting (`"on"` / `"off"`).
    ///
    /// `GET /zones/{zone}/settings/browser_check`
    pub async fn get_browser_check(&self) -> Result<ZoneSetting, Error> {
        let url = self.zone_url("settings/browser_check")?;
        debug!("fetching browser integrity check");
        self.get(url).await
    }

    /// Set the Browser Integrity Check setting.
    ///
    /// `PATCH /zones/{zone}/settings/browser_check` with `{"value": value}`
    pub async fn set_browser_check(&self, value: &str) -> Result<ZoneSetting, Error> {
        let url = self.zone_url("settings/browser_check")?;
        debug!(value, "setting browser integrity check");
        self.patch(url, &json!({ "value": value })).await
    }
}
