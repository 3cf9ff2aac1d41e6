// ── Remote security API seam ──
//
// The gateway talks to this trait, not to HTTP. `CloudflareClient`
// implements it here, converting typed values to wire shapes; tests
// substitute an in-memory store.

use std::str::FromStr;

use async_trait::async_trait;
use shieldbot_api::cloudflare::models::{AnalyticsData, ZoneSetting};
use shieldbot_api::{CloudflareClient, Error, TransportConfig};

use crate::config::RelayConfig;
use crate::error::CoreError;
use crate::model::{
    AnalyticsWindow, HourlyBucket, SecurityLevel, SettingName, SettingValue, Toggle, ZoneTraffic,
};

#[async_trait]
pub trait SecurityApi: Send + Sync {
    /// Read the current value of one setting.
    async fn read_setting(&self, name: SettingName) -> Result<SettingValue, Error>;

    /// Write a setting and return the value the API reports back.
    async fn write_setting(&self, value: SettingValue) -> Result<SettingValue, Error>;

    /// Hourly request buckets per matching zone, newest first.
    async fn hourly_requests(&self, window: &AnalyticsWindow) -> Result<Vec<ZoneTraffic>, Error>;
}

/// Build the Cloudflare client described by `config`.
pub fn build_cloudflare_client(config: &RelayConfig) -> Result<CloudflareClient, CoreError> {
    let transport = TransportConfig::new(config.timeout);
    let client = CloudflareClient::new(
        config.cloudflare_url.clone(),
        config.zone_id.clone(),
        &config.credentials,
        &transport,
    )?;
    Ok(match &config.graphql_url {
        Some(url) => client.with_graphql_url(url.clone()),
        None => client,
    })
}

#[async_trait]
impl SecurityApi for CloudflareClient {
    async fn read_setting(&self, name: SettingName) -> Result<SettingValue, Error> {
        match name {
            SettingName::SecurityLevel => {
                let setting = self.get_security_level().await?;
                parse_level(&setting).map(SettingValue::SecurityLevel)
            }
            SettingName::BotFightMode => {
                let bm = self.get_bot_management().await?;
                Ok(SettingValue::BotFightMode(Toggle::from(bm.fight_mode)))
            }
            SettingName::BrowserCheck => {
                let setting = self.get_browser_check().await?;
                parse_toggle(&setting).map(SettingValue::BrowserCheck)
            }
        }
    }

    async fn write_setting(&self, value: SettingValue) -> Result<SettingValue, Error> {
        match value {
            SettingValue::SecurityLevel(level) => {
                let setting = self.set_security_level(level.as_str()).await?;
                parse_level(&setting).map(SettingValue::SecurityLevel)
            }
            SettingValue::BotFightMode(toggle) => {
                let bm = self.set_bot_fight_mode(toggle.is_on()).await?;
                Ok(SettingValue::BotFightMode(Toggle::from(bm.fight_mode)))
            }
            SettingValue::BrowserCheck(toggle) => {
                let setting = self.set_browser_check(toggle.as_str()).await?;
                parse_toggle(&setting).map(SettingValue::BrowserCheck)
            }
        }
    }

    async fn hourly_requests(&self, window: &AnalyticsWindow) -> Result<Vec<ZoneTraffic>, Error> {
        let data = self
            .http_requests_1h(window.since, window.until, window.hours)
            .await?;
        Ok(zone_traffic(data))
    }
}

fn zone_traffic(data: AnalyticsData) -> Vec<ZoneTraffic> {
    data.viewer
        .zones
        .into_iter()
        .map(|zone| ZoneTraffic {
            buckets: zone
                .http_requests_1h_groups
                .into_iter()
                .map(|group| HourlyBucket {
                    requests: group.sum.requests,
                    threats: group.sum.threats,
                    cached_requests: group.sum.cached_requests,
                })
                .collect(),
        })
        .collect()
}

fn parse_level(setting: &ZoneSetting) -> Result<SecurityLevel, Error> {
    let raw = setting.value_str().unwrap_or_default();
    SecurityLevel::from_str(raw).map_err(|_| unexpected_value(setting))
}

fn parse_toggle(setting: &ZoneSetting) -> Result<Toggle, Error> {
    let raw = setting.value_str().unwrap_or_default();
    Toggle::from_str(raw).map_err(|_| unexpected_value(setting))
}

fn unexpected_value(setting: &ZoneSetting) -> Error {
    Error::Deserialization {
        message: format!("unexpected {} value {}", setting.id, setting.value),
        body: setting.value.to_string(),
    }
}
