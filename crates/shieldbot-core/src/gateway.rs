// ── Settings gateway ──
//
// One logical remote operation per call, normalized into a tagged
// outcome. Nothing raised by the API layer gets past this module.

use chrono::Utc;
use tracing::{debug, error, warn};

use crate::api::SecurityApi;
use crate::model::{
    AnalyticsSummary, AnalyticsWindow, Failure, SettingName, SettingOutcome, SettingValue,
};

pub struct SettingsGateway<A> {
    api: A,
}

impl<A: SecurityApi> SettingsGateway<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Read one setting. A successful read is reported as `Applied`.
    pub async fn read_setting(&self, name: SettingName) -> SettingOutcome {
        match self.api.read_setting(name).await {
            Ok(value) => {
                debug!(setting = %name, %value, "read setting");
                SettingOutcome::Applied(value)
            }
            Err(err) => {
                error!(setting = %name, error = %err, "failed to read setting");
                SettingOutcome::Failed(Failure::from(&err))
            }
        }
    }

    /// Write one setting. On success the outcome carries the desired value.
    pub async fn write_setting(&self, desired: SettingValue) -> SettingOutcome {
        let name = desired.name();
        match self.api.write_setting(desired).await {
            Ok(reported) => {
                if reported != desired {
                    warn!(setting = %name, %desired, %reported, "API reported a different value after write");
                }
                debug!(setting = %name, value = %desired, "wrote setting");
                SettingOutcome::Applied(desired)
            }
            Err(err) => {
                error!(setting = %name, value = %desired, error = %err, "failed to write setting");
                SettingOutcome::Failed(Failure::from(&err))
            }
        }
    }

    /// Sum request analytics over the trailing `window_hours` hours.
    pub async fn read_analytics(&self, window_hours: u32) -> Result<AnalyticsSummary, Failure> {
        let window = AnalyticsWindow::trailing(window_hours, Utc::now());
        self.read_analytics_window(&window).await
    }

    /// Like [`read_analytics`](Self::read_analytics) for an explicit window.
    pub async fn read_analytics_window(
        &self,
        window: &AnalyticsWindow,
    ) -> Result<AnalyticsSummary, Failure> {
        let zones = self.api.hourly_requests(window).await.map_err(|err| {
            error!(error = %err, "analytics query failed");
            Failure::from(&err)
        })?;

        let Some(zone) = zones.first() else {
            warn!("no zones found in analytics response");
            return Err(Failure::ZoneNotFound);
        };

        if zone.buckets.is_empty() {
            warn!(hours = window.hours, "no analytics data in window");
            return Err(Failure::NoDataInWindow);
        }

        let summary = AnalyticsSummary::from_buckets(&zone.buckets);
        debug!(
            buckets = zone.buckets.len(),
            total = summary.total,
            cached = summary.cached,
            "summarized analytics"
        );
        Ok(summary)
    }
}
