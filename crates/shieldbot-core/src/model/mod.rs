// ── Domain model ──
//
// Canonical types shared by the router, gateway, composer and
// reconciler. Nothing here outlives a single interaction.

pub mod analytics;
pub mod identity;
pub mod outcome;
pub mod setting;
pub mod status;

pub use analytics::{AnalyticsSummary, AnalyticsWindow, HourlyBucket, ZoneTraffic};
pub use identity::{ChatId, Identity};
pub use outcome::{Failure, SettingOutcome};
pub use setting::{SecurityLevel, SettingName, SettingValue, Toggle};
pub use status::{CompositeStatus, StatusField};
