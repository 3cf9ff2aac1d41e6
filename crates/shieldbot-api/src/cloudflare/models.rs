// Cloudflare API response types
//
// Every v4 REST endpoint wraps its payload in `ApiResponse<T>`. GraphQL
// analytics responses use their own `{ data, errors }` shape.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard Cloudflare v4 response envelope.
///
/// ```json
/// { "success": true, "errors": [], "messages": [], "result": { ... } }
/// ```
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
    pub result: Option<T>,
}

/// One entry of the envelope's `errors` or `messages` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

impl fmt::Display for ApiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

// ── Zone settings ────────────────────────────────────────────────────

/// A single zone setting, e.g. `settings/security_level`.
///
/// `value` is left as raw JSON: most settings are strings, but a few
/// are numbers or objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneSetting {
    pub id: String,
    pub value: serde_json::Value,
    #[serde(default)]
    pub editable: Option<bool>,
    #[serde(default)]
    pub modified_on: Option<String>,
}

impl ZoneSetting {
    /// The value as a string, if it is one.
    pub fn value_str(&self) -> Option<&str> {
        self.value.as_str()
    }
}

/// `zones/{zone}/bot_management` result.
///
/// Only the free-plan Bot Fight Mode flag is modelled explicitly; the
/// remaining plan-dependent fields land in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotManagement {
    #[serde(default)]
    pub fight_mode: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── GraphQL analytics ────────────────────────────────────────────────

/// Raw GraphQL response from `/graphql`.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
}

/// `data` of the `httpRequests1hGroups` query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsData {
    #[serde(default)]
    pub viewer: Viewer,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Viewer {
    #[serde(default)]
    pub zones: Vec<ZoneAnalytics>,
}

/// Analytics for one zone. Normally exactly one is returned because the
/// query filters on the zone tag.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneAnalytics {
    #[serde(default, rename = "httpRequests1hGroups")]
    pub http_requests_1h_groups: Vec<HttpRequestsGroup>,
}

/// One hourly bucket.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpRequestsGroup {
    pub sum: HttpRequestsSum,
    #[serde(default)]
    pub dimensions: Option<GroupDimensions>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequestsSum {
    #[serde(default)]
    pub requests: u64,
    #[serde(default)]
    pub threats: u64,
    #[serde(default)]
    pub cached_requests: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupDimensions {
    pub datetime: String,
}
