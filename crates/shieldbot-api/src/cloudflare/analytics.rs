// Cloudflare GraphQL analytics
//
// Hourly HTTP request rollups (`httpRequests1hGroups`) for the zone.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;
use tracing::{debug, warn};

use crate::cloudflare::client::CloudflareClient;
use crate::cloudflare::models::{AnalyticsData, GraphQlResponse};
use crate::error::Error;

const HTTP_REQUESTS_QUERY: &str = r"
query HttpRequests($zoneTag: string, $since: Time, $until: Time, $limit: uint64) {
  viewer {
    zones(filter: { zoneTag: $zoneTag }) {
      httpRequests1hGroups(
        limit: $limit
        filter: { datetime_geq: $since, datetime_leq: $until }
        orderBy: [datetime_DESC]
      ) {
        sum {
          requests
          threats
          cachedRequests
        }
        dimensions {
          datetime
        }
      }
    }
  }
}
";

impl CloudflareClient {
    /// Fetch hourly request groups between `since` and `until`, newest first.
    ///
    /// `POST /graphql`
    ///
    /// A non-empty GraphQL `errors` list becomes [`Error::GraphQl`] carrying
    /// the first message. Empty `zones` or bucket lists are returned as-is;
    /// deciding what they mean is the caller's job.
    pub async fn http_requests_1h(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        limit: u32,
    ) -> Result<AnalyticsData, Error> {
        let body = json!({
            "query": HTTP_REQUESTS_QUERY,
            "variables": {
                "zoneTag": self.zone_id(),
                "since": since.to_rfc3339_opts(SecondsFormat::Secs, true),
                "until": until.to_rfc3339_opts(SecondsFormat::Secs, true),
                "limit": limit,
            }
        });

        let url = self.graphql_url().clone();
        debug!(%since, %until, limit, "POST {}", url);

        let resp = self.http().post(url).json(&body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if status != reqwest::StatusCode::OK {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GraphQlResponse<AnalyticsData> =
            serde_json::from_str(&text).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: text.clone(),
            })?;

        if let Some(first) = parsed.errors.as_ref().and_then(|errs| errs.first()) {
            warn!(message = %first.message, "analytics query returned errors");
            let message = if first.message.is_empty() {
                "unknown error".to_string()
            } else {
                first.message.clone()
            };
            return Err(Error::GraphQl { message });
        }

        Ok(parsed.data.unwrap_or_default())
    }
}
