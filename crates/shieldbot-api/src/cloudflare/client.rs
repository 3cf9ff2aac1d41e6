// Cloudflare API HTTP client
//
// Wraps `reqwest::Client` with zone-scoped URL construction and v4
// envelope unwrapping. Endpoint groups (settings, analytics) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::Credentials;
use crate::cloudflare::models::ApiResponse;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Default base for the v4 REST API.
pub const DEFAULT_API_URL: &str = "https://api.cloudflare.com/client/v4/";

/// Raw HTTP client for one Cloudflare zone.
///
/// All methods return the unwrapped `result` payload; the envelope is
/// stripped and checked before the caller sees it.
#[derive(Debug, Clone)]
pub struct CloudflareClient {
    http: reqwest::Client,
    base_url: Url,
    graphql_url: Url,
    zone_id: String,
}

impl CloudflareClient {
    /// Create a new client that authenticates every request with
    /// `credentials`.
    ///
    /// `base_url` is the v4 root (see [`DEFAULT_API_URL`]); the GraphQL
    /// endpoint is derived from it as `{base_url}graphql`.
    pub fn new(
        base_url: Url,
        zone_id: String,
        credentials: &Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client_with_headers(credentials.headers()?)?;
        Ok(Self::with_client(http, base_url, zone_id))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// The caller is responsible for any auth headers.
    pub fn with_client(http: reqwest::Client, base_url: Url, zone_id: String) -> Self {
        let base_url = with_trailing_slash(base_url);
        let graphql_url = base_url.join("graphql").unwrap_or_else(|_| base_url.clone());
        Self {
            http,
            base_url,
            graphql_url,
            zone_id,
        }
    }

    /// Override the GraphQL endpoint.
    pub fn with_graphql_url(mut self, url: Url) -> Self {
        self.graphql_url = url;
        self
    }

    /// The zone this client operates on.
    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn graphql_url(&self) -> &Url {
        &self.graphql_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a zone-scoped URL: `{base}zones/{zone}/{path}`
    pub(crate) fn zone_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self
            .base_url
            .join(&format!("zones/{}/{}", self.zone_id, path))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the v4 envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        parse_envelope(resp).await
    }

    /// Send a PATCH request with JSON body and unwrap the v4 envelope.
    pub(crate) async fn patch<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("PATCH {}", url);
        let resp = self.http.patch(url).json(body).send().await?;
        parse_envelope(resp).await
    }

    /// Send a PUT request with JSON body and unwrap the v4 envelope.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("PUT {}", url);
        let resp = self.http.put(url).json(body).send().await?;
        parse_envelope(resp).await
    }
}

/// Check the status, then the `{ success, errors, result }` envelope.
///
/// Any status other than 200 is an [`Error::HttpStatus`] even when the body
/// carries a well-formed error envelope.
async fn parse_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    let body = resp.text().await?;

    if status != reqwest::StatusCode::OK {
        return Err(Error::HttpStatus {
            status: status.as_u16(),
            body,
        });
    }

    let envelope: ApiResponse<T> =
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: body.clone(),
        })?;

    if !envelope.success || !envelope.errors.is_empty() {
        return Err(Error::Api {
            errors: envelope.errors,
        });
    }

    envelope.result.ok_or_else(|| Error::Deserialization {
        message: "envelope has no result".into(),
        body,
    })
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
