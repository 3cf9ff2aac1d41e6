use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

const X_AUTH_EMAIL: HeaderName = HeaderName::from_static("x-auth-email");
const X_AUTH_KEY: HeaderName = HeaderName::from_static("x-auth-key");

/// Credentials for authenticating with the Cloudflare v4 API.
///
/// Each variant carries the secret material needed for its auth flow.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Account email plus Global API Key (`X-Auth-Email` / `X-Auth-Key`).
    ApiKey { email: String, key: SecretString },

    /// Scoped API token sent as `Authorization: Bearer`.
    /// Needs Zone Settings, Bot Management and Analytics read/write scopes.
    ApiToken { token: SecretString },
}

impl Credentials {
    /// Render the credentials as default request headers.
    pub fn headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        match self {
            Self::ApiKey { email, key } => {
                headers.insert(X_AUTH_EMAIL, header_value(email)?);
                let mut key = header_value(key.expose_secret())?;
                key.set_sensitive(true);
                headers.insert(X_AUTH_KEY, key);
            }
            Self::ApiToken { token } => {
                let mut bearer = header_value(&format!("Bearer {}", token.expose_secret()))?;
                bearer.set_sensitive(true);
                headers.insert(AUTHORIZATION, bearer);
            }
        }
        Ok(headers)
    }
}

fn header_value(raw: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(raw)
        .map_err(|e| Error::ClientBuild(format!("invalid credential header: {e}")))
}
