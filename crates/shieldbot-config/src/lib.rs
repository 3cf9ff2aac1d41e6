//! Configuration for shieldbot.
//!
//! One TOML file plus `SHIELDBOT_`-prefixed environment overrides,
//! secret resolution (env var, then keyring, then plaintext), and
//! translation to the immutable `shieldbot_core::RelayConfig`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use shieldbot_api::Credentials;
use shieldbot_core::config::DEFAULT_ANALYTICS_WINDOW_HOURS;
use shieldbot_core::{Identity, RelayConfig};

const KEYRING_SERVICE: &str = "shieldbot";
const ENV_PREFIX: &str = "SHIELDBOT_";
const REDACTED: &str = "********";

/// Longest analytics window accepted, in hours.
pub const MAX_ANALYTICS_WINDOW_HOURS: u32 = 720;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no {secret} configured")]
    NoCredentials { secret: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramSection,

    #[serde(default)]
    pub cloudflare: CloudflareSection,

    #[serde(default)]
    pub access: AccessSection,

    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelegramSection {
    /// Bot token (plaintext; prefer keyring or env var).
    pub bot_token: Option<String>,

    /// Environment variable name containing the bot token.
    pub bot_token_env: Option<String>,

    #[serde(default = "default_telegram_url")]
    pub api_url: String,

    /// Long-poll timeout in seconds.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout: u64,
}

impl Default for TelegramSection {
    fn default() -> Self {
        Self {
            bot_token: None,
            bot_token_env: None,
            api_url: default_telegram_url(),
            poll_timeout: default_poll_timeout(),
        }
    }
}

fn default_telegram_url() -> String {
    shieldbot_api::telegram::DEFAULT_API_URL.into()
}
fn default_poll_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CloudflareSection {
    pub zone_id: Option<String>,

    /// Auth mode: "key" (email + Global API Key) or "token" (scoped API token).
    #[serde(default = "default_auth_mode")]
    pub auth_mode: String,

    /// Account email for key auth.
    pub email: Option<String>,

    /// Global API Key (plaintext; prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the Global API Key.
    pub api_key_env: Option<String>,

    /// Scoped API token (plaintext; prefer keyring or env var).
    pub api_token: Option<String>,

    /// Environment variable name containing the API token.
    pub api_token_env: Option<String>,

    #[serde(default = "default_cloudflare_url")]
    pub api_url: String,

    /// GraphQL endpoint; defaults to `<api_url>/graphql`.
    pub graphql_url: Option<String>,
}

impl Default for CloudflareSection {
    fn default() -> Self {
        Self {
            zone_id: None,
            auth_mode: default_auth_mode(),
            email: None,
            api_key: None,
            api_key_env: None,
            api_token: None,
            api_token_env: None,
            api_url: default_cloudflare_url(),
            graphql_url: None,
        }
    }
}

fn default_auth_mode() -> String {
    "key".into()
}
fn default_cloudflare_url() -> String {
    shieldbot_api::cloudflare::DEFAULT_API_URL.into()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AccessSection {
    /// Telegram user ids allowed to operate the bot.
    #[serde(default)]
    pub allowed_users: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_analytics_window_hours")]
    pub analytics_window_hours: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            analytics_window_hours: default_analytics_window_hours(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}
fn default_analytics_window_hours() -> u32 {
    DEFAULT_ANALYTICS_WINDOW_HOURS
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "shieldbot", "shieldbot").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("shieldbot");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Layered sources: defaults, then the TOML file, then environment.
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load the config from `path` (or the platform default) plus environment.
///
/// A missing file is not an error; validation happens in
/// [`to_relay_config`].
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    let config: Config = figment(&path).extract()?;
    Ok(config)
}

pub fn to_toml(cfg: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(cfg)?)
}

/// A copy of `cfg` with every plaintext secret masked.
pub fn redacted(cfg: &Config) -> Config {
    let mask = |s: &Option<String>| s.as_ref().map(|_| REDACTED.to_string());
    let mut out = cfg.clone();
    out.telegram.bot_token = mask(&cfg.telegram.bot_token);
    out.cloudflare.api_key = mask(&cfg.cloudflare.api_key);
    out.cloudflare.api_token = mask(&cfg.cloudflare.api_token);
    out
}

// ── Secret resolution ───────────────────────────────────────────────

/// Resolve one secret: named env var, then keyring, then plaintext.
fn resolve_secret(
    env_name: Option<&str>,
    keyring_user: &str,
    plaintext: Option<&str>,
    what: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Named env var
    if let Some(env_name) = env_name {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, keyring_user) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(value) = plaintext {
        return Ok(SecretString::from(value.to_owned()));
    }

    Err(ConfigError::NoCredentials { secret: what.into() })
}

pub fn resolve_bot_token(cfg: &TelegramSection) -> Result<SecretString, ConfigError> {
    resolve_secret(
        cfg.bot_token_env.as_deref(),
        "telegram/bot-token",
        cfg.bot_token.as_deref(),
        "Telegram bot token",
    )
}

/// Resolve Cloudflare credentials from `auth_mode`.
pub fn resolve_credentials(cfg: &CloudflareSection) -> Result<Credentials, ConfigError> {
    match cfg.auth_mode.as_str() {
        "key" => {
            let email = cfg
                .email
                .clone()
                .filter(|e| !e.trim().is_empty())
                .ok_or_else(|| invalid("cloudflare.email", "required when auth_mode is 'key'"))?;
            let key = resolve_secret(
                cfg.api_key_env.as_deref(),
                "cloudflare/api-key",
                cfg.api_key.as_deref(),
                "Cloudflare API key",
            )?;
            Ok(Credentials::ApiKey { email, key })
        }
        "token" => {
            let token = resolve_secret(
                cfg.api_token_env.as_deref(),
                "cloudflare/api-token",
                cfg.api_token.as_deref(),
                "Cloudflare API token",
            )?;
            Ok(Credentials::ApiToken { token })
        }
        other => Err(invalid(
            "cloudflare.auth_mode",
            format!("expected 'key' or 'token', got '{other}'"),
        )),
    }
}

// ── Validation & translation ────────────────────────────────────────

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw).map_err(|e| invalid(field, format!("invalid URL '{raw}': {e}")))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Check everything that does not need secrets.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.access.allowed_users.is_empty() {
        return Err(invalid(
            "access.allowed_users",
            "at least one Telegram user id is required",
        ));
    }

    if cfg.cloudflare.zone_id.as_deref().is_none_or(|z| z.trim().is_empty()) {
        return Err(invalid("cloudflare.zone_id", "required"));
    }

    let hours = cfg.defaults.analytics_window_hours;
    if hours == 0 || hours > MAX_ANALYTICS_WINDOW_HOURS {
        return Err(invalid(
            "defaults.analytics_window_hours",
            format!("must be between 1 and {MAX_ANALYTICS_WINDOW_HOURS}, got {hours}"),
        ));
    }

    if cfg.defaults.timeout == 0 {
        return Err(invalid("defaults.timeout", "must be at least 1 second"));
    }

    parse_url("telegram.api_url", &cfg.telegram.api_url)?;
    parse_url("cloudflare.api_url", &cfg.cloudflare.api_url)?;
    if let Some(raw) = &cfg.cloudflare.graphql_url {
        Url::parse(raw).map_err(|e| invalid("cloudflare.graphql_url", e.to_string()))?;
    }
    Ok(())
}

/// Validate `cfg`, resolve secrets, and build the runtime configuration.
pub fn to_relay_config(cfg: &Config) -> Result<RelayConfig, ConfigError> {
    validate(cfg)?;

    let zone_id = cfg
        .cloudflare
        .zone_id
        .clone()
        .ok_or_else(|| invalid("cloudflare.zone_id", "required"))?;

    let graphql_url = cfg
        .cloudflare
        .graphql_url
        .as_deref()
        .map(Url::parse)
        .transpose()
        .map_err(|e| invalid("cloudflare.graphql_url", e.to_string()))?;

    let allowed_users: BTreeSet<Identity> =
        cfg.access.allowed_users.iter().copied().map(Identity).collect();

    Ok(RelayConfig {
        bot_token: resolve_bot_token(&cfg.telegram)?,
        telegram_url: parse_url("telegram.api_url", &cfg.telegram.api_url)?,
        poll_timeout: Duration::from_secs(cfg.telegram.poll_timeout),
        zone_id: zone_id.trim().to_owned(),
        credentials: resolve_credentials(&cfg.cloudflare)?,
        cloudflare_url: parse_url("cloudflare.api_url", &cfg.cloudflare.api_url)?,
        graphql_url,
        allowed_users,
        timeout: Duration::from_secs(cfg.defaults.timeout),
        analytics_window_hours: cfg.defaults.analytics_window_hours,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use figment::Jail;
    use secrecy::ExposeSecret;

    use super::*;

    const FULL: &str = r#"
        [telegram]
        bot_token = "123:plain"

        [cloudflare]
        zone_id = "zone123"
        email = "ops@example.com"
        api_key = "plain-key"

        [access]
        allowed_users = [124555, 12354]
    "#;

    fn jail_err(e: ConfigError) -> figment::Error {
        figment::Error::from(e.to_string())
    }

    #[test]
    fn defaults_apply_when_file_is_missing() {
        Jail::expect_with(|_jail| {
            let cfg = load_config(Some(Path::new("absent.toml"))).map_err(jail_err)?;
            assert_eq!(cfg.defaults.timeout, 10);
            assert_eq!(cfg.defaults.analytics_window_hours, 24);
            assert_eq!(cfg.telegram.poll_timeout, 30);
            assert_eq!(cfg.cloudflare.auth_mode, "key");
            assert!(cfg.access.allowed_users.is_empty());
            Ok(())
        });
    }

    #[test]
    fn full_file_builds_relay_config() {
        Jail::expect_with(|jail| {
            jail.create_file("shieldbot.toml", FULL)?;
            let cfg = load_config(Some(Path::new("shieldbot.toml"))).map_err(jail_err)?;
            let relay = to_relay_config(&cfg).map_err(jail_err)?;

            assert_eq!(relay.zone_id, "zone123");
            assert_eq!(relay.bot_token.expose_secret(), "123:plain");
            assert!(relay.allowed_users.contains(&Identity(12_354)));
            assert_eq!(relay.timeout, Duration::from_secs(10));
            assert_eq!(
                relay.cloudflare_url.as_str(),
                "https://api.cloudflare.com/client/v4/"
            );
            assert!(matches!(relay.credentials, Credentials::ApiKey { .. }));
            Ok(())
        });
    }

    #[test]
    fn env_overrides_nested_keys() {
        Jail::expect_with(|jail| {
            jail.create_file("shieldbot.toml", FULL)?;
            jail.set_env("SHIELDBOT_DEFAULTS__ANALYTICS_WINDOW_HOURS", "6");
            jail.set_env("SHIELDBOT_CLOUDFLARE__ZONE_ID", "zone-from-env");
            let cfg = load_config(Some(Path::new("shieldbot.toml"))).map_err(jail_err)?;

            assert_eq!(cfg.defaults.analytics_window_hours, 6);
            assert_eq!(cfg.cloudflare.zone_id.as_deref(), Some("zone-from-env"));
            Ok(())
        });
    }

    #[test]
    fn secret_env_var_wins_over_plaintext() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "shieldbot.toml",
                &format!("{FULL}\n[defaults]\ntimeout = 5\n"),
            )?;
            jail.set_env("SHIELDBOT_TEST_BOT_TOKEN", "123:from-env");
            jail.set_env("SHIELDBOT_TELEGRAM__BOT_TOKEN_ENV", "SHIELDBOT_TEST_BOT_TOKEN");
            let cfg = load_config(Some(Path::new("shieldbot.toml"))).map_err(jail_err)?;
            let relay = to_relay_config(&cfg).map_err(jail_err)?;

            assert_eq!(relay.bot_token.expose_secret(), "123:from-env");
            assert_eq!(relay.timeout, Duration::from_secs(5));
            Ok(())
        });
    }

    #[test]
    fn token_auth_mode() {
        let mut cfg = Config::default();
        cfg.cloudflare.auth_mode = "token".into();
        cfg.cloudflare.api_token = Some("scoped".into());
        let creds = resolve_credentials(&cfg.cloudflare).unwrap();
        assert!(matches!(creds, Credentials::ApiToken { .. }));
    }

    #[test]
    fn unknown_auth_mode_names_the_field() {
        let mut cfg = Config::default();
        cfg.cloudflare.auth_mode = "oauth".into();
        let err = resolve_credentials(&cfg.cloudflare).unwrap_err();
        assert!(err.to_string().contains("cloudflare.auth_mode"), "{err}");
    }

    #[test]
    fn empty_allow_list_is_rejected() {
        let mut cfg = Config::default();
        cfg.cloudflare.zone_id = Some("zone123".into());
        let err = validate(&cfg).unwrap_err();
        assert!(err.to_string().contains("access.allowed_users"), "{err}");
    }

    #[test]
    fn window_bounds_are_enforced() {
        let mut cfg = Config::default();
        cfg.cloudflare.zone_id = Some("zone123".into());
        cfg.access.allowed_users = vec![1];
        cfg.defaults.analytics_window_hours = 0;
        assert!(validate(&cfg).is_err());
        cfg.defaults.analytics_window_hours = MAX_ANALYTICS_WINDOW_HOURS + 1;
        assert!(validate(&cfg).is_err());
        cfg.defaults.analytics_window_hours = MAX_ANALYTICS_WINDOW_HOURS;
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn redaction_masks_only_present_secrets() {
        let mut cfg = Config::default();
        cfg.telegram.bot_token = Some("123:plain".into());
        let shown = redacted(&cfg);
        assert_eq!(shown.telegram.bot_token.as_deref(), Some(REDACTED));
        assert_eq!(shown.cloudflare.api_key, None);
        assert!(!to_toml(&shown).unwrap().contains("123:plain"));
    }
}
