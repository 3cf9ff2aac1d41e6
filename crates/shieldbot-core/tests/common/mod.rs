// Shared fakes for core integration tests: an in-memory security API and
// a chat transport that records every call.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::BTreeSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use url::Url;

use shieldbot_api::Credentials;
use shieldbot_core::model::{AnalyticsWindow, HourlyBucket, ZoneTraffic};
use shieldbot_core::{
    ChatId, ChatTransport, CoreError, EditError, Identity, Keyboard, MessageRef, RelayConfig,
    SecurityApi, SecurityLevel, SettingName, SettingValue, Toggle,
};

pub const OPERATOR: Identity = Identity(124_555);
pub const STRANGER: Identity = Identity(999);
pub const CHAT: ChatId = ChatId(124_555);

pub fn relay_config() -> RelayConfig {
    RelayConfig {
        bot_token: SecretString::from("123:abc"),
        telegram_url: Url::parse("https://api.telegram.org/").unwrap(),
        poll_timeout: Duration::from_secs(30),
        zone_id: "zone123".into(),
        credentials: Credentials::ApiToken {
            token: SecretString::from("cf-token"),
        },
        cloudflare_url: Url::parse("https://api.cloudflare.com/client/v4/").unwrap(),
        graphql_url: None,
        allowed_users: [OPERATOR, Identity(12_354)].into_iter().collect::<BTreeSet<_>>(),
        timeout: Duration::from_secs(10),
        analytics_window_hours: 24,
    }
}

// ── In-memory security API ──────────────────────────────────────────

pub struct FakeState {
    pub level: SecurityLevel,
    pub bfm: Toggle,
    pub bic: Toggle,
    pub zones: Vec<ZoneTraffic>,
    /// When set, every call fails with this HTTP status.
    pub fail_status: Option<u16>,
    /// When set, only reads of this setting fail.
    pub fail_read: Option<SettingName>,
}

pub struct FakeApi {
    pub state: Mutex<FakeState>,
    calls: AtomicUsize,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            state: Mutex::new(FakeState {
                level: SecurityLevel::Medium,
                bfm: Toggle::Off,
                bic: Toggle::On,
                zones: vec![ZoneTraffic {
                    buckets: vec![
                        HourlyBucket {
                            requests: 100,
                            threats: 10,
                            cached_requests: 60,
                        },
                        HourlyBucket {
                            requests: 50,
                            threats: 5,
                            cached_requests: 20,
                        },
                    ],
                }],
                fail_status: None,
                fail_read: None,
            }),
            calls: AtomicUsize::new(0),
        }
    }
}

impl FakeApi {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self, read: Option<SettingName>) -> Result<(), shieldbot_api::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        if let Some(status) = state.fail_status {
            return Err(forbidden(status));
        }
        if read.is_some() && read == state.fail_read {
            return Err(forbidden(403));
        }
        Ok(())
    }
}

fn forbidden(status: u16) -> shieldbot_api::Error {
    shieldbot_api::Error::HttpStatus {
        status,
        body: String::new(),
    }
}

#[async_trait]
impl SecurityApi for FakeApi {
    async fn read_setting(&self, name: SettingName) -> Result<SettingValue, shieldbot_api::Error> {
        self.check(Some(name))?;
        let state = self.state.lock().unwrap();
        Ok(match name {
            SettingName::SecurityLevel => SettingValue::SecurityLevel(state.level),
            SettingName::BotFightMode => SettingValue::BotFightMode(state.bfm),
            SettingName::BrowserCheck => SettingValue::BrowserCheck(state.bic),
        })
    }

    async fn write_setting(&self, value: SettingValue) -> Result<SettingValue, shieldbot_api::Error> {
        self.check(None)?;
        let mut state = self.state.lock().unwrap();
        match value {
            SettingValue::SecurityLevel(level) => state.level = level,
            SettingValue::BotFightMode(t) => state.bfm = t,
            SettingValue::BrowserCheck(t) => state.bic = t,
        }
        Ok(value)
    }

    async fn hourly_requests(
        &self,
        _window: &AnalyticsWindow,
    ) -> Result<Vec<ZoneTraffic>, shieldbot_api::Error> {
        self.check(None)?;
        Ok(self.state.lock().unwrap().zones.clone())
    }
}

// ── Recording chat transport ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Message {
        chat: ChatId,
        text: String,
        keyboard: Option<Keyboard>,
    },
    Edit {
        message_id: i64,
        text: String,
        keyboard: Option<Keyboard>,
    },
    Ack {
        callback_id: String,
        alert: Option<String>,
        prominent: bool,
    },
}

#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<Sent>>,
    /// How many upcoming edits report "not modified".
    pub not_modified: AtomicUsize,
    /// Fail every edit with a transport error.
    pub fail_edits: bool,
    /// How many upcoming sends fail with a transport error.
    pub failing_sends: AtomicUsize,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn reject_next_edits(&self, n: usize) {
        self.not_modified.store(n, Ordering::SeqCst);
    }

    pub fn fail_next_sends(&self, n: usize) {
        self.failing_sends.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), CoreError> {
        let remaining = self.failing_sends.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failing_sends.store(remaining - 1, Ordering::SeqCst);
            return Err(CoreError::Transport {
                message: "chat not reachable".into(),
            });
        }
        self.sent.lock().unwrap().push(Sent::Message {
            chat,
            text: text.into(),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }

    async fn edit_message(
        &self,
        message: &MessageRef,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), EditError> {
        if self.fail_edits {
            return Err(EditError::Failed(CoreError::Transport {
                message: "boom".into(),
            }));
        }
        let remaining = self.not_modified.load(Ordering::SeqCst);
        if remaining > 0 {
            self.not_modified.store(remaining - 1, Ordering::SeqCst);
            return Err(EditError::NotModified);
        }
        self.sent.lock().unwrap().push(Sent::Edit {
            message_id: message.message_id,
            text: text.into(),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }

    async fn acknowledge(
        &self,
        callback_id: &str,
        alert: Option<&str>,
        prominent: bool,
    ) -> Result<(), CoreError> {
        self.sent.lock().unwrap().push(Sent::Ack {
            callback_id: callback_id.into(),
            alert: alert.map(Into::into),
            prominent,
        });
        Ok(())
    }
}
