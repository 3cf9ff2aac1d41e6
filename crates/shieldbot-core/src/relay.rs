// ── Relay ──
//
// One inbound interaction end to end: authorize, dispatch, call the remote
// API, reconcile, deliver. `handle_interaction` never fails; every problem
// is logged and, where possible, shown to the operator.

use strum::Display;
use tracing::{Instrument, debug, error, info_span, warn};

use crate::api::SecurityApi;
use crate::command::{ActionCategory, Command};
use crate::compose::compose_anti_ddos_status;
use crate::config::RelayConfig;
use crate::error::EditError;
use crate::gateway::SettingsGateway;
use crate::model::{ChatId, CompositeStatus, Identity, SettingName, SettingValue};
use crate::reconcile::{ActionOutcome, Delivery, OriginKind, Response, reconcile, reconcile_noop};
use crate::render;
use crate::router::{RouteDecision, Router};
use crate::transport::{ChatTransport, MessageRef};

/// One inbound event from an operator.
#[derive(Debug, Clone)]
pub struct Interaction {
    pub identity: Identity,
    /// Message text or callback data.
    pub token: String,
    pub origin: Origin,
}

#[derive(Debug, Clone)]
pub enum Origin {
    Message {
        chat: ChatId,
    },
    Callback {
        callback_id: String,
        /// Absent when the platform no longer exposes the original message.
        message: Option<MessageRef>,
    },
}

impl Origin {
    pub fn kind(&self) -> OriginKind {
        match self {
            Self::Message { .. } => OriginKind::Message,
            Self::Callback { .. } => OriginKind::Callback,
        }
    }
}

/// Lifecycle of one interaction, emitted as debug events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    Idle,
    Authorizing,
    Dispatching,
    AwaitingRemote,
    Composing,
    Rendered,
}

pub struct Relay<A, T> {
    router: Router,
    gateway: SettingsGateway<A>,
    transport: T,
    analytics_window_hours: u32,
}

impl<A: SecurityApi, T: ChatTransport> Relay<A, T> {
    pub fn new(config: &RelayConfig, api: A, transport: T) -> Self {
        Self {
            router: Router::new(config.allowed_users.clone()),
            gateway: SettingsGateway::new(api),
            transport,
            analytics_window_hours: config.analytics_window_hours,
        }
    }

    pub fn gateway(&self) -> &SettingsGateway<A> {
        &self.gateway
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn handle_interaction(&self, interaction: Interaction) {
        let span = info_span!(
            "interaction",
            identity = %interaction.identity,
            origin = ?interaction.origin.kind()
        );
        self.handle(interaction).instrument(span).await;
    }

    async fn handle(&self, interaction: Interaction) {
        let Interaction {
            identity,
            token,
            origin,
        } = interaction;
        debug!(phase = %Phase::Idle, "interaction received");

        debug!(phase = %Phase::Authorizing);
        let command = match self.router.route(identity, &token) {
            RouteDecision::Rejected => {
                warn!("rejected interaction from unauthorized identity");
                self.reject(&origin).await;
                return;
            }
            RouteDecision::Ignored => {
                debug!(token = %token, "no command for token");
                if let Origin::Callback { callback_id, .. } = &origin {
                    self.acknowledge(callback_id, None, false).await;
                }
                return;
            }
            RouteDecision::Dispatch(command) => command,
        };

        debug!(phase = %Phase::Dispatching, ?command);
        let outcome = self.execute(command).await;
        if !outcome.is_failed() {
            debug!(phase = %Phase::Composing);
        }

        let response = reconcile(&outcome, origin.kind());
        self.deliver(command, &origin, &response).await;
        debug!(
            phase = %Phase::Rendered,
            failed = outcome.is_failed(),
            "interaction complete"
        );
    }

    async fn execute(&self, command: Command) -> ActionOutcome {
        match command {
            Command::Start => ActionOutcome::Menu,
            Command::SelectSecurityLevel => ActionOutcome::LevelPicker,
            Command::SetSecurityLevel(level) => {
                debug!(phase = %Phase::AwaitingRemote, %level, "writing security level");
                ActionOutcome::LevelWritten(
                    self.gateway
                        .write_setting(SettingValue::SecurityLevel(level))
                        .await,
                )
            }
            Command::ReadSecurityLevel => {
                debug!(phase = %Phase::AwaitingRemote, "reading security level");
                ActionOutcome::LevelRead(self.gateway.read_setting(SettingName::SecurityLevel).await)
            }
            Command::ReadAnalytics | Command::RefreshAnalytics => {
                debug!(phase = %Phase::AwaitingRemote, hours = self.analytics_window_hours, "reading analytics");
                ActionOutcome::Analytics {
                    window_hours: self.analytics_window_hours,
                    result: self.gateway.read_analytics(self.analytics_window_hours).await,
                }
            }
            Command::ShowAntiDdos => {
                debug!(phase = %Phase::AwaitingRemote, "reading anti-DDoS status");
                ActionOutcome::AntiDdos {
                    write: None,
                    status: self.read_anti_ddos(false).await,
                }
            }
            Command::SetBotFightMode(toggle) => {
                self.toggle(SettingValue::BotFightMode(toggle)).await
            }
            Command::SetBrowserCheck(toggle) => {
                self.toggle(SettingValue::BrowserCheck(toggle)).await
            }
        }
    }

    async fn toggle(&self, desired: SettingValue) -> ActionOutcome {
        debug!(phase = %Phase::AwaitingRemote, setting = %desired.name(), value = %desired, "writing toggle");
        let written = self.gateway.write_setting(desired).await;
        ActionOutcome::AntiDdos {
            write: Some((desired.name(), written)),
            status: self.read_anti_ddos(false).await,
        }
    }

    /// Read both anti-DDoS settings concurrently.
    ///
    /// With `unchanged` set the view always carries the unchanged heading,
    /// even when a read failed, so it differs from what is displayed.
    async fn read_anti_ddos(&self, unchanged: bool) -> CompositeStatus {
        let (bfm, bic) = tokio::join!(
            self.gateway.read_setting(SettingName::BotFightMode),
            self.gateway.read_setting(SettingName::BrowserCheck),
        );
        if !unchanged {
            return compose_anti_ddos_status(&bfm, &bic);
        }
        let mut status = compose_anti_ddos_status(&bfm.into_unchanged(), &bic.into_unchanged());
        status.mark_unchanged();
        status
    }

    // ── Delivery ─────────────────────────────────────────────────────

    async fn reject(&self, origin: &Origin) {
        match origin {
            Origin::Message { chat } => {
                if let Err(e) = self
                    .transport
                    .send_message(*chat, render::UNAUTHORIZED_MESSAGE, None)
                    .await
                {
                    error!(error = %e, "failed to send access-denied message");
                }
            }
            Origin::Callback { callback_id, .. } => {
                self.acknowledge(callback_id, Some(render::UNAUTHORIZED_ALERT), true)
                    .await;
            }
        }
    }

    async fn deliver(&self, command: Command, origin: &Origin, response: &Response) {
        match origin {
            Origin::Message { chat } => {
                let Err(e) = self
                    .transport
                    .send_message(*chat, &response.text, response.keyboard.as_ref())
                    .await
                else {
                    return;
                };
                error!(error = %e, "failed to send response");
                if let Err(e) = self
                    .transport
                    .send_message(*chat, render::DELIVERY_FAILED, None)
                    .await
                {
                    error!(error = %e, "failed to send fallback notice");
                }
            }
            Origin::Callback {
                callback_id,
                message,
            } => {
                let delivered = match message {
                    Some(message) => self.deliver_to_callback(command, message, response).await,
                    None => {
                        warn!("callback carries no message; cannot deliver response");
                        false
                    }
                };

                if delivered {
                    let alert = response.alert.as_deref();
                    self.acknowledge(callback_id, alert, alert.is_some()).await;
                } else {
                    self.acknowledge(callback_id, Some(render::FAULT_ALERT), true)
                        .await;
                }
            }
        }
    }

    /// Returns whether the operator ended up seeing a response.
    async fn deliver_to_callback(
        &self,
        command: Command,
        message: &MessageRef,
        response: &Response,
    ) -> bool {
        if response.delivery == Delivery::NewMessage {
            return match self
                .transport
                .send_message(message.chat, &response.text, response.keyboard.as_ref())
                .await
            {
                Ok(()) => true,
                Err(e) => {
                    error!(error = %e, "failed to send response");
                    false
                }
            };
        }

        match self
            .transport
            .edit_message(message, &response.text, response.keyboard.as_ref())
            .await
        {
            Ok(()) => true,
            Err(EditError::NotModified) => self.reconcile_noop_edit(command, message).await,
            Err(EditError::Failed(e)) => {
                error!(error = %e, "failed to edit message");
                false
            }
        }
    }

    async fn reconcile_noop_edit(&self, command: Command, message: &MessageRef) -> bool {
        debug!(?command, "edit was a no-op; rendering unchanged state");

        let status = if command.category() == ActionCategory::AntiDdosToggle {
            Some(self.read_anti_ddos(true).await)
        } else {
            None
        };
        let fallback = reconcile_noop(command, message.keyboard.as_ref(), status.as_ref());

        match self
            .transport
            .edit_message(message, &fallback.text, fallback.keyboard.as_ref())
            .await
        {
            Ok(()) => true,
            Err(EditError::NotModified) => {
                debug!("unchanged rendering already displayed");
                true
            }
            Err(EditError::Failed(e)) => {
                error!(error = %e, "failed to edit message with unchanged rendering");
                false
            }
        }
    }

    async fn acknowledge(&self, callback_id: &str, alert: Option<&str>, prominent: bool) {
        if let Err(e) = self
            .transport
            .acknowledge(callback_id, alert, prominent)
            .await
        {
            error!(error = %e, "failed to acknowledge callback");
        }
    }
}
