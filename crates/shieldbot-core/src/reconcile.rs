// ── Response reconciler ──
//
// Turns a command and its outcome into what the operator sees: the main
// text, the keyboard, where it goes, and an optional alert for callback
// acknowledgment. Also owns the fallback renderings used when an edit
// turns out to be a no-op.

use crate::command::{ActionCategory, Command};
use crate::model::{AnalyticsSummary, CompositeStatus, Failure, SettingName, SettingOutcome, SettingValue};
use crate::render::{self, Keyboard};

/// Where the interaction came from, as far as rendering cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginKind {
    /// Free text or a reply-keyboard press.
    Message,
    /// An inline-keyboard press.
    Callback,
}

/// How the main output is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    NewMessage,
    /// Replace the text and keyboard of the message the callback came from.
    EditInPlace,
}

/// What the dispatcher learned from the remote side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Menu,
    LevelPicker,
    LevelWritten(SettingOutcome),
    LevelRead(SettingOutcome),
    Analytics {
        window_hours: u32,
        result: Result<AnalyticsSummary, Failure>,
    },
    AntiDdos {
        /// The toggle that was written, if any.
        write: Option<(SettingName, SettingOutcome)>,
        status: CompositeStatus,
    },
}

impl ActionOutcome {
    /// True when the remote call behind this outcome failed outright.
    pub fn is_failed(&self) -> bool {
        match self {
            Self::Menu | Self::LevelPicker => false,
            Self::LevelWritten(o) | Self::LevelRead(o) => o.is_failed(),
            Self::Analytics { result, .. } => result.is_err(),
            Self::AntiDdos { write, .. } => write.as_ref().is_some_and(|(_, o)| o.is_failed()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub text: String,
    pub keyboard: Option<Keyboard>,
    pub delivery: Delivery,
    /// Shown as a prominent alert when acknowledging a callback.
    pub alert: Option<String>,
}

impl Response {
    fn new(text: impl Into<String>, keyboard: Option<Keyboard>, delivery: Delivery) -> Self {
        Self {
            text: text.into(),
            keyboard,
            delivery,
            alert: None,
        }
    }

    fn with_alert(mut self, alert: Option<String>) -> Self {
        self.alert = alert;
        self
    }
}

/// Render the response for a completed command.
pub fn reconcile(outcome: &ActionOutcome, origin: OriginKind) -> Response {
    let in_place = match origin {
        OriginKind::Callback => Delivery::EditInPlace,
        OriginKind::Message => Delivery::NewMessage,
    };

    match outcome {
        // Reply keyboards cannot ride on an edit.
        ActionOutcome::Menu => {
            Response::new(render::GREETING, Some(render::main_menu()), Delivery::NewMessage)
        }

        ActionOutcome::LevelPicker => {
            Response::new(render::CHOOSE_LEVEL, Some(render::level_picker()), in_place)
        }

        ActionOutcome::LevelWritten(written) => {
            let (text, alert) = match written {
                SettingOutcome::Applied(SettingValue::SecurityLevel(level))
                | SettingOutcome::Unchanged(SettingValue::SecurityLevel(level)) => {
                    (render::level_set(*level), render::level_set_alert(*level))
                }
                other => {
                    let failure = failure_of(other);
                    (
                        render::setting_failed("set", SettingName::SecurityLevel, &failure),
                        format!("Security level not changed: {failure}"),
                    )
                }
            };
            match origin {
                OriginKind::Callback => {
                    Response::new(text, Some(render::level_picker()), in_place).with_alert(Some(alert))
                }
                OriginKind::Message => Response::new(text, None, in_place),
            }
        }

        ActionOutcome::LevelRead(read) => {
            let text = match read {
                SettingOutcome::Applied(SettingValue::SecurityLevel(level))
                | SettingOutcome::Unchanged(SettingValue::SecurityLevel(level)) => {
                    render::level_current(*level)
                }
                other => render::setting_failed("read", SettingName::SecurityLevel, &failure_of(other)),
            };
            Response::new(text, None, in_place)
        }

        ActionOutcome::Analytics {
            window_hours,
            result,
        } => {
            let text = match result {
                Ok(summary) => render::analytics(summary, *window_hours),
                Err(failure) => render::analytics_failed(failure, *window_hours),
            };
            Response::new(text, Some(render::analytics_menu()), in_place)
        }

        ActionOutcome::AntiDdos { write, status } => {
            let alert = write.as_ref().map(|(name, written)| toggle_alert(*name, written));
            Response::new(
                render::anti_ddos_status(status),
                Some(render::anti_ddos_menu()),
                in_place,
            )
            .with_alert(alert)
        }
    }
}

/// Replacement rendering after an edit was rejected as unchanged.
///
/// `current` is the keyboard already on the message; `status` is a fresh
/// anti-DDoS read tagged unchanged, when the command is a toggle.
pub fn reconcile_noop(
    command: Command,
    current: Option<&Keyboard>,
    status: Option<&CompositeStatus>,
) -> Response {
    match (command.category(), status) {
        (ActionCategory::AnalyticsRefresh, _) => Response::new(
            render::ANALYTICS_UNCHANGED,
            Some(render::analytics_menu()),
            Delivery::EditInPlace,
        ),
        (ActionCategory::AntiDdosToggle, Some(status)) => Response::new(
            render::anti_ddos_status(status),
            Some(render::anti_ddos_menu()),
            Delivery::EditInPlace,
        ),
        (ActionCategory::AntiDdosToggle, None) => Response::new(
            render::NOTHING_CHANGED,
            Some(render::anti_ddos_menu()),
            Delivery::EditInPlace,
        ),
        (ActionCategory::Generic, _) => {
            Response::new(render::NOTHING_CHANGED, current.cloned(), Delivery::EditInPlace)
        }
    }
}

fn toggle_alert(name: SettingName, outcome: &SettingOutcome) -> String {
    match outcome {
        SettingOutcome::Applied(value) | SettingOutcome::Unchanged(value) => {
            render::toggle_alert(name, &value.to_string())
        }
        SettingOutcome::Failed(failure) => render::toggle_failed_alert(name, failure),
    }
}

// `LevelWritten` / `LevelRead` only ever carry security-level values; any
// other success shape is reported as malformed.
fn failure_of(outcome: &SettingOutcome) -> Failure {
    match outcome {
        SettingOutcome::Failed(f) => f.clone(),
        SettingOutcome::Applied(v) | SettingOutcome::Unchanged(v) => {
            Failure::Malformed(format!("unexpected {} value {v}", v.name()))
        }
    }
}
